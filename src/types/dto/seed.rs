use poem_openapi::Object;

/// Row counts for one seeded set
#[derive(Object, Debug, Clone, PartialEq)]
pub struct SeedSetResult {
    pub name: String,
    pub created: u64,
    pub existing: u64,
}

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct SeedResponse {
    pub sets: Vec<SeedSetResult>,
    pub total_created: u64,
}
