/// Validated, trimmed input for a lookup row
#[derive(Debug, Clone, PartialEq)]
pub struct LookupInput {
    pub key: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: bool,
}
