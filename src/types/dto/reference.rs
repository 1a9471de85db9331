use poem_openapi::{ApiResponse, Enum, Object, payload::Json};

/// Reference data tables managed through the generic admin endpoints
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[oai(rename_all = "kebab-case")]
pub enum ReferenceKind {
    Roles,
    Positions,
    Departments,
    Unions,
    ActivityCategories,
    ActivityCodes,
    NetworkNumbers,
    DirectorCodes,
    ReasonCodes,
    CpcCodes,
    Budgets,
    ExpenseCategories,
    ExpenseOptions,
    CalendarCategories,
}

impl ReferenceKind {
    /// Human-readable name of the natural key, used in validation messages
    pub fn key_label(&self) -> &'static str {
        match self {
            ReferenceKind::ActivityCodes
            | ReferenceKind::DirectorCodes
            | ReferenceKind::ReasonCodes
            | ReferenceKind::CpcCodes => "Code",
            ReferenceKind::NetworkNumbers => "Number",
            _ => "Name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Roles => "role",
            ReferenceKind::Positions => "position",
            ReferenceKind::Departments => "department",
            ReferenceKind::Unions => "union",
            ReferenceKind::ActivityCategories => "activity category",
            ReferenceKind::ActivityCodes => "activity code",
            ReferenceKind::NetworkNumbers => "network number",
            ReferenceKind::DirectorCodes => "director code",
            ReferenceKind::ReasonCodes => "reason code",
            ReferenceKind::CpcCodes => "CPC code",
            ReferenceKind::Budgets => "budget",
            ReferenceKind::ExpenseCategories => "expense category",
            ReferenceKind::ExpenseOptions => "expense option",
            ReferenceKind::CalendarCategories => "calendar category",
        }
    }

    /// Kinds whose rows must name a parent
    pub fn requires_parent(&self) -> bool {
        matches!(self, ReferenceKind::ExpenseOptions)
    }
}

/// A single reference data row
#[derive(Object, Debug, Clone, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct ReferenceRecord {
    pub id: String,

    pub kind: ReferenceKind,

    /// Natural key (name, code or number depending on the kind)
    pub key: String,

    pub description: Option<String>,

    /// Parent row for kinds that have one (activity category, project, expense category)
    pub parent_id: Option<String>,

    pub is_active: bool,

    pub created_at: i64,

    pub updated_at: i64,
}

/// Create or update body for a reference data row
#[derive(Object, Debug, Clone, Default)]
#[oai(rename_all = "camelCase")]
pub struct ReferenceInput {
    /// Natural key; required and trimmed
    pub key: String,

    pub description: Option<String>,

    pub parent_id: Option<String>,

    /// Defaults to true
    pub is_active: Option<bool>,
}

#[derive(ApiResponse, Debug)]
pub enum CreateReferenceApiResponse {
    /// Row created
    #[oai(status = 201)]
    Created(Json<ReferenceRecord>),
}
