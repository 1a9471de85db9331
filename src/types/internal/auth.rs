use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    /// Role name at issue time; informational, the role is re-read on every request
    pub role: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// The closed set of application roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleName {
    Admin,
    Manager,
    Director,
    User,
}

impl RoleName {
    pub const ALL: [RoleName; 4] = [
        RoleName::Admin,
        RoleName::Manager,
        RoleName::Director,
        RoleName::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "Admin",
            RoleName::Manager => "Manager",
            RoleName::Director => "Director",
            RoleName::User => "User",
        }
    }

    /// Case-insensitive match against the stored role name
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
    }

    /// May see other users' data in reports
    pub fn is_privileged(&self) -> bool {
        matches!(self, RoleName::Admin | RoleName::Manager | RoleName::Director)
    }

    /// May modify or delete other users' work items and manage projects
    pub fn can_manage_others(&self) -> bool {
        matches!(self, RoleName::Admin | RoleName::Manager)
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
