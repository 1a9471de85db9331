use super::auth::RoleName;

/// Authenticated user making the current request
///
/// Resolved from a validated bearer token and a fresh user lookup, so the
/// role reflects the database rather than the token.
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub user_id: String,
    pub username: String,
    pub role: Option<RoleName>,
}

impl Caller {
    pub fn is_privileged(&self) -> bool {
        self.role.is_some_and(|role| role.is_privileged())
    }

    pub fn can_manage_others(&self) -> bool {
        self.role.is_some_and(|role| role.can_manage_others())
    }

    /// Owners may always modify their own rows; managers may modify anyone's
    pub fn can_modify(&self, owner_id: Option<&str>) -> bool {
        owner_id == Some(self.user_id.as_str()) || self.can_manage_others()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Option<RoleName>) -> Caller {
        Caller {
            user_id: "u1".to_string(),
            username: "jdoe".to_string(),
            role,
        }
    }

    #[test]
    fn test_owner_can_modify_own_row() {
        assert!(caller(Some(RoleName::User)).can_modify(Some("u1")));
    }

    #[test]
    fn test_plain_user_cannot_modify_others() {
        assert!(!caller(Some(RoleName::User)).can_modify(Some("u2")));
        assert!(!caller(None).can_modify(None));
    }

    #[test]
    fn test_director_is_privileged_but_cannot_modify_others() {
        let director = caller(Some(RoleName::Director));
        assert!(director.is_privileged());
        assert!(!director.can_modify(Some("u2")));
    }

    #[test]
    fn test_manager_can_modify_others() {
        assert!(caller(Some(RoleName::Manager)).can_modify(Some("u2")));
    }
}
