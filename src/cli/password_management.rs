use std::sync::Arc;

use crate::app_data::AppData;
use crate::services::UserService;

/// Set the password of an existing account by username
pub async fn set_password(
    app_data: Arc<AppData>,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    UserService::new(app_data)
        .set_password_for_username(username, password)
        .await?;

    println!("✓ Password updated for '{}'", username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AuthService;
    use crate::test::utils::{create_user, setup_test_app_data};

    #[tokio::test]
    async fn test_set_password_enables_login() {
        let app_data = setup_test_app_data().await;
        create_user(&app_data.db, "jdoe", None).await;

        set_password(Arc::clone(&app_data), "jdoe", "long-enough-pw").await.unwrap();

        let login = AuthService::new(app_data).login("jdoe", "long-enough-pw").await;
        assert!(login.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_username_fails() {
        let app_data = setup_test_app_data().await;
        assert!(set_password(app_data, "ghost", "long-enough-pw").await.is_err());
    }
}
