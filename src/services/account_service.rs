use actix_web::web;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::database::FoodStore;
use crate::error::AppError;
use crate::models::{Account, LoginRequest, NewAccountRequest, PublicAccount, Role};

/// Returns the trimmed value, or `None` when the field is absent or blank.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    web::block(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn password_matches(password: String, hash: String) -> Result<bool, AppError> {
    web::block(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))
}

/// Registers a user or donor. Backs both the add-account and the signup
/// endpoints.
pub async fn create_account(
    store: &dyn FoodStore,
    role: Role,
    request: &NewAccountRequest,
    bcrypt_cost: u32,
) -> Result<PublicAccount, AppError> {
    let (Some(username), Some(mobile_number), Some(email), Some(password), Some(address)) = (
        present(&request.username),
        present(&request.mobile_number),
        present(&request.email),
        // Passwords are taken verbatim; only emptiness is checked.
        request.password.as_deref().filter(|p| !p.is_empty()),
        present(&request.address),
    ) else {
        return Err(AppError::invalid("All fields are required"));
    };

    if store.account_taken(role, username, email).await? {
        return Err(AppError::invalid(format!("{} already exists", role.label())));
    }

    let account = Account {
        id: Some(ObjectId::new()),
        username: username.to_string(),
        email: email.to_string(),
        password: hash_password(password.to_string(), bcrypt_cost).await?,
        mobile_number: mobile_number.to_string(),
        address: address.to_string(),
        created_at: Some(BsonDateTime::now()),
    };

    store.insert_account(role, &account).await?;
    log::info!("{} added: {}", role.label(), account.username);

    Ok(account.into())
}

/// Checks credentials and returns the account on success.
pub async fn login(
    store: &dyn FoodStore,
    role: Role,
    request: &LoginRequest,
) -> Result<PublicAccount, AppError> {
    let (Some(email), Some(password)) = (
        present(&request.email),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::invalid("All fields are required"));
    };

    let account = store
        .find_account_by_email(role, email)
        .await?
        .ok_or_else(|| AppError::invalid(format!("{} does not exist", role.label())))?;

    if !password_matches(password.to_string(), account.password.clone()).await? {
        return Err(AppError::InvalidCredentials);
    }

    Ok(account.into())
}

pub async fn profile(
    store: &dyn FoodStore,
    role: Role,
    username: &str,
) -> Result<PublicAccount, AppError> {
    store
        .find_account_by_username(role, username)
        .await?
        .map(PublicAccount::from)
        .ok_or_else(|| AppError::not_found(format!("{} not found", role.label())))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    pub(crate) const TEST_COST: u32 = 4;

    pub(crate) fn signup(username: &str, email: &str) -> NewAccountRequest {
        NewAccountRequest {
            username: Some(username.to_string()),
            mobile_number: Some("9876543210".to_string()),
            email: Some(email.to_string()),
            password: Some("hunter22".to_string()),
            address: Some("4 Lake Road".to_string()),
        }
    }

    fn credentials(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[actix_rt::test]
    async fn stores_bcrypt_hash_not_plain_password() {
        let store = MemoryStore::new();
        create_account(&store, Role::User, &signup("meera", "meera@example.com"), TEST_COST)
            .await
            .unwrap();

        let stored = store
            .find_account_by_username(Role::User, "meera")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password, "hunter22");
        assert!(bcrypt::verify("hunter22", &stored.password).unwrap());
    }

    #[actix_rt::test]
    async fn rejects_missing_fields() {
        let store = MemoryStore::new();
        let mut request = signup("meera", "meera@example.com");
        request.address = Some("   ".to_string());

        let err = create_account(&store, Role::User, &request, TEST_COST)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[actix_rt::test]
    async fn rejects_duplicate_username_or_email() {
        let store = MemoryStore::new();
        create_account(&store, Role::Donor, &signup("bakery", "b@example.com"), TEST_COST)
            .await
            .unwrap();

        let same_email = create_account(
            &store,
            Role::Donor,
            &signup("bakery2", "b@example.com"),
            TEST_COST,
        )
        .await
        .unwrap_err();
        assert_eq!(same_email.to_string(), "Donor already exists");

        // Collections are separate per role.
        assert!(
            create_account(&store, Role::User, &signup("bakery", "b@example.com"), TEST_COST)
                .await
                .is_ok()
        );
    }

    #[actix_rt::test]
    async fn login_checks_password() {
        let store = MemoryStore::new();
        create_account(&store, Role::User, &signup("meera", "meera@example.com"), TEST_COST)
            .await
            .unwrap();

        let account = login(&store, Role::User, &credentials("meera@example.com", "hunter22"))
            .await
            .unwrap();
        assert_eq!(account.username, "meera");

        let wrong = login(&store, Role::User, &credentials("meera@example.com", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, AppError::InvalidCredentials));
    }

    #[actix_rt::test]
    async fn login_unknown_email_is_client_error() {
        let store = MemoryStore::new();
        let err = login(&store, Role::Donor, &credentials("ghost@example.com", "x"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Donor does not exist");
    }

    #[actix_rt::test]
    async fn profile_of_missing_account_is_not_found() {
        let store = MemoryStore::new();
        let err = profile(&store, Role::Donor, "nobody").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
