use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::AppError;
use crate::models::{Account, FoodRequest, RequestFilter, Role};

/// Persistence seam for accounts and food requests.
///
/// Every method is a single store round-trip. Listing is always ordered by
/// request `timestamp` ascending.
#[async_trait]
pub trait FoodStore: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    async fn account_exists(&self, role: Role, username: &str) -> Result<bool, AppError>;

    /// True when either the username or the email is already registered.
    async fn account_taken(&self, role: Role, username: &str, email: &str)
        -> Result<bool, AppError>;

    async fn find_account_by_email(&self, role: Role, email: &str)
        -> Result<Option<Account>, AppError>;

    async fn find_account_by_username(
        &self,
        role: Role,
        username: &str,
    ) -> Result<Option<Account>, AppError>;

    async fn insert_account(&self, role: Role, account: &Account) -> Result<(), AppError>;

    async fn insert_request(&self, request: &FoodRequest) -> Result<(), AppError>;

    async fn find_request(&self, id: ObjectId) -> Result<Option<FoodRequest>, AppError>;

    async fn find_requests(&self, filter: &RequestFilter) -> Result<Vec<FoodRequest>, AppError>;

    /// Overwrites `isAccepted` and returns the updated record, or `None` if
    /// the id is unknown. Never inserts.
    async fn set_request_accepted(
        &self,
        id: ObjectId,
        accepted: bool,
    ) -> Result<Option<FoodRequest>, AppError>;
}
