use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Stored user or donor. Both collections share this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    /// bcrypt hash, never the plain password
    pub password: String,
    pub mobile_number: String,
    pub address: String,
    pub created_at: Option<BsonDateTime>,
}

/// Signup / add-account payload. Every field is required, but they are
/// optional here so a missing one becomes a 400 with our own message.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAccountRequest {
    pub username: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Account fields that are safe to send to a client.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub mobile_number: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<Account> for PublicAccount {
    fn from(account: Account) -> Self {
        PublicAccount {
            id: account.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: account.username,
            email: account.email,
            mobile_number: account.mobile_number,
            address: account.address,
            created_at: account
                .created_at
                .and_then(|at| at.try_to_rfc3339_string().ok()),
        }
    }
}
