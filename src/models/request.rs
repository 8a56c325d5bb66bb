use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// A recipient's ask directed at one donor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub donor_username: String,
    pub user_username: String,
    #[serde(default)]
    pub location: String,
    pub available_food: String,
    #[serde(default)]
    pub is_accepted: bool,
    pub timestamp: BsonDateTime,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub donor_username: Option<String>,
    pub user_username: Option<String>,
    pub location: Option<String>,
    pub available_food: Option<String>,
}

/// Store-level filter. `None` fields do not constrain the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFilter {
    pub user_username: Option<String>,
    pub donor_username: Option<String>,
    pub is_accepted: Option<bool>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub donor_username: String,
    pub user_username: String,
    pub location: String,
    pub available_food: String,
    pub is_accepted: bool,
    pub timestamp: String,
}

impl From<FoodRequest> for RequestResponse {
    fn from(request: FoodRequest) -> Self {
        RequestResponse {
            id: request.id.map(|id| id.to_hex()).unwrap_or_default(),
            donor_username: request.donor_username,
            user_username: request.user_username,
            location: request.location,
            available_food: request.available_food,
            is_accepted: request.is_accepted,
            timestamp: request.timestamp.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}
