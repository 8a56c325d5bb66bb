use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::database::FoodStore;
use crate::error::AppError;
use crate::models::{CreateRequestBody, FoodRequest, RequestFilter, RequestResponse, Role};
use crate::services::account_service::present;
use crate::services::session_service::Claims;

pub fn parse_request_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::invalid("Invalid request id"))
}

/// Creates a request with `isAccepted = false` after checking that both
/// parties exist.
pub async fn create_request(
    store: &dyn FoodStore,
    body: &CreateRequestBody,
) -> Result<RequestResponse, AppError> {
    let (Some(donor_username), Some(user_username), Some(available_food)) = (
        present(&body.donor_username),
        present(&body.user_username),
        present(&body.available_food),
    ) else {
        return Err(AppError::invalid(
            "Donor username, user username, and available food are required",
        ));
    };

    if !store.account_exists(Role::Donor, donor_username).await? {
        return Err(AppError::invalid(format!(
            "Donor with username {} does not exist",
            donor_username
        )));
    }

    if !store.account_exists(Role::User, user_username).await? {
        return Err(AppError::invalid(format!(
            "User with username {} does not exist",
            user_username
        )));
    }

    let request = FoodRequest {
        id: Some(ObjectId::new()),
        donor_username: donor_username.to_string(),
        user_username: user_username.to_string(),
        location: present(&body.location).unwrap_or_default().to_string(),
        available_food: available_food.to_string(),
        is_accepted: false,
        timestamp: BsonDateTime::now(),
    };

    store.insert_request(&request).await?;

    Ok(request.into())
}

pub async fn list_requests(
    store: &dyn FoodStore,
    filter: RequestFilter,
) -> Result<Vec<RequestResponse>, AppError> {
    let requests = store.find_requests(&filter).await?;
    Ok(requests.into_iter().map(RequestResponse::from).collect())
}

/// Requests made by `user`, optionally only those sent to `donor`.
pub async fn requests_for_user(
    store: &dyn FoodStore,
    user: &str,
    donor: Option<&str>,
) -> Result<Vec<RequestResponse>, AppError> {
    list_requests(
        store,
        RequestFilter {
            user_username: Some(user.to_string()),
            donor_username: donor.map(String::from),
            is_accepted: None,
        },
    )
    .await
}

pub async fn accepted_for_user(
    store: &dyn FoodStore,
    user: &str,
) -> Result<Vec<RequestResponse>, AppError> {
    list_requests(
        store,
        RequestFilter {
            user_username: Some(user.to_string()),
            donor_username: None,
            is_accepted: Some(true),
        },
    )
    .await
}

/// Requests addressed to `donor`, optionally only those from `user`.
pub async fn incoming_for_donor(
    store: &dyn FoodStore,
    donor: &str,
    user: Option<&str>,
) -> Result<Vec<RequestResponse>, AppError> {
    list_requests(
        store,
        RequestFilter {
            user_username: user.map(String::from),
            donor_username: Some(donor.to_string()),
            is_accepted: None,
        },
    )
    .await
}

fn is_party(request: &FoodRequest, caller: &Claims) -> bool {
    match caller.role {
        Role::Donor => request.donor_username == caller.sub,
        Role::User => request.user_username == caller.sub,
    }
}

/// Flips `isAccepted` on behalf of whichever of `callers` is allowed to.
///
/// Only the donor named on the request may accept. Cancelling is open to
/// either party. The write itself is an unconditional overwrite.
pub async fn set_accepted(
    store: &dyn FoodStore,
    id: ObjectId,
    accepted: bool,
    callers: &[Claims],
) -> Result<RequestResponse, AppError> {
    let not_found = || AppError::not_found("Request not found");

    let request = store.find_request(id).await?.ok_or_else(not_found)?;

    let allowed = callers
        .iter()
        .any(|caller| is_party(&request, caller) && (!accepted || caller.role == Role::Donor));
    if !allowed {
        let names: Vec<String> = callers
            .iter()
            .map(|caller| format!("{} {}", caller.role, caller.sub))
            .collect();
        return Err(AppError::Forbidden(format!(
            "{} may not change this request",
            names.join(", ")
        )));
    }

    store
        .set_request_accepted(id, accepted)
        .await?
        .map(RequestResponse::from)
        .ok_or_else(not_found)
}
