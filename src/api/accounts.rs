use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::models::{NewAccountRequest, PublicAccount, Role};
use crate::services::{account_service, session_service::Claims};
use crate::state::AppState;

/// Shared by add-user/add-donor and the signup endpoints.
pub(crate) async fn register(
    state: &AppState,
    role: Role,
    request: &NewAccountRequest,
) -> HttpResponse {
    let username = request.username.as_deref().unwrap_or("N/A");
    log::info!("📝 Registering {} {}", role, username);

    match account_service::create_account(state.store.as_ref(), role, request, state.bcrypt_cost)
        .await
    {
        Ok(account) => {
            log::info!("✅ {} created: {}", role.label(), account.username);
            HttpResponse::Created().json(serde_json::json!({
                "message": format!("{} created successfully", role.label()),
                (role.to_string()): account
            }))
        }
        Err(e) => failure(&format!("Register {}", role), e),
    }
}

#[utoipa::path(
    post,
    path = "/user/addUser",
    tag = "Accounts",
    request_body = NewAccountRequest,
    responses(
        (status = 201, description = "User created", body = PublicAccount),
        (status = 400, description = "Missing fields or user already exists")
    )
)]
pub async fn add_user(
    state: web::Data<AppState>,
    request: web::Json<NewAccountRequest>,
) -> HttpResponse {
    register(&state, Role::User, &request).await
}

#[utoipa::path(
    post,
    path = "/donor/addDonor",
    tag = "Accounts",
    request_body = NewAccountRequest,
    responses(
        (status = 201, description = "Donor created", body = PublicAccount),
        (status = 400, description = "Missing fields or donor already exists")
    )
)]
pub async fn add_donor(
    state: web::Data<AppState>,
    request: web::Json<NewAccountRequest>,
) -> HttpResponse {
    register(&state, Role::Donor, &request).await
}

async fn home(state: &AppState, claims: &Claims) -> HttpResponse {
    log::info!("👤 GET /{}/home - {}", claims.role, claims.sub);

    match account_service::profile(state.store.as_ref(), claims.role, &claims.sub).await {
        Ok(account) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            (claims.role.to_string()): account
        })),
        Err(e) => failure("Profile lookup", e),
    }
}

#[utoipa::path(
    get,
    path = "/user/home",
    tag = "Accounts",
    responses(
        (status = 200, description = "Signed-in user's profile", body = PublicAccount),
        (status = 401, description = "Missing or invalid user_jwt"),
        (status = 404, description = "User not found")
    ),
    security(("user_jwt" = []))
)]
pub async fn user_home(state: web::Data<AppState>, claims: web::ReqData<Claims>) -> HttpResponse {
    home(&state, &claims).await
}

#[utoipa::path(
    get,
    path = "/donor/home",
    tag = "Accounts",
    responses(
        (status = 200, description = "Signed-in donor's profile", body = PublicAccount),
        (status = 401, description = "Missing or invalid donor_jwt"),
        (status = 404, description = "Donor not found")
    ),
    security(("donor_jwt" = []))
)]
pub async fn donor_home(state: web::Data<AppState>, claims: web::ReqData<Claims>) -> HttpResponse {
    home(&state, &claims).await
}
