use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpResponse};

use crate::api::{accounts, failure};
use crate::models::{LoginRequest, NewAccountRequest, PublicAccount, Role};
use crate::services::account_service;
use crate::state::AppState;

fn session_cookie(state: &AppState, role: Role, token: String) -> Cookie<'static> {
    Cookie::build(role.cookie_name(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.cookie_secure)
        .max_age(CookieDuration::seconds(state.sessions.ttl().num_seconds()))
        .finish()
}

async fn login(state: &AppState, role: Role, request: &LoginRequest) -> HttpResponse {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔐 {} login - email: {}", role.label(), email);

    let account = match account_service::login(state.store.as_ref(), role, request).await {
        Ok(account) => account,
        Err(e) => return failure(&format!("{} login", role.label()), e),
    };

    let token = match state.sessions.issue(&account.username, role) {
        Ok(token) => token,
        Err(e) => return failure("Token issue", e),
    };

    log::info!("✅ Login successful: {}", account.username);
    HttpResponse::Ok()
        .cookie(session_cookie(state, role, token))
        .json(serde_json::json!({
            "message": "Login successful",
            (role.to_string()): account
        }))
}

fn logout(role: Role) -> HttpResponse {
    log::info!("👋 {} logout", role.label());

    let mut cookie = Cookie::build(role.cookie_name(), "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "success": true,
        "message": "Logged out"
    }))
}

#[utoipa::path(
    post,
    path = "/auth/userLogin",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; sets user_jwt", body = PublicAccount),
        (status = 400, description = "Missing fields or unknown email"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn user_login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    login(&state, Role::User, &request).await
}

#[utoipa::path(
    post,
    path = "/auth/donorLogin",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; sets donor_jwt", body = PublicAccount),
        (status = 400, description = "Missing fields or unknown email"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn donor_login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    login(&state, Role::Donor, &request).await
}

#[utoipa::path(
    post,
    path = "/auth/userSignup",
    tag = "Auth",
    request_body = NewAccountRequest,
    responses(
        (status = 201, description = "User created", body = PublicAccount),
        (status = 400, description = "Missing fields or user already exists")
    )
)]
pub async fn user_signup(
    state: web::Data<AppState>,
    request: web::Json<NewAccountRequest>,
) -> HttpResponse {
    accounts::register(&state, Role::User, &request).await
}

#[utoipa::path(
    post,
    path = "/auth/donorSignup",
    tag = "Auth",
    request_body = NewAccountRequest,
    responses(
        (status = 201, description = "Donor created", body = PublicAccount),
        (status = 400, description = "Missing fields or donor already exists")
    )
)]
pub async fn donor_signup(
    state: web::Data<AppState>,
    request: web::Json<NewAccountRequest>,
) -> HttpResponse {
    accounts::register(&state, Role::Donor, &request).await
}

pub async fn user_logout() -> HttpResponse {
    logout(Role::User)
}

pub async fn donor_logout() -> HttpResponse {
    logout(Role::Donor)
}
