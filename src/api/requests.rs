use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::failure;
use crate::models::{CreateRequestBody, RequestResponse};
use crate::services::request_service;
use crate::services::session_service::{Claims, Sessions};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetRequestsQuery {
    /// Only requests sent to this donor
    pub donor: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IncomingQuery {
    /// Only requests made by this user
    pub user: Option<String>,
}

#[utoipa::path(
    post,
    path = "/request/add",
    tag = "Requests",
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request created", body = RequestResponse),
        (status = 400, description = "Missing fields or unknown donor/user")
    )
)]
pub async fn add_request(
    state: web::Data<AppState>,
    body: web::Json<CreateRequestBody>,
) -> HttpResponse {
    log::info!(
        "📦 POST /request/add - donor: {:?}, user: {:?}",
        body.donor_username,
        body.user_username
    );

    match request_service::create_request(state.store.as_ref(), &body).await {
        Ok(request) => {
            log::info!("✅ Request created: {}", request.id);
            HttpResponse::Created().json(serde_json::json!({
                "message": "Request created successfully",
                "request": request
            }))
        }
        Err(e) => failure("Create request", e),
    }
}

#[utoipa::path(
    get,
    path = "/request/get",
    tag = "Requests",
    params(GetRequestsQuery),
    responses(
        (status = 200, description = "Caller's requests, oldest first", body = [RequestResponse]),
        (status = 401, description = "Missing or invalid user_jwt")
    ),
    security(("user_jwt" = []))
)]
pub async fn get_requests(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    query: web::Query<GetRequestsQuery>,
) -> HttpResponse {
    log::info!("📋 GET /request/get - user: {}, donor: {:?}", claims.sub, query.donor);

    let donor = query.donor.as_deref();
    match request_service::requests_for_user(state.store.as_ref(), &claims.sub, donor).await {
        Ok(requests) => {
            log::info!("✅ Listed {} requests", requests.len());
            HttpResponse::Ok().json(serde_json::json!({ "requests": requests }))
        }
        Err(e) => failure("List requests", e),
    }
}

#[utoipa::path(
    get,
    path = "/request/accepted",
    tag = "Requests",
    responses(
        (status = 200, description = "Caller's accepted requests", body = [RequestResponse]),
        (status = 401, description = "Missing or invalid user_jwt")
    ),
    security(("user_jwt" = []))
)]
pub async fn get_accepted_requests(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    log::info!("📋 GET /request/accepted - user: {}", claims.sub);

    match request_service::accepted_for_user(state.store.as_ref(), &claims.sub).await {
        Ok(accepted) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "acceptedRequests": accepted
        })),
        Err(e) => failure("List accepted requests", e),
    }
}

#[utoipa::path(
    get,
    path = "/request/incoming",
    tag = "Requests",
    params(IncomingQuery),
    responses(
        (
            status = 200,
            description = "Requests addressed to the caller, oldest first",
            body = [RequestResponse]
        ),
        (status = 401, description = "Missing or invalid donor_jwt")
    ),
    security(("donor_jwt" = []))
)]
pub async fn get_incoming_requests(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    query: web::Query<IncomingQuery>,
) -> HttpResponse {
    log::info!("📥 GET /request/incoming - donor: {}, user: {:?}", claims.sub, query.user);

    let user = query.user.as_deref();
    match request_service::incoming_for_donor(state.store.as_ref(), &claims.sub, user).await {
        Ok(requests) => HttpResponse::Ok().json(serde_json::json!({ "requests": requests })),
        Err(e) => failure("List incoming requests", e),
    }
}

async fn set_accepted(
    state: &AppState,
    raw_id: &str,
    accepted: bool,
    callers: &[Claims],
) -> HttpResponse {
    let action = if accepted { "accept" } else { "cancel" };
    for caller in callers {
        log::info!("🔧 /request/{}/{} by {} {}", action, raw_id, caller.role, caller.sub);
    }

    let id = match request_service::parse_request_id(raw_id) {
        Ok(id) => id,
        Err(e) => return failure(action, e),
    };

    match request_service::set_accepted(state.store.as_ref(), id, accepted, callers).await {
        Ok(request) => {
            log::info!("✅ Request {} isAccepted={}", request.id, request.is_accepted);
            HttpResponse::Ok().json(request)
        }
        Err(e) => failure(action, e),
    }
}

#[utoipa::path(
    patch,
    path = "/request/accept/{id}",
    tag = "Requests",
    params(("id" = String, Path, description = "Request id")),
    responses(
        (status = 200, description = "Updated request", body = RequestResponse),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Missing or invalid donor_jwt"),
        (status = 403, description = "Caller is not the request's donor"),
        (status = 404, description = "Request not found")
    ),
    security(("donor_jwt" = []))
)]
pub async fn accept_request(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> HttpResponse {
    set_accepted(&state, &path, true, std::slice::from_ref(&*claims)).await
}

#[utoipa::path(
    patch,
    path = "/request/cancel/{id}",
    tag = "Requests",
    params(("id" = String, Path, description = "Request id")),
    responses(
        (status = 200, description = "Updated request", body = RequestResponse),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "No valid session"),
        (status = 403, description = "No verified session is a party to the request"),
        (status = 404, description = "Request not found")
    ),
    security(("donor_jwt" = []), ("user_jwt" = []))
)]
pub async fn cancel_request(
    state: web::Data<AppState>,
    sessions: web::ReqData<Sessions>,
    path: web::Path<String>,
) -> HttpResponse {
    set_accepted(&state, &path, false, &sessions.0).await
}
