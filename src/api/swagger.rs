use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Food Donation Service API",
        version = "1.0.0",
        description = "Donors list available food, recipients request it, and the donor named on a request accepts or cancels it.\n\n**Authentication:** protected endpoints read a signed session cookie, `user_jwt` for recipients or `donor_jwt` for donors, set by the login endpoints."
    ),
    paths(
        // Auth
        crate::api::auth::user_login,
        crate::api::auth::donor_login,
        crate::api::auth::user_signup,
        crate::api::auth::donor_signup,

        // Accounts
        crate::api::accounts::add_user,
        crate::api::accounts::add_donor,
        crate::api::accounts::user_home,
        crate::api::accounts::donor_home,

        // Requests
        crate::api::requests::add_request,
        crate::api::requests::get_requests,
        crate::api::requests::get_accepted_requests,
        crate::api::requests::get_incoming_requests,
        crate::api::requests::accept_request,
        crate::api::requests::cancel_request,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::NewAccountRequest,
            crate::models::LoginRequest,
            crate::models::PublicAccount,
            crate::models::CreateRequestBody,
            crate::models::RequestResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Signup, login and logout for users and donors."),
        (name = "Accounts", description = "Account creation and the signed-in profile."),
        (name = "Requests", description = "Food request lifecycle: create, list, accept, cancel."),
        (name = "Health", description = "Service health."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            for cookie in ["user_jwt", "donor_jwt"] {
                components.add_security_scheme(
                    cookie,
                    SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(cookie))),
                );
            }
        }
    }
}
