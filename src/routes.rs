use actix_web::web;

use crate::api;
use crate::error::AppError;
use crate::middleware::SessionAuth;

/// Registers every endpoint. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::invalid(format!("Malformed JSON body: {}", err)).into()
    }))
    .route("/health", web::get().to(api::health::health_check))
    .service(
        web::scope("/auth")
            .route("/userLogin", web::post().to(api::auth::user_login))
            .route("/donorLogin", web::post().to(api::auth::donor_login))
            .route("/userSignup", web::post().to(api::auth::user_signup))
            .route("/donorSignup", web::post().to(api::auth::donor_signup))
            .route("/u_logout", web::get().to(api::auth::user_logout))
            .route("/d_logout", web::get().to(api::auth::donor_logout)),
    )
    .service(
        web::scope("/user")
            .route("/addUser", web::post().to(api::accounts::add_user))
            .service(
                web::resource("/home")
                    .wrap(SessionAuth::user())
                    .route(web::get().to(api::accounts::user_home)),
            ),
    )
    .service(
        web::scope("/donor")
            .route("/addDonor", web::post().to(api::accounts::add_donor))
            .service(
                web::resource("/home")
                    .wrap(SessionAuth::donor())
                    .route(web::get().to(api::accounts::donor_home)),
            ),
    )
    .service(
        web::scope("/request")
            .route("/add", web::post().to(api::requests::add_request))
            .service(
                web::resource("/get")
                    .wrap(SessionAuth::user())
                    .route(web::get().to(api::requests::get_requests)),
            )
            .service(
                web::resource("/accepted")
                    .wrap(SessionAuth::user())
                    .route(web::get().to(api::requests::get_accepted_requests)),
            )
            .service(
                web::resource("/incoming")
                    .wrap(SessionAuth::donor())
                    .route(web::get().to(api::requests::get_incoming_requests)),
            )
            .service(
                web::resource("/accept/{id}")
                    .wrap(SessionAuth::donor())
                    .route(web::patch().to(api::requests::accept_request))
                    .route(web::post().to(api::requests::accept_request)),
            )
            .service(
                web::resource("/cancel/{id}")
                    .wrap(SessionAuth::user_or_donor())
                    .route(web::patch().to(api::requests::cancel_request))
                    .route(web::post().to(api::requests::cancel_request)),
            ),
    );
}
