pub mod accounts;
pub mod auth;
pub mod health;
pub mod requests;
pub mod swagger;


use actix_web::{HttpResponse, ResponseError};

use crate::error::AppError;

/// Logs a failed operation at the level its status deserves and renders it.
pub(crate) fn failure(context: &str, e: AppError) -> HttpResponse {
    if e.is_server_error() {
        log::error!("❌ {} failed: {}", context, e);
    } else {
        log::warn!("⚠️ {} rejected: {}", context, e);
    }
    e.error_response()
}
