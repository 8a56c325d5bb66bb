use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::Role;
use crate::services::session_service::{Claims, Sessions};
use crate::state::AppState;

/// Gates a route on a session cookie for one of `roles`.
///
/// Roles are tried in order. The first verified [`Claims`] is available to
/// handlers as `web::ReqData<Claims>`, and all of them as
/// `web::ReqData<Sessions>`.
#[derive(Clone, Copy)]
pub struct SessionAuth {
    roles: &'static [Role],
}

impl SessionAuth {
    pub fn user() -> Self {
        Self { roles: &[Role::User] }
    }

    pub fn donor() -> Self {
        Self { roles: &[Role::Donor] }
    }

    pub fn user_or_donor() -> Self {
        Self {
            roles: &[Role::Donor, Role::User],
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthService {
            service,
            roles: self.roles,
        }))
    }
}

pub struct SessionAuthService<S> {
    service: S,
    roles: &'static [Role],
}

fn authenticate(req: &ServiceRequest, roles: &[Role]) -> Result<Vec<Claims>, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState not registered".to_string()))?;

    let mut verified = Vec::with_capacity(roles.len());
    for &role in roles {
        if let Some(cookie) = req.cookie(role.cookie_name()) {
            match state.sessions.verify(cookie.value(), role) {
                Ok(claims) => verified.push(claims),
                Err(_) => log::warn!("Invalid {} on {}", role.cookie_name(), req.path()),
            }
        }
    }

    if verified.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(verified)
}

impl<S, B> Service<ServiceRequest> for SessionAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req, self.roles) {
            Ok(verified) => {
                {
                    let mut extensions = req.extensions_mut();
                    extensions.insert(verified[0].clone());
                    extensions.insert(Sessions(verified));
                }

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                if e.is_server_error() {
                    log::error!("Session check failed: {}", e);
                }
                // Short-circuit: the handler never runs.
                let res = req.error_response(e).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
