//! Attaching the session user to requests

use crate::authenticator::{session, user::UserInformation, Authenticator, SESSION_COOKIE};
use actix_service::{Service, Transform};
use actix_web::{
    body::MessageBody,
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorInternalServerError,
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures::{
    future::{ok, LocalBoxFuture, Ready},
    FutureExt,
};
use std::{
    rc::Rc,
    task::{Context, Poll},
};
use venter_common::db::Database;

const BEARER_TOKEN: &str = "Bearer ";

/// Authentication middleware factory.
///
/// Validates the session token, from the session cookie or a bearer token, loads the current
/// state of its user and attaches the [`UserInformation`] to the request. Requests without a
/// live session pass through unchanged; it is up to the endpoints to require an authenticated
/// user.
pub struct Authentication {
    authenticator: Authenticator,
    db: Database,
}

impl Authentication {
    pub fn new(authenticator: Authenticator, db: Database) -> Self {
        Self { authenticator, db }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware {
            service: Rc::new(service),
            authenticator: self.authenticator.clone(),
            db: self.db.clone(),
        })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: Rc<S>,
    authenticator: Authenticator,
    db: Database,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<B>;
    type Error = S::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let authenticator = self.authenticator.clone();
        let db = self.db.clone();

        async move {
            if let Some(token) = extract_token(&req) {
                match authenticator.validate_token(&token) {
                    Ok(claims) => {
                        if let Some(details) = session::resolve(&claims, &db)
                            .await
                            .map_err(ErrorInternalServerError)?
                        {
                            req.extensions_mut()
                                .insert(UserInformation::Authenticated(details));
                        }
                    }
                    Err(err) => log::debug!("ignoring session token: {err}"),
                }
            }

            srv.call(req).await
        }
        .boxed_local()
    }
}

/// Extract the session token, preferring a bearer token over the cookie.
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_TOKEN))
        .map(|token| token.trim().to_string());

    bearer.or_else(|| {
        req.cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

/// Create the cookie carrying a session token.
pub fn session_cookie(authenticator: &Authenticator, token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(
            authenticator.ttl().as_secs().try_into().unwrap_or(i64::MAX),
        ))
        .finish()
}

/// Create a cookie removing the session cookie from the client.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}
