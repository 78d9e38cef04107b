use crate::{app::TestApp, VenterContext};
use actix_http::Request;
use actix_web::{
    dev::{Service, ServiceResponse},
    App, Error,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::future::Future;
use utoipa_actix_web::{service_config::ServiceConfig, AppExt};
use venter_auth::middleware::Authentication;

/// A trait wrapping an `impl Service` in a way that we can pass it as a reference.
pub trait CallService {
    fn call_service(&self, s: Request) -> impl Future<Output = ServiceResponse>;
    fn call_and_read_body(&self, r: Request) -> impl Future<Output = Bytes>;
    fn call_and_read_body_json<T: DeserializeOwned>(&self, r: Request) -> impl Future<Output = T>;
}

impl<S> CallService for S
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    async fn call_service(&self, r: Request) -> ServiceResponse {
        actix_web::test::call_service(self, r).await
    }

    async fn call_and_read_body(&self, r: Request) -> Bytes {
        actix_web::test::call_and_read_body(self, r).await
    }

    async fn call_and_read_body_json<T: DeserializeOwned>(&self, r: Request) -> T {
        actix_web::test::call_and_read_body_json(self, r).await
    }
}

/// Create a service for the endpoints registered by `configure`, mounted at `/venter`.
///
/// Requests are authenticated with the context's authenticator and authorized with the default
/// role permissions.
pub async fn caller<F>(ctx: &VenterContext, configure: F) -> anyhow::Result<impl CallService>
where
    F: FnOnce(&mut ServiceConfig),
{
    let app = App::new()
        .into_utoipa_app()
        .add_test_authorizer()
        .service(utoipa_actix_web::scope("/venter").configure(configure))
        .into_app()
        .wrap(Authentication::new(ctx.authenticator.clone(), ctx.db.clone()));

    Ok(actix_web::test::init_service(app).await)
}
