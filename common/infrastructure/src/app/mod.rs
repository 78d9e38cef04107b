pub mod http;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Condition, Logger},
    App, Error,
};
use venter_auth::{authenticator::Authenticator, authorizer::Authorizer, middleware::Authentication};
use venter_common::db::Database;

pub struct AppOptions {
    pub authenticator: Authenticator,
    /// Where sessions get resolved against
    pub db: Database,
    pub authorizer: Authorizer,
    pub logger: Option<Logger>,
}

/// Build a new HTTP app in a consistent way.
///
/// The order of execution is last added becomes first to be executed.
pub fn new_app(
    options: AppOptions,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let logger = options.logger;
    App::new()
        // Attach the session user, only fails if the database does
        .wrap(Authentication::new(options.authenticator, options.db))
        // Handle authorization
        .app_data(actix_web::web::Data::new(options.authorizer))
        // First log the request, so that we know what happens
        .wrap(Condition::new(logger.is_some(), logger.unwrap_or_default()))
}
