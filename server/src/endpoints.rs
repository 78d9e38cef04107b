use actix_web::{get, http::header, HttpResponse, Responder};
use utoipa_actix_web::service_config::ServiceConfig;
use venter_auth::authenticator::{error::LOGIN_PATH, Authenticator};
use venter_common::db::Database;
use venter_module_storage::service::fs::FileSystemBackend;

/// Mount the application under `/venter`.
pub fn configure(
    svc: &mut ServiceConfig,
    db: Database,
    storage: FileSystemBackend,
    authenticator: Authenticator,
) {
    svc.service(index).service(
        utoipa_actix_web::scope("/venter").configure(|svc| {
            venter_module_fundamental::configure(svc, db, storage, authenticator)
        }),
    );
}

#[utoipa::path(
    responses(
        (status = 303, description = "Redirect to the login page"),
    ),
)]
#[get("/")]
/// Entry point of the application
pub async fn index() -> impl Responder {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish()
}
