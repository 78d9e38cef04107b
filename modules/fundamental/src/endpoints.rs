use venter_auth::authenticator::Authenticator;
use venter_common::db::Database;
use venter_module_storage::service::fs::FileSystemBackend;

pub fn configure(
    svc: &mut utoipa_actix_web::service_config::ServiceConfig,
    db: Database,
    storage: FileSystemBackend,
    authenticator: Authenticator,
) {
    crate::account::endpoints::configure(svc, db.clone(), storage.clone(), authenticator);
    crate::category::endpoints::configure(svc, db.clone());
    crate::contact::endpoints::configure(svc, db.clone());
    crate::file::endpoints::configure(svc, db.clone(), storage);
    crate::profile::endpoints::configure(svc, db);
}
