pub mod endpoints;
pub mod fixture;
pub mod openapi;

use anyhow::Context;
use std::{path::Path, process::ExitCode};
use venter_auth::{auth::AuthConfigArguments, authenticator::Authenticator};
use venter_common::{config::Database, db};
use venter_infrastructure::app::http::{HttpServerBuilder, HttpServerConfig};
use venter_module_storage::{config::StorageConfig, service::fs::FileSystemBackend};

/// Run the API server
#[derive(clap::Args, Debug, Clone)]
pub struct Run {
    #[command(flatten)]
    pub database: Database,

    #[command(flatten)]
    pub storage: StorageConfig,

    #[command(flatten)]
    pub auth: AuthConfigArguments,

    #[command(flatten)]
    pub http: HttpServerConfig,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let context = InitData::new(self.database, self.storage).await?;
        let authenticator = Authenticator::from_config(&self.auth);
        let db = context.db.clone();

        let http = HttpServerBuilder::try_from(self.http)?
            .authenticator(authenticator.clone())
            .database(db)
            .openapi_info(openapi::info())
            .configure(move |svc| {
                endpoints::configure(
                    svc,
                    context.db.clone(),
                    context.storage.clone(),
                    authenticator.clone(),
                )
            });

        http.run().await?;

        Ok(ExitCode::SUCCESS)
    }
}

/// The database and storage, ready to serve requests.
#[derive(Clone, Debug)]
pub struct InitData {
    pub db: db::Database,
    pub storage: FileSystemBackend,
}

impl InitData {
    /// Connect to the database, applying pending migrations, and open the storage.
    pub async fn new(database: Database, storage: StorageConfig) -> anyhow::Result<Self> {
        if let Some(dir) = sqlite_dir(&database.url) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("unable to create database directory: {}", dir.display()))?;
        }

        let db = db::Database::bootstrap(&database).await?;

        log::info!("storage: {}", storage.fs_path.display());
        let storage = FileSystemBackend::new(storage.fs_path).await?;

        Ok(Self { db, storage })
    }
}

/// The directory holding a file based SQLite database, if the URL points to one.
fn sqlite_dir(url: &str) -> Option<&Path> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;

    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn sqlite_directory() {
        assert_eq!(
            sqlite_dir("sqlite://.venter/venter.db?mode=rwc"),
            Some(Path::new(".venter"))
        );
        assert_eq!(sqlite_dir("sqlite://venter.db"), None);
        assert_eq!(sqlite_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_dir("postgres://venter@localhost/venter"), None);
    }

    #[test(tokio::test)]
    async fn init_data() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let database = Database {
            url: format!(
                "sqlite://{}?mode=rwc",
                dir.path().join("db").join("venter.db").display()
            ),
            ..Default::default()
        };
        let storage = StorageConfig {
            fs_path: dir.path().join("storage"),
        };

        let context = InitData::new(database, storage).await?;
        context.db.ping().await?;
        assert!(dir.path().join("db").is_dir());
        assert!(dir.path().join("storage").join("content").is_dir());

        Ok(())
    }
}
