#![allow(clippy::expect_used)]

pub mod app;
pub mod auth;
pub mod call;

use sea_orm::{ActiveModelTrait, Set};
use std::time::Duration;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use time::OffsetDateTime;
use tracing::instrument;
use venter_auth::authenticator::{password::hash_password, user::UserDetails, Authenticator};
use venter_common::db::Database;
use venter_entity::{
    category, header, organisation, profile, role::Role, upload_format::UploadFormat, user,
};
use venter_module_storage::service::fs::FileSystemBackend;

/// The password of all users created by the context.
pub const TEST_PASSWORD: &str = "pass@1234";

const TEST_SECRET: &[u8] = b"venter-test-context";

pub struct VenterContext {
    pub db: Database,
    pub storage: FileSystemBackend,
    pub authenticator: Authenticator,
    _storage_dir: TempDir,
}

impl VenterContext {
    async fn new(db: Database) -> Self {
        let (storage, storage_dir) = FileSystemBackend::for_test()
            .await
            .expect("initializing the storage backend");

        Self {
            db,
            storage,
            authenticator: Authenticator::new(TEST_SECRET, Duration::from_secs(60 * 60)),
            _storage_dir: storage_dir,
        }
    }

    pub async fn create_organisation(
        &self,
        name: &str,
        upload_format: UploadFormat,
    ) -> Result<organisation::Model, anyhow::Error> {
        Ok(organisation::ActiveModel {
            name: Set(name.to_string()),
            phone_number: Set(String::new()),
            profile_picture: Set(None),
            user_id: Set(None),
            upload_format: Set(upload_format),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Create an active user, with a profile in the organisation.
    ///
    /// The password is [`TEST_PASSWORD`], the email `<username>@example.com`.
    pub async fn create_user(
        &self,
        username: &str,
        role: Role,
        organisation: Option<i32>,
    ) -> Result<UserDetails, anyhow::Error> {
        let user = user::ActiveModel {
            username: Set(username.to_string()),
            password: Set(hash_password(TEST_PASSWORD)?),
            email: Set(format!("{username}@example.com")),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            role: Set(role),
            is_active: Set(true),
            date_joined: Set(OffsetDateTime::now_utc()),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        let profile = profile::ActiveModel {
            user_id: Set(user.id),
            organisation_id: Set(organisation),
            phone_number: Set(String::new()),
            profile_picture: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok((user, Some(profile)).into())
    }

    pub async fn add_categories(
        &self,
        organisation: i32,
        categories: &[&str],
    ) -> Result<(), anyhow::Error> {
        for name in categories {
            category::ActiveModel {
                category: Set(name.to_string()),
                organisation_id: Set(Some(organisation)),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;
        }
        Ok(())
    }

    pub async fn add_headers(
        &self,
        organisation: i32,
        headers: &[&str],
    ) -> Result<(), anyhow::Error> {
        for name in headers {
            header::ActiveModel {
                header: Set(name.to_string()),
                organisation_id: Set(Some(organisation)),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;
        }
        Ok(())
    }
}

impl AsyncTestContext for VenterContext {
    #[instrument]
    async fn setup() -> VenterContext {
        let db = Database::for_test()
            .await
            .expect("creating an in-memory database");

        VenterContext::new(db).await
    }

    async fn teardown(self) {
        if let Err(err) = self.db.close().await {
            log::warn!("failed to close the database: {err}");
        }
    }
}
