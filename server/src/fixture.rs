//! Onboarding of organisations from a JSON document.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tracing::instrument;
use venter_common::db::Database;
use venter_entity::{role::Role, upload_format::UploadFormat};
use venter_module_fundamental::{
    account::{model::NewUser, service::AccountService},
    category::service::CategoryService,
    header::service::HeaderService,
    organisation::{model::NewOrganisation, service::OrganisationService},
};
use venter_module_storage::service::fs::FileSystemBackend;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub organisations: Vec<OrganisationFixture>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OrganisationFixture {
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    pub upload_format: UploadFormat,
    /// The expected header row of uploaded CSV files
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub users: Vec<UserFixture>,
}

#[derive(Clone, Deserialize)]
pub struct UserFixture {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone_number: String,
    /// Make this user the owner of the organisation
    #[serde(default)]
    pub owner: bool,
}

impl std::fmt::Debug for UserFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserFixture")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

impl Fixture {
    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("unable to read fixture: {}", path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("unable to parse fixture: {}", path.display()))
    }
}

/// Load all organisations of the fixture.
///
/// Organisations which already exist, by name, are skipped. Returns the number of created
/// organisations.
#[instrument(skip_all, err)]
pub async fn load(
    fixture: Fixture,
    db: &Database,
    storage: FileSystemBackend,
) -> anyhow::Result<usize> {
    let organisations = OrganisationService::new();
    let headers = HeaderService::new();
    let categories = CategoryService::new();
    let accounts = AccountService::new(storage);

    let mut created = 0;

    for org in fixture.organisations {
        if organisations
            .fetch_organisation_by_name(&org.name, db)
            .await?
            .is_some()
        {
            log::info!("organisation '{}' exists, skipping", org.name);
            continue;
        }

        let organisation = organisations
            .create_organisation(
                NewOrganisation {
                    name: org.name,
                    phone_number: org.phone_number,
                    profile_picture: None,
                    owner: None,
                    upload_format: org.upload_format,
                },
                db,
            )
            .await?;

        headers.add_headers(organisation.id, org.headers, db).await?;
        categories
            .add_categories(organisation.id, org.categories, db)
            .await?;

        for user in org.users {
            let owner = user.owner;
            let details = accounts
                .create_user(
                    NewUser {
                        username: user.username,
                        password: user.password,
                        email: user.email,
                        first_name: user.first_name,
                        last_name: user.last_name,
                        role: user.role,
                        organisation: Some(organisation.id),
                        phone_number: user.phone_number,
                    },
                    db,
                )
                .await?;

            if owner {
                organisations
                    .assign_owner(organisation.id, details.id, db)
                    .await?;
            }
        }

        created += 1;
    }

    Ok(created)
}
