use crate::{
    file::model::FileSummary,
    organisation::service::OrganisationService,
    validation::{
        field::REQUIRED,
        upload::{validate_upload, Candidate, FIELD},
        Rejected,
    },
    Error,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use time::OffsetDateTime;
use tracing::instrument;
use venter_auth::authenticator::{error::AuthorizationError, user::UserDetails};
use venter_entity::{file, profile, user};
use venter_module_storage::service::{fs::FileSystemBackend, StorageBackend, StorageKey};

/// Which files a listing covers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// The files uploaded by the requester
    Own,
    /// All files of the requester's organisation
    Organisation,
}

pub struct FileService {
    storage: FileSystemBackend,
}

impl FileService {
    pub fn new(storage: FileSystemBackend) -> Self {
        Self { storage }
    }

    /// Fetch the files visible to the user, newest first.
    #[instrument(skip(self, connection), err)]
    pub async fn fetch_files<C: ConnectionTrait>(
        &self,
        user: &UserDetails,
        visibility: Visibility,
        connection: &C,
    ) -> Result<Vec<FileSummary>, Error> {
        let select = match (visibility, user.organisation, user.profile) {
            (Visibility::Organisation, Some(organisation), _) => file::Entity::find()
                .find_also_related(profile::Entity)
                .filter(profile::Column::OrganisationId.eq(organisation)),
            (_, _, Some(profile)) => file::Entity::find()
                .find_also_related(profile::Entity)
                .filter(file::Column::UploadedBy.eq(profile)),
            (_, _, None) => return Ok(vec![]),
        };

        let files = select
            .order_by_desc(file::Column::UploadedAt)
            .order_by_desc(file::Column::Id)
            .all(connection)
            .await?;

        let user_ids = files
            .iter()
            .filter_map(|(_, profile)| profile.as_ref().map(|p| p.user_id))
            .collect::<Vec<_>>();

        let usernames = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(connection)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect::<HashMap<_, _>>();

        Ok(files
            .into_iter()
            .map(|(file, profile)| {
                let username = profile
                    .and_then(|p| usernames.get(&p.user_id).cloned())
                    .unwrap_or_default();
                FileSummary::new(file, username)
            })
            .collect())
    }

    /// Validate and store an upload of the user.
    ///
    /// A rejected upload is reported as the inner error, without storing anything.
    #[instrument(skip(self, candidate, connection), fields(file_name), err)]
    pub async fn upload<C: ConnectionTrait>(
        &self,
        user: &UserDetails,
        candidate: Option<Candidate>,
        connection: &C,
    ) -> Result<Result<FileSummary, Rejected>, Error> {
        if let Some(candidate) = &candidate {
            tracing::Span::current().record("file_name", candidate.file_name.as_str());
        }

        let Some(profile) = self.fetch_profile(user, connection).await? else {
            return Err(AuthorizationError::Failed.into());
        };
        let Some(organisation) = profile.organisation_id else {
            log::info!("user {} is not a member of an organisation", user.username);
            return Err(AuthorizationError::Failed.into());
        };

        let rules = OrganisationService::new()
            .upload_rules(organisation, connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("organisation {organisation}")))?;

        let candidate = match (validate_upload(candidate.as_ref(), &rules), candidate) {
            (Err(rejected), _) => return Ok(Err(rejected)),
            (Ok(()), Some(candidate)) => candidate,
            (Ok(()), None) => return Ok(Err(Rejected::new(FIELD, REQUIRED))),
        };

        let size = candidate.size;
        let key = self
            .storage
            .store_buf(candidate.content)
            .await
            .map_err(|err| Error::Storage(err.into()))?;

        let file = file::ActiveModel {
            uploaded_by: Set(profile.id),
            input_file: Set(key.to_string()),
            file_name: Set(candidate.file_name),
            size: Set(i64::try_from(size).unwrap_or(i64::MAX)),
            uploaded_at: Set(OffsetDateTime::now_utc()),
            ..Default::default()
        }
        .insert(connection)
        .await?;

        log::info!(
            "stored upload '{}' of {} as {key}",
            file.file_name,
            user.username
        );

        Ok(Ok(FileSummary::new(file, user.username.clone())))
    }

    async fn fetch_profile<C: ConnectionTrait>(
        &self,
        user: &UserDetails,
        connection: &C,
    ) -> Result<Option<profile::Model>, Error> {
        Ok(match user.profile {
            Some(id) => profile::Entity::find_by_id(id).one(connection).await?,
            None => {
                profile::Entity::find()
                    .filter(profile::Column::UserId.eq(user.id))
                    .one(connection)
                    .await?
            }
        })
    }

    /// Delete a file of the organisation, including its content.
    ///
    /// Returns `false` if there is no such file in the organisation.
    #[instrument(skip(self, db), err)]
    pub async fn delete_file<C: ConnectionTrait + TransactionTrait>(
        &self,
        id: i32,
        organisation: i32,
        db: &C,
    ) -> Result<bool, Error> {
        let tx = db.begin().await?;

        let Some((file, _)) = file::Entity::find_by_id(id)
            .find_also_related(profile::Entity)
            .filter(profile::Column::OrganisationId.eq(organisation))
            .one(&tx)
            .await?
        else {
            return Ok(false);
        };

        file::Entity::delete_by_id(file.id).exec(&tx).await?;
        tx.commit().await?;

        self.prune_content([file.input_file], db).await?;

        Ok(true)
    }

    /// Delete the file rows uploaded by a profile, returning their storage keys.
    ///
    /// The content stays in place until [`Self::prune_content`] is called for the keys, after the
    /// transaction committed.
    pub async fn delete_files_of_profile<C: ConnectionTrait>(
        &self,
        profile: i32,
        connection: &C,
    ) -> Result<Vec<String>, Error> {
        let keys = file::Entity::find()
            .filter(file::Column::UploadedBy.eq(profile))
            .all(connection)
            .await?
            .into_iter()
            .map(|file| file.input_file)
            .collect();

        file::Entity::delete_many()
            .filter(file::Column::UploadedBy.eq(profile))
            .exec(connection)
            .await?;

        Ok(keys)
    }

    /// Remove stored content no longer referenced by any file.
    pub async fn prune_content<C: ConnectionTrait>(
        &self,
        keys: impl IntoIterator<Item = String>,
        connection: &C,
    ) -> Result<(), Error> {
        for key in keys {
            let references = file::Entity::find()
                .filter(file::Column::InputFile.eq(key.as_str()))
                .count(connection)
                .await?;
            if references > 0 {
                continue;
            }

            match key.parse::<StorageKey>() {
                Ok(key) => self
                    .storage
                    .delete(&key)
                    .await
                    .map_err(|err| Error::Storage(err.into()))?,
                Err(err) => log::warn!("not removing content '{key}': {err}"),
            }
        }

        Ok(())
    }
}
