use crate::{
    profile::model::{ProfileDetails, ProfileForm},
    validation::{field, Pipeline, Rejected},
    Error,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use tracing::instrument;
use venter_auth::authenticator::{error::AuthorizationError, user::UserDetails};
use venter_entity::{organisation, profile, user};

#[derive(Default)]
pub struct ProfileService {}

impl ProfileService {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn fetch_profile<C: ConnectionTrait>(
        &self,
        user_id: i32,
        connection: &C,
    ) -> Result<Option<ProfileDetails>, Error> {
        let Some((user, Some(profile))) = user::Entity::find_by_id(user_id)
            .find_also_related(profile::Entity)
            .one(connection)
            .await?
        else {
            return Ok(None);
        };

        let organisation = match profile.organisation_id {
            Some(id) => organisation::Entity::find_by_id(id)
                .one(connection)
                .await?
                .map(Into::into),
            None => None,
        };

        Ok(Some(ProfileDetails {
            user_id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            organisation,
            phone_number: profile.phone_number,
            profile_picture: profile.profile_picture,
        }))
    }

    /// Check if the requester may access the profile of a user.
    ///
    /// Users may access their own profile, admins the profiles of their organisation.
    pub async fn check_access<C: ConnectionTrait>(
        &self,
        requester: &UserDetails,
        user_id: i32,
        connection: &C,
    ) -> Result<(), Error> {
        if requester.id == user_id {
            return Ok(());
        }

        let target = profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("profile of user {user_id}")))?;

        match (requester.is_admin(), requester.organisation) {
            (true, Some(organisation)) if target.organisation_id == Some(organisation) => Ok(()),
            _ => {
                log::debug!(
                    "user {} may not access the profile of user {user_id}",
                    requester.username
                );
                Err(AuthorizationError::Failed.into())
            }
        }
    }

    /// Update the contact information of a profile.
    #[instrument(skip(self, connection), err)]
    pub async fn update_profile<C: ConnectionTrait>(
        &self,
        user_id: i32,
        form: ProfileForm,
        connection: &C,
    ) -> Result<Result<ProfileDetails, Rejected>, Error> {
        let form = ProfileForm {
            phone_number: form.phone_number.trim().to_string(),
        };

        let outcome = Pipeline::<ProfileForm>::new()
            .check(
                "phone_number",
                |f| f.phone_number.is_empty() || field::is_valid_phone_number(&f.phone_number),
                field::INVALID_PHONE_NUMBER,
            )
            .validate(&form);
        if let Err(rejected) = outcome {
            return Ok(Err(rejected));
        }

        let profile = profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("profile of user {user_id}")))?;

        let mut profile = profile.into_active_model();
        profile.phone_number = Set(form.phone_number);
        profile.update(connection).await?;

        self.fetch_profile(user_id, connection)
            .await?
            .map(Ok)
            .ok_or_else(|| Error::NotFound(format!("profile of user {user_id}")))
    }
}
