use crate::{
    account::model::{NewUser, RegisterEmployeeForm},
    file::service::FileService,
    validation::{
        field,
        password::{check_password, UserAttributes},
        Pipeline, Rejected,
    },
    Error,
};
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;
use venter_auth::authenticator::{
    password::{check_password as verify_password, hash_password},
    user::UserDetails,
};
use venter_common::db::DatabaseErrors;
use venter_entity::{organisation, password_reset, profile, role::Role, user};
use venter_module_storage::service::fs::FileSystemBackend;

/// The time a password reset token can be used.
pub const RESET_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// The outcome of redeeming a password reset token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The token is unknown, used or expired
    InvalidLink,
    Rejected(Rejected),
    Done,
}

pub struct AccountService {
    files: FileService,
}

impl AccountService {
    pub fn new(storage: FileSystemBackend) -> Self {
        Self {
            files: FileService::new(storage),
        }
    }

    /// Check the credentials of an active user.
    #[instrument(skip(self, password, connection), err)]
    pub async fn authenticate<C: ConnectionTrait>(
        &self,
        username: &str,
        password: &str,
        connection: &C,
    ) -> Result<Option<UserDetails>, Error> {
        let Some(user) = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::IsActive.eq(true))
            .one(connection)
            .await?
        else {
            return Ok(None);
        };

        if !verify_password(password, &user.password) {
            log::info!("failed login of {username}");
            return Ok(None);
        }

        let mut active = user.into_active_model();
        active.last_login = Set(Some(OffsetDateTime::now_utc()));
        let user = active.update(connection).await?;

        Ok(Some(self.user_details(user, connection).await?))
    }

    async fn user_details<C: ConnectionTrait>(
        &self,
        user: user::Model,
        connection: &C,
    ) -> Result<UserDetails, Error> {
        let profile = profile::Entity::find()
            .filter(profile::Column::UserId.eq(user.id))
            .one(connection)
            .await?;

        Ok((user, profile).into())
    }

    /// End all sessions issued to the user so far.
    #[instrument(skip(self, connection), err)]
    pub async fn end_sessions<C: ConnectionTrait>(
        &self,
        user_id: i32,
        connection: &C,
    ) -> Result<(), Error> {
        user::Entity::update_many()
            .col_expr(
                user::Column::SessionVersion,
                Expr::col(user::Column::SessionVersion).add(1),
            )
            .filter(user::Column::Id.eq(user_id))
            .exec(connection)
            .await?;

        Ok(())
    }

    /// Create a user, together with its profile.
    ///
    /// The password is taken as is, without checking its strength.
    #[instrument(skip(self, db), err)]
    pub async fn create_user<C: ConnectionTrait + TransactionTrait>(
        &self,
        new: NewUser,
        db: &C,
    ) -> Result<UserDetails, Error> {
        let password = hash_password(&new.password).map_err(|err| Error::Any(err.into()))?;

        let tx = db.begin().await?;

        let user = user::ActiveModel {
            username: Set(new.username),
            password: Set(password),
            email: Set(new.email),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            role: Set(new.role),
            is_active: Set(true),
            date_joined: Set(OffsetDateTime::now_utc()),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(&tx)
        .await?;

        let profile = profile::ActiveModel {
            user_id: Set(user.id),
            organisation_id: Set(new.organisation),
            phone_number: Set(new.phone_number),
            profile_picture: Set(None),
            ..Default::default()
        }
        .insert(&tx)
        .await?;

        tx.commit().await?;

        log::info!("created user {} ({})", user.username, user.role);

        Ok((user, Some(profile)).into())
    }

    /// Register an employee in the organisation of the admin.
    #[instrument(skip(self, db), err)]
    pub async fn register_employee<C: ConnectionTrait + TransactionTrait>(
        &self,
        admin: &UserDetails,
        form: RegisterEmployeeForm,
        db: &C,
    ) -> Result<Result<UserDetails, Rejected>, Error> {
        let username = Pipeline::<RegisterEmployeeForm>::new()
            .check("username", |f| field::is_present(&f.username), field::REQUIRED)
            .rule("username", |f| {
                field::check_username(&f.username).map_err(Into::into)
            })
            .validate(&form);
        if let Err(rejected) = username {
            return Ok(Err(rejected));
        }

        if self.username_taken(&form.username, db).await? {
            return Ok(Err(Rejected::new("username", field::DUPLICATE_USERNAME)));
        }

        let rest = Pipeline::<RegisterEmployeeForm>::new()
            .check("email", |f| field::is_present(&f.email), field::REQUIRED)
            .check("email", |f| field::is_valid_email(&f.email), field::INVALID_EMAIL)
            .check("password", |f| !f.password.is_empty(), field::REQUIRED)
            .rule("password", |f| {
                check_password(
                    &f.password,
                    &UserAttributes {
                        username: &f.username,
                        first_name: &f.first_name,
                        last_name: &f.last_name,
                        email: &f.email,
                    },
                )
            })
            .validate(&form);
        if let Err(rejected) = rest {
            return Ok(Err(rejected));
        }

        let new = NewUser {
            username: form.username,
            password: form.password,
            email: form.email,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            role: Role::Employee,
            organisation: admin.organisation,
            phone_number: String::new(),
        };

        match self.create_user(new, db).await {
            Ok(employee) => {
                log::info!("{} registered employee {}", admin.username, employee.username);
                Ok(Ok(employee))
            }
            Err(Error::Database(err))
                if err
                    .downcast_ref::<sea_orm::DbErr>()
                    .is_some_and(DatabaseErrors::is_duplicate) =>
            {
                Ok(Err(Rejected::new("username", field::DUPLICATE_USERNAME)))
            }
            Err(err) => Err(err),
        }
    }

    async fn username_taken<C: ConnectionTrait>(
        &self,
        username: &str,
        connection: &C,
    ) -> Result<bool, Error> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(connection)
            .await?
            > 0)
    }

    /// Issue a reset token for every active user with the email address.
    ///
    /// Returns the number of issued tokens. An unknown address is not an error.
    #[instrument(skip(self, connection), err)]
    pub async fn request_password_reset<C: ConnectionTrait>(
        &self,
        email: &str,
        connection: &C,
    ) -> Result<Result<usize, Rejected>, Error> {
        let email = email.trim();

        let outcome = Pipeline::<str>::new()
            .check("email", field::is_present, field::REQUIRED)
            .check("email", field::is_valid_email, field::INVALID_EMAIL)
            .validate(email);
        if let Err(rejected) = outcome {
            return Ok(Err(rejected));
        }

        let users = user::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(user::Column::Email))).eq(email.to_lowercase()))
            .filter(user::Column::IsActive.eq(true))
            .all(connection)
            .await?;

        let now = OffsetDateTime::now_utc();
        for user in &users {
            password_reset::ActiveModel {
                token: Set(Uuid::new_v4().simple().to_string()),
                user_id: Set(user.id),
                created_at: Set(now),
                expires_at: Set(now + RESET_TOKEN_TTL),
                used: Set(false),
            }
            .insert(connection)
            .await?;

            log::info!("issued password reset token for {}", user.username);
        }

        Ok(Ok(users.len()))
    }

    /// Look up a token which can still be redeemed.
    pub async fn fetch_valid_token<C: ConnectionTrait>(
        &self,
        token: &str,
        connection: &C,
    ) -> Result<Option<password_reset::Model>, Error> {
        let now = OffsetDateTime::now_utc();
        Ok(password_reset::Entity::find_by_id(token)
            .one(connection)
            .await?
            .filter(|reset| reset.is_valid_at(now)))
    }

    /// Set a new password, redeeming the reset token.
    #[instrument(skip(self, new_password, db), err)]
    pub async fn reset_password<C: ConnectionTrait + TransactionTrait>(
        &self,
        token: &str,
        new_password: &str,
        db: &C,
    ) -> Result<ResetOutcome, Error> {
        let tx = db.begin().await?;

        let Some(reset) = self.fetch_valid_token(token, &tx).await? else {
            return Ok(ResetOutcome::InvalidLink);
        };
        let Some(user) = user::Entity::find_by_id(reset.user_id)
            .filter(user::Column::IsActive.eq(true))
            .one(&tx)
            .await?
        else {
            log::info!("password reset for missing or inactive user {}", reset.user_id);
            return Ok(ResetOutcome::InvalidLink);
        };

        let outcome = Pipeline::<str>::new()
            .check("new_password", |p: &str| !p.is_empty(), field::REQUIRED)
            .rule("new_password", |p: &str| {
                check_password(
                    p,
                    &UserAttributes {
                        username: &user.username,
                        first_name: &user.first_name,
                        last_name: &user.last_name,
                        email: &user.email,
                    },
                )
            })
            .validate(new_password);
        if let Err(rejected) = outcome {
            return Ok(ResetOutcome::Rejected(rejected));
        }

        let password = hash_password(new_password).map_err(|err| Error::Any(err.into()))?;

        let username = user.username.clone();
        let session_version = user.session_version + 1;
        let mut user = user.into_active_model();
        user.password = Set(password);
        user.session_version = Set(session_version);
        user.update(&tx).await?;

        let mut reset = reset.into_active_model();
        reset.used = Set(true);
        reset.update(&tx).await?;

        tx.commit().await?;

        log::info!("password of {username} was reset");

        Ok(ResetOutcome::Done)
    }

    /// Delete a user with its profile, the profile's files and the password resets.
    ///
    /// Organisations owned by the user lose their owner. Returns `false` if there was no such
    /// user.
    #[instrument(skip(self, db), err)]
    pub async fn delete_user<C: ConnectionTrait + TransactionTrait>(
        &self,
        id: i32,
        db: &C,
    ) -> Result<bool, Error> {
        let tx = db.begin().await?;

        let mut keys = Vec::new();
        if let Some(profile) = profile::Entity::find()
            .filter(profile::Column::UserId.eq(id))
            .one(&tx)
            .await?
        {
            keys = self.files.delete_files_of_profile(profile.id, &tx).await?;
            profile::Entity::delete_by_id(profile.id).exec(&tx).await?;
        }

        password_reset::Entity::delete_many()
            .filter(password_reset::Column::UserId.eq(id))
            .exec(&tx)
            .await?;

        organisation::Entity::update_many()
            .col_expr(organisation::Column::UserId, Expr::value(Option::<i32>::None))
            .filter(organisation::Column::UserId.eq(id))
            .exec(&tx)
            .await?;

        let result = user::Entity::delete_by_id(id).exec(&tx).await?;

        tx.commit().await?;

        self.files.prune_content(keys, db).await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod test;
