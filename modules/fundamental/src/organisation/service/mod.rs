use crate::{
    header::service::HeaderService,
    organisation::model::{NewOrganisation, OrganisationSummary},
    validation::{field, upload::UploadRules, Pipeline},
    Error,
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::instrument;
use venter_entity::{category, header, organisation, profile};

#[derive(Default)]
pub struct OrganisationService {}

impl OrganisationService {
    pub fn new() -> Self {
        Self {}
    }

    #[instrument(skip(self, connection), err)]
    pub async fn create_organisation<C: ConnectionTrait>(
        &self,
        new: NewOrganisation,
        connection: &C,
    ) -> Result<OrganisationSummary, Error> {
        Pipeline::<NewOrganisation>::new()
            .check("name", |o| field::is_present(&o.name), field::REQUIRED)
            .check(
                "phone_number",
                |o| o.phone_number.is_empty() || field::is_valid_phone_number(&o.phone_number),
                field::INVALID_PHONE_NUMBER,
            )
            .validate(&new)
            .map_err(|err| Error::BadRequest(err.to_string()))?;

        let model = organisation::ActiveModel {
            name: Set(new.name),
            phone_number: Set(new.phone_number),
            profile_picture: Set(new.profile_picture),
            user_id: Set(new.owner),
            upload_format: Set(new.upload_format),
            ..Default::default()
        }
        .insert(connection)
        .await?;

        log::info!("created organisation {} ({})", model.name, model.id);

        Ok(model.into())
    }

    pub async fn fetch_organisation<C: ConnectionTrait>(
        &self,
        id: i32,
        connection: &C,
    ) -> Result<Option<OrganisationSummary>, Error> {
        Ok(organisation::Entity::find_by_id(id)
            .one(connection)
            .await?
            .map(OrganisationSummary::from))
    }

    /// Look up the organisation by its name.
    pub async fn fetch_organisation_by_name<C: ConnectionTrait>(
        &self,
        name: &str,
        connection: &C,
    ) -> Result<Option<OrganisationSummary>, Error> {
        Ok(organisation::Entity::find()
            .filter(organisation::Column::Name.eq(name))
            .one(connection)
            .await?
            .map(OrganisationSummary::from))
    }

    /// Make a user the owner of the organisation.
    ///
    /// Returns `false` if the organisation doesn't exist.
    pub async fn assign_owner<C: ConnectionTrait>(
        &self,
        id: i32,
        owner: i32,
        connection: &C,
    ) -> Result<bool, Error> {
        let result = organisation::Entity::update_many()
            .col_expr(organisation::Column::UserId, Expr::value(owner))
            .filter(organisation::Column::Id.eq(id))
            .exec(connection)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// The rules uploads of the organisation must follow.
    pub async fn upload_rules<C: ConnectionTrait>(
        &self,
        id: i32,
        connection: &C,
    ) -> Result<Option<UploadRules>, Error> {
        let Some(org) = organisation::Entity::find_by_id(id).one(connection).await? else {
            return Ok(None);
        };

        let headers = HeaderService::new().fetch_headers(id, connection).await?;

        Ok(Some(UploadRules {
            format: org.upload_format,
            headers,
        }))
    }

    /// Delete an organisation, detaching its categories, headers and profiles.
    ///
    /// Returns `false` if the organisation did not exist.
    #[instrument(skip(self, db), err)]
    pub async fn delete_organisation<C: ConnectionTrait + TransactionTrait>(
        &self,
        id: i32,
        db: &C,
    ) -> Result<bool, Error> {
        let tx = db.begin().await?;

        let detached = Expr::value(Option::<i32>::None);

        category::Entity::update_many()
            .col_expr(category::Column::OrganisationId, detached.clone())
            .filter(category::Column::OrganisationId.eq(id))
            .exec(&tx)
            .await?;

        header::Entity::update_many()
            .col_expr(header::Column::OrganisationId, detached.clone())
            .filter(header::Column::OrganisationId.eq(id))
            .exec(&tx)
            .await?;

        profile::Entity::update_many()
            .col_expr(profile::Column::OrganisationId, detached)
            .filter(profile::Column::OrganisationId.eq(id))
            .exec(&tx)
            .await?;

        let result = organisation::Entity::delete_by_id(id).exec(&tx).await?;

        tx.commit().await?;

        Ok(result.rows_affected > 0)
    }
}
