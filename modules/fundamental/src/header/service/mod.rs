use crate::Error;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use venter_entity::header;

/// The expected header row of an organisation's CSV uploads.
#[derive(Default)]
pub struct HeaderService {}

impl HeaderService {
    pub fn new() -> Self {
        Self {}
    }

    /// Add headers to an organisation, skipping blank names.
    pub async fn add_headers<C: ConnectionTrait>(
        &self,
        organisation: i32,
        headers: impl IntoIterator<Item = impl Into<String>>,
        connection: &C,
    ) -> Result<(), Error> {
        let models = headers
            .into_iter()
            .map(Into::<String>::into)
            .filter(|name| !name.trim().is_empty())
            .map(|name| header::ActiveModel {
                header: Set(name.trim().to_string()),
                organisation_id: Set(Some(organisation)),
                ..Default::default()
            })
            .collect::<Vec<_>>();

        if models.is_empty() {
            return Ok(());
        }

        header::Entity::insert_many(models).exec(connection).await?;

        Ok(())
    }

    pub async fn fetch_headers<C: ConnectionTrait>(
        &self,
        organisation: i32,
        connection: &C,
    ) -> Result<Vec<String>, Error> {
        Ok(header::Entity::find()
            .filter(header::Column::OrganisationId.eq(organisation))
            .order_by_asc(header::Column::Id)
            .all(connection)
            .await?
            .into_iter()
            .map(|h| h.header)
            .collect())
    }
}
