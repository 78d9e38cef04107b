use crate::{
    category::model::{CategorySummary, CATEGORY_PAGE_SIZE},
    Error,
};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::instrument;
use venter_common::model::{Paginated, PaginatedResults};
use venter_entity::category;

#[derive(Default)]
pub struct CategoryService {}

impl CategoryService {
    pub fn new() -> Self {
        Self {}
    }

    /// Add categories to an organisation, skipping blank names.
    pub async fn add_categories<C: ConnectionTrait>(
        &self,
        organisation: i32,
        categories: impl IntoIterator<Item = impl Into<String>>,
        connection: &C,
    ) -> Result<(), Error> {
        let models = categories
            .into_iter()
            .map(Into::<String>::into)
            .filter(|name| !name.trim().is_empty())
            .map(|name| category::ActiveModel {
                category: Set(name.trim().to_string()),
                organisation_id: Set(Some(organisation)),
                ..Default::default()
            })
            .collect::<Vec<_>>();

        if models.is_empty() {
            return Ok(());
        }

        category::Entity::insert_many(models).exec(connection).await?;

        Ok(())
    }

    /// Fetch a page of the categories of an organisation.
    ///
    /// Returns `None` if the page doesn't exist.
    #[instrument(skip(self, connection), err)]
    pub async fn fetch_categories<C: ConnectionTrait>(
        &self,
        organisation: i32,
        q: Option<&str>,
        paginated: Paginated,
        connection: &C,
    ) -> Result<Option<PaginatedResults<CategorySummary>>, Error> {
        let mut select =
            category::Entity::find().filter(category::Column::OrganisationId.eq(organisation));

        if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like(&q.to_lowercase()));
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(category::Column::Category)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        let paginator = select
            .order_by_asc(category::Column::Id)
            .paginate(connection, CATEGORY_PAGE_SIZE);

        Ok(PaginatedResults::fetch(
            paginated,
            CATEGORY_PAGE_SIZE,
            &paginator,
            CategorySummary::from,
        )
        .await?)
    }
}

fn escape_like(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
