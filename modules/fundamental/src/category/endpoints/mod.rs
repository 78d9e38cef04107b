#[cfg(test)]
mod test;

use crate::{
    category::{
        model::{CategoryList, CategorySearch, CATEGORY_PAGE_SIZE},
        service::CategoryService,
    },
    Error,
};
use actix_web::{get, web, HttpResponse, Responder};
use sea_orm::ItemsAndPagesNumber;
use venter_auth::{authenticator::user::UserDetails, authorizer::Require, ReadCategory};
use venter_common::{
    db::Database,
    model::{PageInfo, Paginated},
};

pub fn configure(config: &mut utoipa_actix_web::service_config::ServiceConfig, db: Database) {
    let service = CategoryService::new();

    config
        .app_data(web::Data::new(db))
        .app_data(web::Data::new(service))
        .service(list);
}

#[utoipa::path(
    tag = "category",
    operation_id = "listCategories",
    params(
        CategorySearch,
        Paginated,
    ),
    responses(
        (status = 200, description = "Categories of the requester's organisation", body = CategoryList),
        (status = 303, description = "Not logged in"),
        (status = 404, description = "The page does not exist"),
    ),
)]
#[get("/category_list/")]
/// List the categories of the organisation
pub async fn list(
    service: web::Data<CategoryService>,
    db: web::Data<Database>,
    web::Query(search): web::Query<CategorySearch>,
    web::Query(paginated): web::Query<Paginated>,
    user: UserDetails,
    _: Require<ReadCategory>,
) -> Result<impl Responder, Error> {
    let page = match user.organisation {
        Some(organisation) => service
            .fetch_categories(organisation, search.q.as_deref(), paginated, db.as_ref())
            .await?
            .map(CategoryList::from),
        // not a member of any organisation, nothing to show
        None => paginated.is_in_range(0).then(|| CategoryList {
            category_list: vec![],
            paginator: PageInfo::new(
                paginated,
                CATEGORY_PAGE_SIZE,
                ItemsAndPagesNumber {
                    number_of_items: 0,
                    number_of_pages: 0,
                },
            ),
        }),
    };

    match page {
        Some(page) => Ok(HttpResponse::Ok().json(page)),
        None => Err(Error::NotFound(format!("page {}", paginated.page))),
    }
}
