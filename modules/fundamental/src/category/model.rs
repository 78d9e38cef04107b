use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use venter_common::model::{PageInfo, PaginatedResults};
use venter_entity::category;

/// The number of categories on a page.
pub const CATEGORY_PAGE_SIZE: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    pub id: i32,
    pub category: String,
}

impl From<category::Model> for CategorySummary {
    fn from(value: category::Model) -> Self {
        Self {
            id: value.id,
            category: value.category,
        }
    }
}

/// A page of the categories of an organisation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryList {
    pub category_list: Vec<CategorySummary>,
    pub paginator: PageInfo,
}

impl From<PaginatedResults<CategorySummary>> for CategoryList {
    fn from(value: PaginatedResults<CategorySummary>) -> Self {
        Self {
            category_list: value.results,
            paginator: value.paginator,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategorySearch {
    /// Case-insensitive text the category name must contain
    #[serde(default)]
    pub q: Option<String>,
}
