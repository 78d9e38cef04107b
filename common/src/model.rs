use sea_orm::{ConnectionTrait, DbErr, ItemsAndPagesNumber, SelectorTrait};
use std::num::NonZeroU64;
use utoipa::{IntoParams, ToSchema};

/// Page selection of a list request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Paginated {
    /// The page number, starting with 1
    #[serde(default = "default::page")]
    #[param(value_type = u64, minimum = 1)]
    pub page: NonZeroU64,
}

mod default {
    use std::num::NonZeroU64;

    pub(super) fn page() -> NonZeroU64 {
        NonZeroU64::MIN
    }
}

impl Default for Paginated {
    fn default() -> Self {
        Self {
            page: default::page(),
        }
    }
}

impl Paginated {
    pub fn new(page: NonZeroU64) -> Self {
        Self { page }
    }

    /// The zero-based index of the page, as used by the sea-orm paginator.
    pub fn index(&self) -> u64 {
        self.page.get() - 1
    }

    /// Check if the page exists for the given number of pages.
    ///
    /// The first page always exists, even when there are no items.
    pub fn is_in_range(&self, number_of_pages: u64) -> bool {
        self.page.get() <= number_of_pages.max(1)
    }
}

/// The state of the paginator, alongside a page of results.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct PageInfo {
    /// The current page, starting with 1
    pub page: u64,
    pub page_size: u64,
    /// The total number of items, over all pages
    pub number_of_items: u64,
    pub number_of_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageInfo {
    pub fn new(paginated: Paginated, page_size: u64, items: ItemsAndPagesNumber) -> Self {
        let page = paginated.page.get();
        Self {
            page,
            page_size,
            number_of_items: items.number_of_items,
            number_of_pages: items.number_of_pages,
            has_previous: page > 1,
            has_next: page < items.number_of_pages,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PaginatedResults<R> {
    pub results: Vec<R>,
    pub paginator: PageInfo,
}

impl<R> PaginatedResults<R> {
    /// Fetch the requested page from a paginator created with `page_size`.
    ///
    /// Returns `None` if the page is out of range.
    pub async fn fetch<'c, C, S>(
        paginated: Paginated,
        page_size: u64,
        paginator: &sea_orm::Paginator<'c, C, S>,
        f: impl FnMut(S::Item) -> R,
    ) -> Result<Option<Self>, DbErr>
    where
        C: ConnectionTrait,
        S: SelectorTrait + 'c,
    {
        let items = paginator.num_items_and_pages().await?;

        if !paginated.is_in_range(items.number_of_pages) {
            return Ok(None);
        }

        let results = paginator
            .fetch_page(paginated.index())
            .await?
            .into_iter()
            .map(f)
            .collect();

        Ok(Some(PaginatedResults {
            results,
            paginator: PageInfo::new(paginated, page_size, items),
        }))
    }
}
