use crate::{
    client::{Bazaar, api::Page, screens::Loadable},
    dto::params::{MealListQuery, SortOrder},
    models::Meal,
};

pub const MEALS_PAGE_SIZE: i64 = 9;

/// Search, sort and page state of the meals listing. Changing the search or
/// the sort goes back to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealBrowser {
    search: String,
    sort: Option<SortOrder>,
    page: i64,
}

impl Default for MealBrowser {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: None,
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealPageView {
    pub items: Vec<Meal>,
    pub page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl From<Page<Meal>> for MealPageView {
    fn from(page: Page<Meal>) -> Self {
        Self {
            total_pages: page.total_pages(),
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            page: page.page,
            total: page.total,
            items: page.items,
        }
    }
}

impl MealBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn go_to(&mut self, page: i64) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.page = (self.page - 1).max(1);
    }

    pub fn query(&self) -> MealListQuery {
        let search = self.search.trim();
        MealListQuery {
            page: Some(self.page),
            limit: Some(MEALS_PAGE_SIZE),
            search: (!search.is_empty()).then(|| search.to_string()),
            sort: self.sort,
        }
    }

    pub async fn load(&self, bazaar: &Bazaar) -> Loadable<MealPageView> {
        Loadable::from(bazaar.meals(self.query()).await).map(MealPageView::from)
    }
}
