//! Typed request definitions: one cache key and one fetch per screen query,
//! and for every mutation the keys it invalidates.

pub mod admin;
pub mod favorites;
pub mod meals;
pub mod orders;
pub mod requests;
pub mod reviews;
pub mod users;

use crate::{
    dto::params::{Pagination, total_pages},
    response::Meta,
};

/// One page of a server-side paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

impl<T> Page<T> {
    /// Falls back to the requested pagination when the backend omits meta.
    pub fn from_meta(items: Vec<T>, meta: &Meta, requested: Pagination) -> Self {
        let (page, limit, _) = requested.normalize();
        Self {
            page: meta.page.unwrap_or(page),
            page_size: meta.per_page.unwrap_or(limit),
            total: meta.total.unwrap_or(items.len() as i64),
            items,
        }
    }

    pub fn total_pages(&self) -> i64 {
        total_pages(self.total, self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
