//! Read-side query types: listing filters, pages and restaurant stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reservation::ReservationStatus;
use crate::restaurant::{ClientId, RestaurantId};

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Direction for ordering by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Earliest first.
    Asc,
    /// Latest first.
    #[default]
    Desc,
}

impl SortOrder {
    pub(crate) const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filter for [`ReservationManager::list_reservations`](crate::operations::ReservationManager::list_reservations).
///
/// Every field is optional; an empty filter lists everything, newest first.
///
/// # Examples
///
/// ```
/// use tablekeep::{ReservationFilter, ReservationStatus, RestaurantId};
///
/// let filter = ReservationFilter::for_restaurant(RestaurantId::new("r-1").unwrap())
///     .with_status(ReservationStatus::Pending)
///     .page(2, 20);
/// assert_eq!(filter.offset(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReservationFilter {
    /// Only this restaurant's reservations.
    pub restaurant_id: Option<RestaurantId>,
    /// Only this client's reservations.
    pub client_id: Option<ClientId>,
    /// Only this status.
    pub status: Option<ReservationStatus>,
    /// Only reservations starting at or after this instant.
    pub starting_from: Option<DateTime<Utc>>,
    /// Only reservations starting before this instant.
    pub starting_before: Option<DateTime<Utc>>,
    /// Case-insensitive match against client name or email.
    pub search: Option<String>,
    /// Ordering by start time.
    pub order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl ReservationFilter {
    /// Filter for one restaurant with default paging.
    #[must_use]
    pub fn for_restaurant(restaurant_id: RestaurantId) -> Self {
        Self {
            restaurant_id: Some(restaurant_id),
            ..Self::new()
        }
    }

    /// Filter for one client with default paging.
    #[must_use]
    pub fn for_client(client_id: ClientId) -> Self {
        Self {
            client_id: Some(client_id),
            ..Self::new()
        }
    }

    /// Empty filter: first page of ten, newest first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            ..Self::default()
        }
    }

    /// Restricts to a status.
    #[must_use]
    pub fn with_status(mut self, status: ReservationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to reservations starting in `[from, before)`.
    #[must_use]
    pub fn starting_between(mut self, from: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        self.starting_from = Some(from);
        self.starting_before = Some(before);
        self
    }

    /// Restricts to client names or emails containing `needle`.
    #[must_use]
    pub fn with_search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn ordered(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Selects a page. Zero values fall back to page 1 / the default size.
    #[must_use]
    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Effective page size.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        if self.limit == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.limit
        }
    }

    /// Number of rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.effective_limit())
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Items across all pages.
    pub total_items: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size used.
    pub limit: u32,
}

impl<T> Page<T> {
    /// Number of pages needed for `total_items`.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total_items.div_ceil(u64::from(self.limit))
    }
}

/// Reservation counts for a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReservationStats {
    /// All reservations.
    pub total: u64,
    /// Cancelled reservations.
    pub cancelled: u64,
    /// Pending reservations.
    pub pending: u64,
    /// Confirmed reservations.
    pub confirmed: u64,
    /// Guests across all non-cancelled reservations.
    pub total_people: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let filter = ReservationFilter::new();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(filter.order, SortOrder::Desc);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_zero_paging_falls_back() {
        let filter = ReservationFilter::new().page(0, 0);
        assert_eq!(filter.effective_limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        let page: Page<u32> = Page {
            items: vec![],
            total_items: 21,
            page: 1,
            limit: 10,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
