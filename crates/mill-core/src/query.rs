//! # Query Types
//!
//! Filters and pagination for list endpoints.
//!
//! ## Date Range
//! ```text
//!   from_date = 2024-03-01          to_date = 2024-03-31
//!        │                               │
//!        ▼                               ▼
//!   created_at >= 2024-03-01T00:00Z   created_at < 2024-04-01T00:00Z
//! ```
//! Both bounds are inclusive calendar dates in UTC.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::PaymentType;
use crate::validation::ValidationResult;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Purchase Filter
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseFilter {
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<String>,
}

impl PurchaseFilter {
    pub fn validate(&self) -> ValidationResult<()> {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(ValidationError::InvalidFormat {
                    field: "from_date".to_string(),
                    reason: "must not be after to_date".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Inclusive lower bound on `created_at`.
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.from_date.map(start_of_day)
    }

    /// Exclusive upper bound on `created_at`: midnight after `to_date`.
    pub fn created_before(&self) -> Option<DateTime<Utc>> {
        self.to_date
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .map(start_of_day)
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

// =============================================================================
// Pagination
// =============================================================================

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }.normalized()
    }

    /// Page clamped to ≥ 1, per_page clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Never below 1, so an empty result still reports a page.
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let per_page = u64::from(request.per_page.max(1));
        let total_pages = total.div_ceil(per_page).max(1);

        Self {
            data,
            meta: PageMeta {
                page: request.page,
                per_page: request.per_page,
                total,
                total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
