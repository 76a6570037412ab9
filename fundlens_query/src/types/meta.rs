use serde::{Deserialize, Serialize};

use super::{CandidateList, CommitteeList, ContributorList};

/// Pagination details attached to every list response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: i64, page_size: i64, total_items: i64) -> Self {
        let total_pages = if total_items > 0 && page_size > 0 {
            ceil_div(total_items, page_size)
        } else {
            0
        };
        Self {
            page,
            page_size,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Meta for offset/limit pagination, where the page is derived from the offset.
    pub fn from_offset(offset: i64, limit: i64, total_items: i64) -> Self {
        let limit = limit.max(1);
        Self {
            page: (offset / limit).saturating_add(1),
            page_size: limit,
            total_items,
            total_pages: ceil_div(total_items.max(0), limit),
            has_next: offset.saturating_add(limit) < total_items,
            has_prev: offset > 0,
        }
    }
}

fn ceil_div(n: i64, d: i64) -> i64 {
    n / d + i64::from(n % d != 0)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total_items: i64) -> Self {
        Self {
            items,
            meta: PaginationMeta::new(page, page_size, total_items),
        }
    }
}

/// Results of a cross-resource name search; categories not searched are null.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct UnifiedSearchResponse {
    pub candidates: Option<PaginatedResponse<CandidateList>>,
    pub contributors: Option<PaginatedResponse<ContributorList>>,
    pub committees: Option<PaginatedResponse<CommitteeList>>,
}
