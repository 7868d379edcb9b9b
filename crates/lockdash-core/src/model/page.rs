// ── Paginated listings ──

use serde::{Deserialize, Serialize};

use super::alert::Alert;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    /// Item count across all pages, when the backend reports it.
    pub total: Option<usize>,
    pub per_page: Option<u32>,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// One page of a listing plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Reported total, falling back to the items held on this page.
    pub fn total(&self) -> usize {
        self.pagination.total.unwrap_or(self.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Page<Alert> {
    /// Drop a resolved alert and decrement the reported total by one.
    ///
    /// Returns `true` if the alert was on this page.
    pub fn remove_alert(&mut self, index: usize) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.index != index);
        let removed = self.items.len() < before;
        if let Some(total) = self.pagination.total.as_mut() {
            *total = total.saturating_sub(1);
        }
        removed
    }
}
