// ── Pagination cursors ──
//
// Shared between the poller (reads) and whatever drives pagination
// (writes). The two listings page independently.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Current page of the logs and alerts listings, 1-based.
///
/// Cheap to clone; clones share the same cursors.
#[derive(Debug, Clone)]
pub struct PageCursors {
    logs: Arc<AtomicU32>,
    alerts: Arc<AtomicU32>,
}

impl Default for PageCursors {
    fn default() -> Self {
        Self {
            logs: Arc::new(AtomicU32::new(1)),
            alerts: Arc::new(AtomicU32::new(1)),
        }
    }
}

impl PageCursors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs_page(&self) -> u32 {
        self.logs.load(Ordering::Relaxed)
    }

    pub fn alerts_page(&self) -> u32 {
        self.alerts.load(Ordering::Relaxed)
    }

    /// Page 0 is treated as page 1.
    pub fn set_logs_page(&self, page: u32) {
        self.logs.store(page.max(1), Ordering::Relaxed);
    }

    /// Page 0 is treated as page 1.
    pub fn set_alerts_page(&self, page: u32) {
        self.alerts.store(page.max(1), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursors_start_on_first_page() {
        let c = PageCursors::new();
        assert_eq!((c.logs_page(), c.alerts_page()), (1, 1));
    }

    #[test]
    fn cursors_are_independent() {
        let c = PageCursors::new();
        c.set_logs_page(4);
        c.set_alerts_page(2);
        c.set_logs_page(3);
        assert_eq!(c.logs_page(), 3);
        assert_eq!(c.alerts_page(), 2);
    }

    #[test]
    fn clones_share_state_and_zero_clamps() {
        let c = PageCursors::new();
        let writer = c.clone();
        writer.set_alerts_page(0);
        writer.set_logs_page(7);
        assert_eq!(c.alerts_page(), 1);
        assert_eq!(c.logs_page(), 7);
    }
}
