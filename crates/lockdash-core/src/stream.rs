// ── Reactive state stream ──
//
// Subscription handle over the poller's published `DashboardState`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::state::DashboardState;

/// A subscription to the dashboard state.
///
/// Provides point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct StateStream {
    current: Arc<DashboardState>,
    receiver: watch::Receiver<Arc<DashboardState>>,
}

impl StateStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<DashboardState>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The state captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Arc<DashboardState> {
        &self.current
    }

    /// The latest published state.
    pub fn latest(&self) -> Arc<DashboardState> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next publication.
    /// Returns `None` once the poller has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<DashboardState>> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    pub fn into_stream(self) -> DashboardWatchStream {
        DashboardWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding each published `DashboardState`.
pub struct DashboardWatchStream {
    inner: WatchStream<Arc<DashboardState>>,
}

impl Stream for DashboardWatchStream {
    type Item = Arc<DashboardState>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
