use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::error::FetchError;
use crate::feed::PriceFeed;
use crate::model::RawMarketItem;

pub type FetchResult = Result<Vec<RawMarketItem>, FetchError>;

/// A one-shot price fetch running off the UI thread.
///
/// Dropping the handle cancels it: whatever the worker brings back afterwards
/// is discarded.
pub struct PendingFetch {
    cancelled: Arc<AtomicBool>,
    rx: Receiver<FetchResult>,
}

impl PendingFetch {
    pub fn spawn<W>(feed: Arc<dyn PriceFeed>, app_id: u32, currency: String, wake: W) -> Self
    where
        W: Fn() + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = feed.fetch_prices(app_id, &currency);
            if flag.load(Ordering::Acquire) {
                tracing::debug!("price fetch finished after cancellation");
                return;
            }
            let _ = tx.send(result);
            wake();
        });

        PendingFetch { cancelled, rx }
    }

    /// `None` while the fetch is still running.
    pub fn poll(&self) -> Option<FetchResult> {
        if self.is_cancelled() {
            return Some(Err(FetchError::Aborted));
        }
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(FetchError::Aborted)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for PendingFetch {
    fn drop(&mut self) {
        self.cancel();
    }
}
