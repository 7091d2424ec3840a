use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use reqwest::Method;
use url::Url;

/// Timing record for one transaction's network call.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionLog {
    pub method: Method,
    pub url: Url,
    pub elapsed: Duration,
}

impl fmt::Display for TransactionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "============= PAYEEZY TRANSACTION LOG ==============")?;
        writeln!(f, "METHOD: {}", self.method)?;
        writeln!(f, "URL:    {}", self.url)?;
        writeln!(f, "TIME:   {:?}", self.elapsed)?;
        writeln!(f, "====================================================")
    }
}

/// Receives one [`TransactionLog`] per transaction while instrumentation is enabled.
pub trait TransactionObserver: Send + Sync {
    fn on_transaction(&self, log: &TransactionLog);
}

impl<F> TransactionObserver for F
where
    F: Fn(&TransactionLog) + Send + Sync,
{
    fn on_transaction(&self, log: &TransactionLog) {
        self(log);
    }
}

/// Switchable timing hook around the network call.
///
/// Clones share one switch, so several clients can be instrumented together;
/// a fresh [`Instrumentation`] is independent of every other one. Disabled by
/// default.
#[derive(Clone, Default)]
pub struct Instrumentation {
    observer: Arc<RwLock<Option<Arc<dyn TransactionObserver>>>>,
}

impl Instrumentation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instrumentation handle that is already enabled.
    #[must_use]
    pub fn enabled<O: TransactionObserver + 'static>(observer: O) -> Self {
        let instrumentation = Self::new();
        instrumentation.enable(observer);
        instrumentation
    }

    /// Turns timing on, replacing any previously registered observer.
    pub fn enable<O: TransactionObserver + 'static>(&self, observer: O) {
        let mut slot = self
            .observer
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(observer));
    }

    pub fn disable(&self) {
        let mut slot = self
            .observer
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.current().is_some()
    }

    fn current(&self) -> Option<Arc<dyn TransactionObserver>> {
        self.observer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs `call`, timing it if an observer is registered when it starts.
    ///
    /// The observer is captured up front, so toggling the switch mid-call
    /// neither drops nor duplicates the report for that call.
    pub async fn measure<F: Future>(&self, method: Method, url: &Url, call: F) -> F::Output {
        let Some(observer) = self.current() else {
            return call.await;
        };

        let started = Instant::now();
        let output = call.await;
        let log = TransactionLog {
            method,
            url: url.clone(),
            elapsed: started.elapsed(),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(method = %log.method, url = %log.url, elapsed = ?log.elapsed, "transaction timed");

        observer.on_transaction(&log);
        output
    }
}

impl fmt::Debug for Instrumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumentation")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn url() -> Url {
        Url::parse("https://api-cert.payeezy.com/v1/transactions").expect("valid url")
    }

    #[tokio::test]
    async fn disabled_by_default() {
        let instrumentation = Instrumentation::new();

        assert!(!instrumentation.is_enabled(), "should start disabled");
        let output = instrumentation.measure(Method::POST, &url(), async { 7 }).await;
        assert_eq!(output, 7);
    }

    #[tokio::test]
    async fn reports_once_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let instrumentation = Instrumentation::enabled(move |_: &TransactionLog| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        instrumentation.measure(Method::POST, &url(), async {}).await;
        instrumentation.measure(Method::POST, &url(), async {}).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn enable_replaces_observer_and_disable_stops_reports() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let instrumentation = Instrumentation::new();

        let counter = Arc::clone(&first);
        instrumentation.enable(move |_: &TransactionLog| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second);
        instrumentation.enable(move |_: &TransactionLog| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        instrumentation.measure(Method::POST, &url(), async {}).await;

        instrumentation.disable();
        instrumentation.measure(Method::POST, &url(), async {}).await;

        assert_eq!(first.load(Ordering::SeqCst), 0, "replaced observer is silent");
        assert_eq!(second.load(Ordering::SeqCst), 1, "disabled after one call");
    }

    #[tokio::test]
    async fn clones_share_the_switch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shared = Instrumentation::new();
        let clone = shared.clone();
        let independent = Instrumentation::new();

        let counter = Arc::clone(&calls);
        shared.enable(move |_: &TransactionLog| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(clone.is_enabled(), "clone sees enable");
        assert!(!independent.is_enabled(), "fresh handle is independent");

        clone.measure(Method::POST, &url(), async {}).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn log_record_carries_method_and_url() {
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        let instrumentation = Instrumentation::enabled(move |log: &TransactionLog| {
            sink.lock().expect("lock").push(log.to_string());
        });

        instrumentation.measure(Method::POST, &url(), async {}).await;

        let records = records.lock().expect("lock");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!(record.contains("PAYEEZY TRANSACTION LOG"), "banner missing");
        assert!(record.contains("METHOD: POST"), "method missing");
        assert!(
            record.contains("URL:    https://api-cert.payeezy.com/v1/transactions"),
            "url missing"
        );
        assert!(record.contains("TIME:"), "time missing");
    }
}
