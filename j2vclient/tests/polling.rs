use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use j2vclient::{PollingLoop, VidfeedApp};
use j2vfeed::{Error, FeedLayout, Listing, ListingSource, Result};
use j2vplayer::HeadlessEngineFactory;

/// Serves canned listing bodies in order, then repeats the last one.
#[derive(Default)]
struct CannedSource {
    bodies: Vec<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl CannedSource {
    fn new(bodies: Vec<&'static str>) -> Self {
        Self {
            bodies,
            calls: Arc::default(),
        }
    }
}

#[async_trait]
impl ListingSource for CannedSource {
    async fn fetch_listing(&self) -> Result<Listing> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.bodies.get(n).or(self.bodies.last()) {
            Some(&"error") => Err(Error::HttpStatus(502)),
            Some(body) => Listing::from_json(body),
            None => Err(Error::other("no body")),
        }
    }
}

/// Answers every fetch after a fixed delay.
struct SlowSource {
    delay: Duration,
    started: Arc<AtomicUsize>,
}

#[async_trait]
impl ListingSource for SlowSource {
    async fn fetch_listing(&self) -> Result<Listing> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Listing::from_json(r#"{"x":{"dir":"cam1"}}"#)
    }
}

fn shared_app(factory: &HeadlessEngineFactory) -> Arc<Mutex<VidfeedApp<HeadlessEngineFactory>>> {
    Arc::new(Mutex::new(VidfeedApp::with_layout(
        factory.clone(),
        FeedLayout::default(),
        "video_player",
    )))
}

#[tokio::test(start_paused = true)]
async fn polls_immediately_then_every_interval() {
    let factory = HeadlessEngineFactory::new();
    let source = CannedSource::new(vec![r#"{"x":{"dir":"cam1"}}"#]);
    let calls = Arc::clone(&source.calls);
    let app = shared_app(&factory);

    let handle = PollingLoop::new(source, Arc::clone(&app), Duration::from_millis(5000)).spawn();
    tokio::time::sleep(Duration::from_millis(12_500)).await;
    handle.abort();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let app = app.lock().unwrap();
    assert_eq!(app.catalog().len(), 1);
    assert_eq!(app.selection().current_id(), Some("cam1"));
    assert_eq!(factory.created(), 1);
}

#[tokio::test(start_paused = true)]
async fn failures_do_not_stop_polling() {
    let factory = HeadlessEngineFactory::new();
    let source = CannedSource::new(vec!["error", "error", r#"[{"dir":"cam7"}]"#]);
    let calls = Arc::clone(&source.calls);
    let app = shared_app(&factory);

    let handle = PollingLoop::new(source, Arc::clone(&app), Duration::from_secs(1)).spawn();
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    handle.abort();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(app.lock().unwrap().selection().current_id(), Some("cam7"));
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_does_not_hold_back_next_tick() {
    let factory = HeadlessEngineFactory::new();
    let started = Arc::new(AtomicUsize::new(0));
    let source = SlowSource {
        delay: Duration::from_secs(12),
        started: Arc::clone(&started),
    };
    let app = shared_app(&factory);

    let handle = PollingLoop::new(source, Arc::clone(&app), Duration::from_secs(5)).spawn();
    tokio::time::sleep(Duration::from_millis(10_500)).await;

    assert_eq!(started.load(Ordering::SeqCst), 3);
    assert!(app.lock().unwrap().catalog().is_empty());
    assert_eq!(factory.created(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    handle.abort();

    assert_eq!(app.lock().unwrap().catalog().len(), 1);
    assert_eq!(factory.created(), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_falls_back_to_default() {
    let factory = HeadlessEngineFactory::new();
    let source = CannedSource::new(vec![r#"{"x":{"dir":"cam1"}}"#]);
    let calls = Arc::clone(&source.calls);
    let app = shared_app(&factory);

    let polling = PollingLoop::new(source, Arc::clone(&app), Duration::ZERO);
    assert_eq!(polling.interval(), Duration::from_millis(5000));

    let handle = polling.spawn();
    tokio::time::sleep(Duration::from_millis(5_500)).await;
    handle.abort();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!handle.await.unwrap_err().is_panic());
}

#[test]
fn refresh_once_applies_one_listing() {
    let factory = HeadlessEngineFactory::new();
    let app = shared_app(&factory);
    let polling = PollingLoop::new(
        CannedSource::new(vec![r#"{"a":{"dir":"cam1"},"b":{"dir":"cam2"}}"#]),
        Arc::clone(&app),
        Duration::from_secs(5),
    );

    let report = tokio_test::block_on(polling.refresh_once()).unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(app.lock().unwrap().player().url(), Some("vidfeed/cam1/stream.mpd"));
}
