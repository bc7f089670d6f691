//! Debounced, off-thread filter recomputation.
//!
//! [`FilterPipeline`] owns the current [`FilterState`] and a background
//! task. Mutators are synchronous and never block: they only send a
//! command to the task.
//!
//! - State and source changes request a recomputation right away.
//! - Search text is debounced. Each keystroke restarts the window; when it
//!   expires the text is applied only if it differs from the last applied
//!   search.
//!
//! Every request gets a sequence number from a shared counter. The filter
//! runs on the blocking pool and its result is published only if its
//! number is still the latest one issued, so a slow, superseded
//! computation can never overwrite a fresher view.

use std::future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, warn};

use super::{engine, FilterState};
use crate::config::WardrobeConfig;
use crate::model::ItemEntry;

/// A published filter result.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    /// Sequence number of the request that produced this view. 0 is the
    /// unfiltered source the pipeline started with.
    pub seq: u64,
    pub items: Arc<Vec<ItemEntry>>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug)]
enum Command {
    State(FilterState),
    Search(String),
    Source(Arc<Vec<ItemEntry>>),
}

pub struct FilterPipeline {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<FilteredView>,
    state: FilterState,
}

impl FilterPipeline {
    /// Start a pipeline over `source`. Must be called within a tokio runtime.
    pub fn spawn(source: Vec<ItemEntry>, config: &WardrobeConfig) -> Self {
        Self::with_debounce(source, config.search_debounce())
    }

    pub fn with_debounce(source: Vec<ItemEntry>, debounce: Duration) -> Self {
        let source = Arc::new(source);
        let (view_tx, view_rx) = watch::channel(FilteredView {
            seq: 0,
            items: Arc::clone(&source),
        });
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let worker = Worker {
            commands: cmd_rx,
            view: Arc::new(view_tx),
            latest: Arc::new(AtomicU64::new(0)),
            source,
            state: FilterState::default(),
            pending_search: None,
            debounce,
        };
        tokio::spawn(worker.run());

        Self {
            commands: cmd_tx,
            view: view_rx,
            state: FilterState::default(),
        }
    }

    /// The state as the caller last set it, including a search that may
    /// still be inside its debounce window.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Mutate the filter state. A changed search string goes through the
    /// debounce; every other change is applied immediately. A call that only
    /// touches the search requests no immediate recomputation.
    pub fn update<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut FilterState),
    {
        let previous = self.state.clone();
        mutate(&mut self.state);
        if self.state.search != previous.search {
            self.send(Command::Search(self.state.search.clone()));
        }
        if without_search(&self.state) != without_search(&previous) {
            self.send(Command::State(self.state.clone()));
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search = text.into();
        self.send(Command::Search(self.state.search.clone()));
    }

    /// Replace the collection being filtered.
    pub fn set_source(&mut self, source: Vec<ItemEntry>) {
        self.send(Command::Source(Arc::new(source)));
    }

    /// The most recently published view.
    pub fn current(&self) -> FilteredView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilteredView> {
        self.view.clone()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("filter pipeline task is gone; dropping command");
        }
    }
}

fn without_search(state: &FilterState) -> FilterState {
    FilterState {
        search: String::new(),
        ..state.clone()
    }
}

enum Wake {
    Command(Option<Command>),
    SearchDue,
}

struct Worker {
    commands: mpsc::UnboundedReceiver<Command>,
    view: Arc<watch::Sender<FilteredView>>,
    latest: Arc<AtomicU64>,
    source: Arc<Vec<ItemEntry>>,
    /// Applied state. Its `search` is the last search that left the debounce.
    state: FilterState,
    pending_search: Option<(String, Instant)>,
    debounce: Duration,
}

impl Worker {
    async fn run(mut self) {
        loop {
            let deadline = self.pending_search.as_ref().map(|(_, at)| *at);
            let search_due = async move {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => future::pending().await,
                }
            };

            let wake = tokio::select! {
                command = self.commands.recv() => Wake::Command(command),
                _ = search_due => Wake::SearchDue,
            };
            match wake {
                Wake::Command(Some(command)) => self.handle(command),
                Wake::Command(None) => break,
                Wake::SearchDue => self.flush_search(),
            }
        }
        debug!("filter pipeline stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::State(mut state) => {
                state.search = std::mem::take(&mut self.state.search);
                self.state = state;
                self.recompute();
            }
            Command::Search(text) => {
                self.pending_search = Some((text, Instant::now() + self.debounce));
            }
            Command::Source(source) => {
                self.source = source;
                self.recompute();
            }
        }
    }

    fn flush_search(&mut self) {
        let Some((text, _)) = self.pending_search.take() else {
            return;
        };
        if text == self.state.search {
            debug!(search = %text, "search unchanged after debounce");
            return;
        }
        self.state.search = text;
        self.recompute();
    }

    fn recompute(&self) {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let source = Arc::clone(&self.source);
        let state = self.state.clone();
        let view = Arc::clone(&self.view);
        let latest = Arc::clone(&self.latest);
        debug!(seq, "dispatching filter recomputation");

        tokio::spawn(filter_and_publish(view, latest, seq, move || {
            engine::apply(&source, &state)
        }));
    }
}

/// Run `job` on the blocking pool and publish its result if still fresh.
///
/// A failed job leaves the current view in place until the next request.
async fn filter_and_publish<F>(
    view: Arc<watch::Sender<FilteredView>>,
    latest: Arc<AtomicU64>,
    seq: u64,
    job: F,
) -> bool
where
    F: FnOnce() -> Vec<ItemEntry> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(items) => publish_if_fresh(&view, &latest, seq, items),
        Err(e) => {
            error!(
                seq,
                latest = latest.load(Ordering::SeqCst),
                error = %e,
                "filter recomputation failed"
            );
            false
        }
    }
}

/// Publish a result unless a newer request was issued after it.
///
/// Returns true if the view was replaced.
fn publish_if_fresh(
    view: &watch::Sender<FilteredView>,
    latest: &AtomicU64,
    seq: u64,
    items: Vec<ItemEntry>,
) -> bool {
    if seq != latest.load(Ordering::SeqCst) {
        debug!(seq, "discarding stale filter result");
        return false;
    }
    view.send_if_modified(|current| {
        if seq <= current.seq {
            return false;
        }
        current.seq = seq;
        current.items = Arc::new(items);
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClothingItem, Rgba, Size};

    fn entry(name: &str, color: Rgba) -> ItemEntry {
        ItemEntry::new(ClothingItem::new(name, color, Size::M), Vec::new())
    }

    fn source() -> Vec<ItemEntry> {
        let mut pants = entry("Blue Pants", Rgba::BLUE);
        pants.item.dirty = true;
        vec![entry("Red Shirt", Rgba::RED), pants]
    }

    fn names(view: &FilteredView) -> Vec<String> {
        view.items.iter().map(|e| e.item.name.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn starts_with_unfiltered_source() {
        let pipeline = FilterPipeline::spawn(source(), &WardrobeConfig::default());
        let view = pipeline.current();
        assert_eq!(view.seq, 0);
        assert_eq!(view.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn state_changes_apply_without_debounce() {
        let mut pipeline = FilterPipeline::spawn(source(), &WardrobeConfig::default());
        let mut rx = pipeline.subscribe();
        let start = Instant::now();

        pipeline.update(|state| {
            state.dirty = Some(true);
        });
        rx.changed().await.unwrap();

        assert_eq!(Instant::now(), start);
        let view = rx.borrow_and_update().clone();
        assert_eq!(view.seq, 1);
        assert_eq!(names(&view), vec!["Blue Pants"]);
    }

    #[tokio::test(start_paused = true)]
    async fn search_burst_recomputes_once() {
        let mut pipeline = FilterPipeline::spawn(source(), &WardrobeConfig::default());
        let mut rx = pipeline.subscribe();
        let start = Instant::now();

        for text in ["s", "sh", "shi", "shir", "SHIRT"] {
            pipeline.set_search(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(!rx.has_changed().unwrap());
        }
        rx.changed().await.unwrap();

        assert!(Instant::now() >= start + Duration::from_millis(700));
        let view = rx.borrow_and_update().clone();
        assert_eq!(view.seq, 1);
        assert_eq!(names(&view), vec!["Red Shirt"]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn search_burst_through_update_recomputes_once() {
        let mut pipeline = FilterPipeline::spawn(source(), &WardrobeConfig::default());
        let mut rx = pipeline.subscribe();

        for text in ["r", "re", "red", "red s", "red shirt"] {
            pipeline.update(|state| {
                state.search = text.to_string();
            });
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert!(!rx.has_changed().unwrap());
        }
        rx.changed().await.unwrap();

        let view = rx.borrow_and_update().clone();
        assert_eq!(view.seq, 1);
        assert_eq!(names(&view), vec!["Red Shirt"]);
    }

    #[tokio::test(start_paused = true)]
    async fn update_with_search_and_axis_applies_axis_now() {
        let mut pipeline = FilterPipeline::spawn(source(), &WardrobeConfig::default());
        let mut rx = pipeline.subscribe();
        let start = Instant::now();

        pipeline.update(|state| {
            state.search = "shirt".to_string();
            state.dirty = Some(false);
        });
        rx.changed().await.unwrap();
        assert_eq!(Instant::now(), start);
        assert_eq!(rx.borrow_and_update().seq, 1);

        rx.changed().await.unwrap();
        let view = rx.borrow_and_update().clone();
        assert_eq!(view.seq, 2);
        assert_eq!(names(&view), vec!["Red Shirt"]);
    }

    #[tokio::test(start_paused = true)]
    async fn no_op_update_requests_nothing() {
        let mut pipeline = FilterPipeline::spawn(source(), &WardrobeConfig::default());
        let rx = pipeline.subscribe();

        pipeline.update(|_| {});
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn failed_recomputation_keeps_previous_view() {
        let (tx, rx) = watch::channel(FilteredView {
            seq: 0,
            items: Arc::new(source()),
        });
        let view = Arc::new(tx);
        let latest = Arc::new(AtomicU64::new(1));

        let published = filter_and_publish(Arc::clone(&view), Arc::clone(&latest), 1, || {
            panic!("filter job failed")
        })
        .await;
        assert!(!published);
        assert_eq!(rx.borrow().seq, 0);
        assert_eq!(rx.borrow().len(), 2);

        // The next request still goes through
        latest.store(2, Ordering::SeqCst);
        assert!(filter_and_publish(view, latest, 2, Vec::new).await);
        assert_eq!(rx.borrow().seq, 2);
        assert!(rx.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_search_is_suppressed() {
        let mut pipeline = FilterPipeline::spawn(source(), &WardrobeConfig::default());
        let mut rx = pipeline.subscribe();

        pipeline.set_search("shirt");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().seq, 1);

        pipeline.set_search("pants");
        tokio::time::sleep(Duration::from_millis(50)).await;
        pipeline.set_search("shirt");
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(!rx.has_changed().unwrap());
        assert_eq!(pipeline.current().seq, 1);
        assert_eq!(pipeline.state().search, "shirt");
    }

    #[tokio::test(start_paused = true)]
    async fn custom_debounce_window() {
        let config = WardrobeConfig {
            search_debounce_ms: 1000,
            ..Default::default()
        };
        let mut pipeline = FilterPipeline::spawn(source(), &config);
        let mut rx = pipeline.subscribe();

        pipeline.set_search("pants");
        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(!rx.has_changed().unwrap());

        rx.changed().await.unwrap();
        assert_eq!(names(&rx.borrow_and_update()), vec!["Blue Pants"]);
    }

    #[tokio::test(start_paused = true)]
    async fn update_keeps_applied_search() {
        let mut pipeline = FilterPipeline::spawn(source(), &WardrobeConfig::default());
        let mut rx = pipeline.subscribe();

        pipeline.set_search("shirt");
        rx.changed().await.unwrap();
        rx.borrow_and_update();

        pipeline.update(|state| {
            state.colors.insert(Rgba::BLUE);
        });
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn new_source_is_refiltered() {
        let mut pipeline = FilterPipeline::spawn(source(), &WardrobeConfig::default());
        let mut rx = pipeline.subscribe();

        pipeline.update(|state| {
            state.colors.insert(Rgba::RED);
        });
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        let mut more = source();
        more.push(entry("Red Scarf", Rgba::RED));
        pipeline.set_source(more);
        rx.changed().await.unwrap();
        assert_eq!(names(&rx.borrow_and_update()), vec!["Red Shirt", "Red Scarf"]);
    }

    #[test]
    fn stale_results_are_discarded() {
        let (tx, rx) = watch::channel(FilteredView {
            seq: 0,
            items: Arc::new(Vec::new()),
        });
        let latest = AtomicU64::new(2);

        assert!(!publish_if_fresh(&tx, &latest, 1, source()));
        assert_eq!(rx.borrow().seq, 0);

        assert!(publish_if_fresh(&tx, &latest, 2, source()));
        assert_eq!(rx.borrow().seq, 2);

        // Already published
        assert!(!publish_if_fresh(&tx, &latest, 2, Vec::new()));
        assert_eq!(rx.borrow().len(), 2);
    }
}
