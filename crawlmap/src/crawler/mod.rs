//! # Crawler Engine
//!
//! A **concurrent web-crawling engine**: a bounded pool of worker tasks
//! sharing a frontier queue and a visited set, fetching raw page content
//! over TCP, extracting further addresses and feeding them back into the
//! frontier while guaranteeing each address is fetched at most once.
//!
//! The engine is built around three pillars:
//!
//! - [`Crawl`]: the high-level async API for seeding, running and
//!   controlling a crawl
//! - [`Crawler`]: the underlying shared state (frontier, visited set,
//!   event channel)
//! - a pluggable [`EventFormatter`] for customizable event output
//!
//! ## Architecture Overview
//!
//! ```text
//! +------------------------------------------------------+
//! |                     User Code                        |
//! |        (adds seeds, consumes events, awaits idle)    |
//! +------------------------------+-----------------------+
//!                                |
//!                                v
//! +------------------------------------------------------+
//! |                      Crawl API                       |
//! |   - add_seed          - events                       |
//! |   - start             - await_idle                   |
//! |   - stop              - shutdown_graceful            |
//! +------------------------------+-----------------------+
//!                                |
//!                                v
//! +------------------------------------------------------+
//! |                 BuiltCrawler (runtime)               |
//! |      N workers: dequeue -> fetch -> extract -> gate  |
//! +------------------------------+-----------------------+
//!                                |
//!                                v
//! +------------------------------------------------------+
//! |                   Crawler (state)                    |
//! | - frontier queue     - event broadcast sender        |
//! | - visited set        - formatter                     |
//! | - buffer pool        - Notify (work / idle)          |
//! +------------------------------------------------------+
//! ```
//!
//! Each worker loops: dequeue one address, fetch it over a raw TCP
//! connection, emit one [`CrawlEvent`], and on success run the link
//! extractor and push every address that passes the visited-set gate back
//! onto the frontier. The network I/O happens outside every lock; workers
//! only re-enter synchronization to touch the queue and the set.
//!
//! ## Dedup gate
//!
//! An address enters the frontier through exactly one door:
//! `VisitedSet::try_add`. The gate is checked *before* enqueue, so the
//! frontier never holds duplicate unprocessed entries and no address is
//! fetched twice, regardless of how many workers discover it concurrently.
//!
//! ## Idle Detection and Termination
//!
//! A crawl is complete when:
//!
//! ```text
//! frontier queue is empty  AND  in-flight fetches == 0
//! ```
//!
//! Both halves of the condition live behind the frontier's single lock:
//! dequeuing marks the address in-flight before the lock is released, so
//! no observer can catch the queue transiently empty mid-fetch. When the
//! last completion makes the frontier idle, parked workers are woken to
//! exit and [`Crawl::await_idle`] returns, broadcasting the formatter's
//! idle output so event sinks can stop without polling.
//!
//! ## Cancellation and Graceful Shutdown
//!
//! [`Crawl::stop`] trips a cancellation token. Workers observe it between
//! iterations and while a fetch is in flight; every fetch is additionally
//! bounded by the configured timeout, so no worker can block forever.
//! [`Crawl::shutdown_graceful`] waits for idle first, then cancels and
//! closes the event channel, unblocking all remaining stream consumers.
//!
//! # Example: end-to-end usage
//!
//! ```rust,no_run
//! use crawlmap::crawler::{Crawl, CrawlEvent, Crawler, CrawlerOptions, StructuredFormatter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let crawler = Crawler::<StructuredFormatter>::new()
//!         .with_options(CrawlerOptions {
//!             worker_count: 3,
//!             ..CrawlerOptions::default()
//!         })
//!         .build();
//!
//!     // Subscribe before seeding so no event is missed.
//!     let mut events = crawler.events().await.unwrap();
//!
//!     crawler.add_seed("http://example.com/").unwrap();
//!     crawler.start();
//!
//!     tokio::spawn(async move {
//!         while let Some(event) = events.next().await {
//!             match event {
//!                 CrawlEvent::Crawled { address } => println!("Crawled: {address}"),
//!                 CrawlEvent::FetchFailed { address, reason } => {
//!                     println!("Failed: {address} ({reason})")
//!                 }
//!                 CrawlEvent::Idle => break,
//!             }
//!         }
//!     });
//!
//!     crawler.await_idle().await;
//!     crawler.shutdown_graceful().await;
//! }
//! ```
//!
//! ## Design Notes
//!
//! - An address is fetched **at most once** — the visited set is the sole
//!   serialization point, and entries are never removed during a run.
//! - A fetch failure degrades to one `FetchFailed` event; it never aborts
//!   the worker pool or other in-flight fetches. There is no retry.
//! - Events are emitted in dequeue order per worker, interleaved
//!   arbitrarily across workers; no global crawl order is guaranteed.
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{Notify, broadcast};
use tokio_stream::{StreamExt, wrappers::BroadcastStream};
use tokio_util::sync::CancellationToken;

mod buffer_pool;
pub mod extract;
pub mod fetch;
pub mod formatter;
mod frontier;
mod visited;

pub use extract::extract_links;
pub use fetch::{FetchErrorKind, FetchResult};
pub use formatter::{EventFormatter, JsonFormatter, StructuredFormatter};

use crate::utils::{Address, AddressError};
use buffer_pool::BufferPool;
use fetch::FetchSettings;
use frontier::Frontier;
use visited::VisitedSet;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// One event per dequeued address, plus the engine's idle signal.
///
/// `Crawled` and `FetchFailed` are emitted exactly once per address pulled
/// off the frontier. `Idle` is broadcast when the run completes (queue
/// empty, nothing in flight) so sinks can stop without polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrawlEvent {
    Crawled {
        address: String,
    },
    FetchFailed {
        address: String,
        reason: FetchErrorKind,
    },
    Idle,
}

/// High-level asynchronous interface for a crawl run.
///
/// A type implementing [`Crawl`] represents a fully operational crawler
/// instance. Users never interact with the internal runtime
/// (`BuiltCrawler`); they only use a trait object returned from
/// [`Crawler::build`].
///
/// # Concurrency
/// All methods are thread-safe and can be called from multiple tasks
/// without additional synchronization.
#[async_trait]
pub trait Crawl: Send + Sync + 'static {
    type F: EventFormatter;

    /// Parses `url` and, when it passes the visited-set gate, enqueues it.
    ///
    /// Returns `Ok(true)` for the call that admits the address,
    /// `Ok(false)` when the address was already admitted, and an error for
    /// malformed input (which never reaches the gate).
    fn add_seed(&self, url: &str) -> Result<bool, AddressError>;

    /// Number of addresses waiting in the frontier.
    fn queued(&self) -> usize;

    /// Number of distinct addresses ever admitted through the gate.
    fn discovered(&self) -> usize;

    /// Spawns the worker pool. Seed before starting: workers exit as soon
    /// as the frontier is idle. Only the first call spawns anything; later
    /// calls are no-ops.
    fn start(&self);

    /// Returns a stream of events produced during the crawl, or `None`
    /// once the engine has shut down.
    async fn events(&self) -> Option<EventStream<<Self::F as EventFormatter>::Output>>;

    /// Resolves when the frontier is idle (queue empty, nothing in
    /// flight), broadcasting the formatter's idle output.
    async fn await_idle(&self);

    /// Trips the stop signal. Workers abandon further dequeues and
    /// in-flight fetches are abandoned at the next cancellation point.
    fn stop(&self);

    /// Waits for idle, then cancels and closes the event channel.
    async fn shutdown_graceful(&self);
}

/// An event stream that is aware of crawler activity.
///
/// Wraps a broadcast subscription and holds a `Notify` handle that wakes
/// listeners when new addresses enter the frontier, enabling loops that
/// pause on the idle signal and resume when more work arrives.
pub struct EventStream<T> {
    inner: BroadcastStream<T>,
    notify: Arc<Notify>,
}

impl<T: Clone + Send + Sync + 'static> EventStream<T> {
    fn new(rx: broadcast::Receiver<T>, notify: Arc<Notify>) -> Self {
        Self {
            inner: BroadcastStream::new(rx),
            notify,
        }
    }

    /// Receives the next event, skipping over lagged gaps. Returns `None`
    /// once the engine has shut down.
    pub async fn next(&mut self) -> Option<T> {
        while let Some(msg) = self.inner.next().await {
            match msg {
                Ok(val) => return Some(val),
                Err(_) => continue,
            }
        }
        None
    }

    /// Blocks until new addresses are enqueued.
    pub async fn notify_when_enqueued(&self) {
        self.notify.notified().await;
    }
}

/// Runtime configuration for a crawl run.
///
/// # Defaults
/// ```rust,ignore
/// CrawlerOptions {
///     worker_count: 3,
///     timeout_ms: 3_000,
///     max_body_bytes: 16_384,
/// }
/// ```
#[derive(Clone, Debug)]
pub struct CrawlerOptions {
    /// Number of concurrent workers, independent of crawl size.
    pub worker_count: usize,
    /// Deadline applied to each network step of a fetch, in milliseconds.
    pub timeout_ms: u64,
    /// Upper bound on response bytes read per fetch.
    pub max_body_bytes: usize,
}

impl Default for CrawlerOptions {
    fn default() -> Self {
        Self {
            worker_count: 3,
            timeout_ms: 3_000,
            max_body_bytes: 16_384,
        }
    }
}

/// Core shared state for a crawl run.
///
/// This type does **not** execute anything. It stores the runtime
/// components: the frontier queue, the visited set, the buffer pool, the
/// event broadcast sender, the formatter and the coordination primitives.
///
/// A user never constructs workers directly. Instead, call:
///
/// - [`Crawler::new`] to create a configured crawler
/// - [`Crawler::build`] to obtain an `Arc<dyn Crawl>`
pub struct Crawler<F>
where
    F: EventFormatter,
{
    /// Configuration options controlling runtime behavior.
    pub options: CrawlerOptions,
    frontier: Frontier,
    visited: VisitedSet,
    buffers: BufferPool,
    /// Broadcast channel for crawl events.
    events_tx: Mutex<Option<broadcast::Sender<<F as EventFormatter>::Output>>>,
    /// Formatter used to shape events for the channel.
    pub formatter: F,
    cancellation: CancellationToken,
    work_notify: Arc<Notify>,
    idle_notify: Notify,
    started: AtomicBool,
}

impl<F> Crawler<F>
where
    F: EventFormatter + Default,
{
    /// Creates a new [`Crawler`] with default configuration.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel::<F::Output>(EVENT_CHANNEL_CAPACITY);

        Self {
            options: CrawlerOptions::default(),
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            buffers: BufferPool::new(),
            events_tx: Mutex::new(Some(sender)),
            formatter: F::default(),
            cancellation: CancellationToken::new(),
            work_notify: Arc::new(Notify::new()),
            idle_notify: Notify::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Sets custom configuration.
    pub fn with_options(mut self, options: CrawlerOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds a ready-to-use [`Crawl`] implementation.
    pub fn build(self) -> Arc<dyn Crawl<F = F> + Send + Sync + 'static> {
        Arc::new(BuiltCrawler(Arc::new(self)))
    }
}

impl<F> Crawler<F>
where
    F: EventFormatter,
{
    /// The gate-then-enqueue step: the single path by which any address,
    /// seed or discovered, enters the frontier.
    fn admit(&self, address: Address) -> bool {
        if !self.visited.try_add(&address) {
            return false;
        }
        self.frontier.enqueue(address);
        self.work_notify.notify_waiters();
        true
    }

    fn emit(&self, event: &CrawlEvent) {
        if let Some(tx) = self.events_tx.lock().as_ref() {
            tx.send(self.formatter.format(event)).ok();
        }
    }

    fn emit_idle(&self) {
        if let Some(tx) = self.events_tx.lock().as_ref() {
            tx.send(self.formatter.idle_output()).ok();
        }
    }

    /// Wakes parked workers (so they observe termination) and idle
    /// waiters.
    fn signal_idle(&self) {
        self.work_notify.notify_waiters();
        self.idle_notify.notify_waiters();
    }

    /// Blocks until the frontier is idle. Returns `true` when idle was
    /// actually reached, `false` when the run was cancelled first.
    async fn wait_until_idle(&self) -> bool {
        loop {
            let notified = self.idle_notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.frontier.is_idle() {
                return true;
            }

            tokio::select! {
                _ = notified.as_mut() => {}
                _ = self.cancellation.cancelled() => return false,
            }
        }
    }
}

/// RAII guard pairing every dequeue with exactly one completion.
///
/// Dropping the guard returns the in-flight mark even if the worker is
/// cancelled or panics mid-fetch, keeping idle detection deterministic.
struct InFlightGuard<'a, F>
where
    F: EventFormatter,
{
    crawler: &'a Crawler<F>,
}

impl<F> Drop for InFlightGuard<'_, F>
where
    F: EventFormatter,
{
    fn drop(&mut self) {
        if self.crawler.frontier.complete() {
            self.crawler.signal_idle();
        }
    }
}

/// Internal runtime implementing the [`Crawl`] trait.
///
/// Users should **never reference** this type directly; it is hidden
/// behind `Arc<dyn Crawl>`.
struct BuiltCrawler<F>(Arc<Crawler<F>>)
where
    F: EventFormatter;

#[async_trait]
impl<F> Crawl for BuiltCrawler<F>
where
    F: EventFormatter,
{
    type F = F;

    fn add_seed(&self, url: &str) -> Result<bool, AddressError> {
        let address = Address::parse(url)?;
        Ok(self.0.admit(address))
    }

    fn queued(&self) -> usize {
        self.0.frontier.queued()
    }

    fn discovered(&self) -> usize {
        self.0.visited.len()
    }

    fn start(&self) {
        if self.0.started.swap(true, Ordering::SeqCst) {
            return;
        }
        for _ in 0..self.0.options.worker_count.max(1) {
            let crawler = self.0.clone();
            tokio::spawn(run_worker(crawler));
        }
    }

    async fn events(&self) -> Option<EventStream<<Self::F as EventFormatter>::Output>> {
        self.0
            .events_tx
            .lock()
            .as_ref()
            .map(|tx| EventStream::new(tx.subscribe(), self.0.work_notify.clone()))
    }

    async fn await_idle(&self) {
        if self.0.wait_until_idle().await {
            self.0.emit_idle();
        }
    }

    fn stop(&self) {
        self.0.cancellation.cancel();
    }

    async fn shutdown_graceful(&self) {
        self.0.wait_until_idle().await;
        self.0.cancellation.cancel();

        if let Some(tx) = self.0.events_tx.lock().take() {
            drop(tx);
        }
    }
}

/// One worker: dequeue, fetch outside every lock, emit, extract, gate,
/// enqueue, repeat — until the frontier is idle or the run is cancelled.
async fn run_worker<F>(crawler: Arc<Crawler<F>>)
where
    F: EventFormatter,
{
    let settings = FetchSettings {
        timeout: Duration::from_millis(crawler.options.timeout_ms),
        max_body_bytes: crawler.options.max_body_bytes,
    };

    loop {
        if crawler.cancellation.is_cancelled() {
            break;
        }

        let Some(address) = crawler.frontier.dequeue() else {
            // Register interest before re-checking so an enqueue or the
            // final completion landing in between cannot be missed.
            let notified = crawler.work_notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if crawler.frontier.is_idle() {
                break;
            }
            if crawler.frontier.queued() > 0 {
                continue;
            }

            tokio::select! {
                _ = notified.as_mut() => {}
                _ = crawler.cancellation.cancelled() => break,
            }
            continue;
        };

        let guard = InFlightGuard { crawler: &crawler };

        let result = tokio::select! {
            result = fetch::fetch(&address, &settings, &crawler.buffers) => result,
            _ = crawler.cancellation.cancelled() => break,
        };

        let event = match result {
            FetchResult::Fetched { body, source_host } => {
                let mut admitted = 0usize;
                for link in extract::extract_links(&body, &source_host) {
                    if crawler.admit(link) {
                        admitted += 1;
                    }
                }
                debug!("crawled {} ({} new addresses)", address, admitted);
                CrawlEvent::Crawled {
                    address: address.as_str().to_string(),
                }
            }
            FetchResult::Failed { reason } => {
                debug!("fetch failed for {}: {}", address, reason);
                CrawlEvent::FetchFailed {
                    address: address.as_str().to_string(),
                    reason,
                }
            }
        };

        crawler.emit(&event);
        drop(guard);
    }
}

/// Starts a crawl over `seeds` with `worker_count` workers, returning the
/// control handle and the stream of [`CrawlEvent`]s.
///
/// The stream is subscribed before the first seed is admitted, so no event
/// is missed. Malformed seeds fail the whole call; nothing has been
/// started at that point.
pub async fn start(
    seeds: &[&str],
    worker_count: usize,
) -> Result<
    (
        Arc<dyn Crawl<F = StructuredFormatter> + Send + Sync + 'static>,
        EventStream<CrawlEvent>,
    ),
    AddressError,
> {
    let crawler = Crawler::<StructuredFormatter>::new()
        .with_options(CrawlerOptions {
            worker_count,
            ..CrawlerOptions::default()
        })
        .build();

    let events = crawler
        .events()
        .await
        .expect("event channel is open on a fresh crawler");

    for seed in seeds {
        crawler.add_seed(seed)?;
    }
    crawler.start();

    Ok((crawler, events))
}
