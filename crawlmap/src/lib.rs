//! # CrawlMap
//!
//! A Rust library for building concurrent web crawlers with validated CLI
//! input, strict URL parsing, and an async worker-pool engine over raw TCP.
//!
//! ## Features
//!
//! - **Concurrent Crawl Engine** - Fixed worker pool over a shared frontier
//!   queue with deterministic idle detection
//! - **At-Most-Once Fetching** - A bucketed visited set gates every address
//!   before it can enter the frontier
//! - **Raw TCP Fetcher** - Minimal `GET` over a plain socket with per-fetch
//!   timeouts and a bounded read
//! - **Link Extraction** - `href="..."` scanning with relative-reference
//!   resolution against the source host
//! - **Event Streaming** - Broadcast channel of crawl events with pluggable
//!   formatters (structured values or JSON lines)
//! - **Input Sanitization & Validation** - Type-safe input validation with
//!   composable filters
//! - **Interactive Terminal Interface** - User-friendly CLI input with
//!   validation loops
//! - **URL Parsing** - HTTP/HTTPS address parsing with host validation and
//!   normalization
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! crawlmap = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ## Usage Examples
//!
//! ### Crawling a Site
//!
//! ```rust,no_run
//! use crawlmap::crawler::{self, Crawl, CrawlEvent};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (crawler, mut events) = crawler::start(&["http://example.com/"], 3)
//!         .await
//!         .unwrap();
//!
//!     while let Some(event) = events.next().await {
//!         match event {
//!             CrawlEvent::Crawled { address } => println!("Crawled: {address}"),
//!             CrawlEvent::FetchFailed { address, reason } => {
//!                 println!("Failed: {address} ({reason})")
//!             }
//!             CrawlEvent::Idle => break,
//!         }
//!     }
//!
//!     crawler.shutdown_graceful().await;
//! }
//! ```
//!
//! ### Custom Configuration
//!
//! ```rust,no_run
//! use crawlmap::crawler::{Crawler, CrawlerOptions, JsonFormatter};
//!
//! let crawler = Crawler::<JsonFormatter>::new()
//!     .with_options(CrawlerOptions {
//!         worker_count: 8,
//!         timeout_ms: 5_000,
//!         max_body_bytes: 32_768,
//!     })
//!     .build();
//! ```
//!
//! ### URL Parsing and Validation
//!
//! ```rust,no_run
//! use crawlmap::utils::Address;
//!
//! match Address::parse("http://example.com:8080/api") {
//!     Ok(address) => {
//!         println!("Scheme: {}", address.scheme());
//!         println!("Host: {}", address.host());
//!         println!("Port: {}", address.port());
//!         println!("Path: {}", address.path());
//!     }
//!     Err(e) => eprintln!("Invalid URL: {}", e),
//! }
//! ```
//!
//! ### Basic Input & Range Validation
//!
//! ```rust,no_run
//! use crawlmap::utils::{Terminal, Sanitize};
//!
//! // Get validated user input with range checking
//! let workers = Terminal::ask(
//!     "Enter worker count (1-32):",
//!     &[Sanitize::IsBetween(1, 32)],
//! );
//! println!("Workers: {}", workers.answer);
//! ```
//!
//! ## Architecture
//!
//! The library is designed with modularity and composability in mind:
//!
//! - **`crawler`** - The crawl engine: frontier, visited set, fetcher, link
//!   extractor, event formatters
//! - **`utils`** - Core utilities for input handling and URL parsing
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, E>` types for safe error
//! handling:
//!
//! ```rust,no_run
//! use crawlmap::utils::{Address, AddressError};
//!
//! match Address::parse("invalid url") {
//!     Ok(address) => println!("Valid address: {}", address),
//!     Err(AddressError::InvalidScheme) => eprintln!("Only HTTP/HTTPS supported"),
//!     Err(AddressError::InvalidHost) => eprintln!("Invalid hostname or IP"),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```
//!
//! Inside the engine, failures never escalate: a fetch that goes wrong
//! becomes one `FetchFailed` event and the crawl keeps going.

pub mod crawler;

pub mod utils;
