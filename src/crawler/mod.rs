//! Crawler module for concurrent, depth-bounded crawling
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier with blocking hand-off and termination detection
//! - The worker loop (take, fetch, extract, admit)
//! - HTTP fetching and `<a href>` link extraction
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod worker;

pub use coordinator::{run_crawl, Coordinator, CrawlPhase};
pub use extractor::{AnchorExtractor, LinkExtractor};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher, ResponseBody};
pub use frontier::{Frontier, FrontierSnapshot};
pub use worker::{Worker, WorkerStats};
