//! Crawl orchestration
//!
//! This module ties the page parsers together:
//! - Request and emission types shared with the fetch engine
//! - Initial requests (list page ranges, author seeds)
//! - The `Orchestrator`, which maps a fetched page to its parser and
//!   notifies the emission observer
//!
//! The role state machine is List -> Book -> Author, with Author looping
//! back onto itself when author-crawl mode is on.

mod orchestrator;
mod seeds;
mod types;

pub use orchestrator::{EmitObserver, Orchestrator};
pub use seeds::{author_seed_requests, initial_requests, list_page_requests};
pub use types::{Emission, FollowUp, PageFetched, ParserRole};
