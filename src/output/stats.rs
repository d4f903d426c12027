//! Crawl statistics
//!
//! Counters are shared between the engine driver and the emission observer,
//! so they are atomics behind an `Arc`.

use crate::record::Record;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for a crawl run
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicU64,
    pages_failed: AtomicU64,
    duplicates_skipped: AtomicU64,
    books: AtomicU64,
    authors: AtomicU64,
    follow_ups: AtomicU64,
    observer_failures: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_follow_up(&self) {
        self.follow_ups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_observer_failures(&self, count: u64) {
        self.observer_failures.fetch_add(count, Ordering::Relaxed);
    }

    /// Counts an emitted record by kind
    pub fn record_emitted(&self, record: &Record) {
        let counter = match record {
            Record::Book(_) => &self.books,
            Record::Author(_) => &self.authors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the counters into a plain value
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            pages_failed: self.pages_failed.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            books: self.books.load(Ordering::Relaxed),
            authors: self.authors.load(Ordering::Relaxed),
            follow_ups: self.follow_ups.load(Ordering::Relaxed),
            observer_failures: self.observer_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CrawlStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub pages_fetched: u64,
    pub pages_failed: u64,
    pub duplicates_skipped: u64,
    pub books: u64,
    pub authors: u64,
    pub follow_ups: u64,
    pub observer_failures: u64,
}

impl StatsSnapshot {
    /// Share of attempted pages that were fetched, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.pages_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StatsSnapshot) {
    println!("=== Crawl Statistics ===\n");

    println!("Pages:");
    println!("  Fetched: {}", stats.pages_fetched);
    println!("  Failed: {}", stats.pages_failed);
    println!("  Duplicate links skipped: {}", stats.duplicates_skipped);
    println!();

    println!("Emissions:");
    println!("  Books: {}", stats.books);
    println!("  Authors: {}", stats.authors);
    println!("  Follow-ups: {}", stats.follow_ups);
    if stats.observer_failures > 0 {
        println!("  Observer failures: {}", stats.observer_failures);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_fetched,
        stats.pages_fetched + stats.pages_failed
    );
}
