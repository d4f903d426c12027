//! Crawl orchestrator
//!
//! Routes each fetched page to the parser for the role it was requested
//! with, notifies the emission observer, and hands back records and
//! follow-ups. It neither bounds nor deduplicates requests; the engine's
//! visited-URL tracking takes care of cycles such as two authors that
//! influenced each other.

use super::{Emission, PageFetched, ParserRole};
use crate::page::{AuthorParser, BookParser, ListParser, Page, PageParser};
use crate::record::Record;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

/// Callback invoked synchronously for every emitted record
pub type EmitObserver = Box<dyn Fn(&Record) -> anyhow::Result<()> + Send + Sync>;

/// Dispatches fetched pages to the list, book and author parsers
pub struct Orchestrator {
    list: Box<dyn PageParser>,
    book: Box<dyn PageParser>,
    author: Box<dyn PageParser>,
    observer: Option<EmitObserver>,
    observer_failures: AtomicU64,
}

impl Orchestrator {
    /// Creates an orchestrator from explicit parser instances
    pub fn new(
        list: Box<dyn PageParser>,
        book: Box<dyn PageParser>,
        author: Box<dyn PageParser>,
    ) -> Self {
        Self {
            list,
            book,
            author,
            observer: None,
            observer_failures: AtomicU64::new(0),
        }
    }

    /// Creates an orchestrator with the stock parsers
    pub fn with_author_crawl(author_crawl: bool) -> Self {
        Self::new(
            Box::new(ListParser),
            Box::new(BookParser),
            Box::new(AuthorParser::new(author_crawl)),
        )
    }

    /// Registers the emission observer, replacing any previous one
    pub fn with_observer(mut self, observer: EmitObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The parser responsible for a role
    pub fn parser_for(&self, role: ParserRole) -> &dyn PageParser {
        match role {
            ParserRole::List => self.list.as_ref(),
            ParserRole::Book => self.book.as_ref(),
            ParserRole::Author => self.author.as_ref(),
        }
    }

    /// Number of observer calls that returned an error or panicked
    pub fn observer_failures(&self) -> u64 {
        self.observer_failures.load(Ordering::Relaxed)
    }

    /// Parses a fetched page and returns its emissions in parser order
    ///
    /// The observer sees each record before it is returned. An observer
    /// error or panic is logged and does not affect the emissions.
    pub fn handle(&self, fetched: &PageFetched) -> Vec<Emission> {
        let page = Page::new(fetched.requested_url.clone(), &fetched.content);
        let emissions = self.parser_for(fetched.role).parse(&page);

        tracing::debug!(
            "Parsed {} as {}: {} emissions",
            fetched.requested_url,
            fetched.role,
            emissions.len()
        );

        for record in emissions.iter().filter_map(Emission::as_record) {
            self.notify(record);
        }

        emissions
    }

    fn notify(&self, record: &Record) {
        let Some(observer) = &self.observer else {
            return;
        };

        match catch_unwind(AssertUnwindSafe(|| observer(record))) {
            Ok(Ok(())) => return,
            Ok(Err(e)) => {
                tracing::warn!("Observer failed for {} {}: {}", record.kind(), record.url(), e);
            }
            Err(_) => {
                tracing::warn!("Observer panicked for {} {}", record.kind(), record.url());
            }
        }
        self.observer_failures.fetch_add(1, Ordering::Relaxed);
    }
}
