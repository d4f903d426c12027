//! Record types produced by the extraction pipeline
//!
//! A record is created once per page visit, filled by a loader during a
//! single parse pass and then handed off by value. The `url` of a record is
//! set at construction and has no setter.

mod histogram;
mod timestamp;

pub use histogram::RatingHistogram;
pub use timestamp::Timestamp;

use serde::Serialize;
use std::collections::BTreeSet;

/// A record emitted by a page parser
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Book(Book),
    Author(Author),
}

impl Record {
    /// Returns the URL of the page this record was extracted from
    pub fn url(&self) -> &str {
        match self {
            Self::Book(book) => book.url(),
            Self::Author(author) => author.url(),
        }
    }

    /// Short label used in logs and stats
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Book(_) => "book",
            Self::Author(_) => "author",
        }
    }
}

impl From<Book> for Record {
    fn from(book: Book) -> Self {
        Self::Book(book)
    }
}

impl From<Author> for Record {
    fn from(author: Author) -> Self {
        Self::Author(author)
    }
}

/// A book page, keyed by its URL
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Book {
    url: String,

    pub title: Option<String>,
    /// Name of the primary author
    pub author: Option<String>,

    pub num_ratings: Option<u64>,
    pub num_reviews: Option<u64>,
    /// Average rating on the 0.0 to 5.0 scale
    pub avg_rating: Option<f64>,
    pub num_pages: Option<u32>,

    pub language: Option<String>,
    /// Every parseable publication date found on the page, in document order
    pub publish_dates: Vec<Timestamp>,
    pub original_publish_year: Option<i32>,

    /// Exactly 10 digits when present
    pub isbn: Option<String>,
    /// Exactly 13 digits when present
    pub isbn13: Option<String>,
    /// Exactly 10 characters when present
    pub asin: Option<String>,

    pub series: Option<String>,

    pub awards: Vec<String>,
    pub places: Vec<String>,
    pub characters: Vec<String>,
    pub genres: BTreeSet<String>,

    pub rating_histogram: Option<RatingHistogram>,
}

impl Book {
    /// Creates an empty book for the given page URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The first publication date found, if any
    pub fn publish_date(&self) -> Option<Timestamp> {
        self.publish_dates.first().copied()
    }
}

/// An author page, keyed by its URL
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Author {
    url: String,

    pub name: Option<String>,
    pub birth_date: Option<Timestamp>,
    pub death_date: Option<Timestamp>,

    pub avg_rating: Option<f64>,
    pub num_ratings: Option<u64>,
    pub num_reviews: Option<u64>,

    pub genres: BTreeSet<String>,
    /// Names of the authors listed under "influences"
    pub influences: BTreeSet<String>,

    /// Biography text with markup and the leading header line removed
    pub about: Option<String>,
}

impl Author {
    /// Creates an empty author for the given page URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
