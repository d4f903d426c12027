//! Values exchanged between the core and the fetch engine

use crate::record::Record;
use std::fmt;
use url::Url;

/// Which page parser a URL should be handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserRole {
    /// A list page enumerating many books
    List,
    /// A single book page
    Book,
    /// An author page (or any page crawled for author links)
    Author,
}

impl fmt::Display for ParserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Book => "book",
            Self::Author => "author",
        };
        f.write_str(name)
    }
}

/// A request to fetch `url` and parse it with the parser for `role`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub url: Url,
    pub role: ParserRole,
}

impl FollowUp {
    pub fn new(url: Url, role: ParserRole) -> Self {
        Self { url, role }
    }
}

/// One output of a parse call
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    Record(Record),
    FollowUp(FollowUp),
}

impl Emission {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::FollowUp(_) => None,
        }
    }

    pub fn as_follow_up(&self) -> Option<&FollowUp> {
        match self {
            Self::FollowUp(follow_up) => Some(follow_up),
            Self::Record(_) => None,
        }
    }
}

/// A page delivered by the fetch engine
#[derive(Debug, Clone)]
pub struct PageFetched {
    /// The URL that was requested (not the post-redirect URL)
    pub requested_url: Url,
    /// The role the page was requested with
    pub role: ParserRole,
    /// Raw HTML body
    pub content: String,
}
