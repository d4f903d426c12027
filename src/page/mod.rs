//! Page parsers
//!
//! This module locates raw fragments inside a fetched page and feeds them to
//! the record loaders. It contains:
//! - `Page`: a parsed document plus the URL it was requested under
//! - `Lookup`: a CSS selector paired with what to read from each match
//! - One parser per page role (list, book, author)

mod author;
mod book;
mod links;
mod list;

pub use author::{is_blog_listing, AuthorParser, BLOG_LISTING_MARKER};
pub use book::{BookParser, BOOK_FIELD_MAP};
pub use links::resolve_link;
pub use list::ListParser;

use crate::crawl::{Emission, ParserRole};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A parser for one page role
///
/// Implementations hold configuration only, so one instance can serve many
/// pages concurrently.
pub trait PageParser: Send + Sync {
    /// The role this parser handles
    fn role(&self) -> ParserRole;

    /// Extracts records and follow-up requests from a page, in output order
    fn parse(&self, page: &Page) -> Vec<Emission>;
}

/// What a lookup reads from each matched element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Each direct child text node, as a separate fragment
    OwnText,
    /// The value of an attribute
    Attr(&'static str),
    /// The element's serialized HTML, tags included
    OuterHtml,
}

/// A structural lookup: CSS selector plus source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub selector: &'static str,
    pub source: Source,
}

impl Lookup {
    pub const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            source: Source::OwnText,
        }
    }

    pub const fn attr(selector: &'static str, name: &'static str) -> Self {
        Self {
            selector,
            source: Source::Attr(name),
        }
    }

    pub const fn html(selector: &'static str) -> Self {
        Self {
            selector,
            source: Source::OuterHtml,
        }
    }
}

/// A fetched page ready for fragment lookups
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// Parses HTML content requested under `url`
    pub fn new(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Runs a lookup and returns its fragments in document order
    pub fn fragments(&self, lookup: &Lookup) -> Vec<String> {
        let mut fragments = Vec::new();

        for element in self.select(lookup.selector) {
            match lookup.source {
                Source::OwnText => fragments.extend(own_text(element)),
                Source::Attr(name) => {
                    if let Some(value) = element.value().attr(name) {
                        fragments.push(value.to_string());
                    }
                }
                Source::OuterHtml => fragments.push(element.html()),
            }
        }

        fragments
    }

    /// Resolves the `href` of every element matching `selector`
    ///
    /// Links that cannot be resolved to an http(s) URL are skipped.
    pub fn links(&self, selector: &str) -> Vec<Url> {
        self.select(selector)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_link(href, &self.url))
            .collect()
    }

    /// The first resolvable link matching `selector`
    pub fn first_link(&self, selector: &str) -> Option<Url> {
        self.links(selector).into_iter().next()
    }

    fn select<'a>(&'a self, selector: &str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let selector = match Selector::parse(selector) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::warn!("Invalid selector {}: {:?}", selector, e);
                None
            }
        };

        selector
            .into_iter()
            .flat_map(move |selector| self.document.select(&selector).collect::<Vec<_>>())
    }
}

fn own_text(element: ElementRef<'_>) -> impl Iterator<Item = String> + '_ {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|text| text.to_string()))
}
