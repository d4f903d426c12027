use super::{Page, PageParser};
use crate::crawl::{Emission, FollowUp, ParserRole};

/// Book title anchors on a list page
const BOOK_LINK_SELECTOR: &str = "a.bookTitle";

/// Parser for list pages
///
/// Every book anchor becomes one book follow-up, in document order.
/// Duplicates are left for the engine's visited-URL tracking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParser;

impl PageParser for ListParser {
    fn role(&self) -> ParserRole {
        ParserRole::List
    }

    fn parse(&self, page: &Page) -> Vec<Emission> {
        let emissions: Vec<Emission> = page
            .links(BOOK_LINK_SELECTOR)
            .into_iter()
            .map(|url| Emission::FollowUp(FollowUp::new(url, ParserRole::Book)))
            .collect();

        tracing::debug!("List page {} links {} books", page.url(), emissions.len());
        emissions
    }
}
