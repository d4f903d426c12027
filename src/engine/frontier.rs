//! Crawl frontier
//!
//! A FIFO queue of pending follow-ups plus the set of canonical URL keys
//! already queued. A URL is admitted once per crawl, whatever role it is
//! later requested with.

use crate::crawl::FollowUp;
use crate::url::canonical_key;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FollowUp>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a request unless its URL was queued before
    ///
    /// # Returns
    ///
    /// `true` if the request was admitted, `false` for a duplicate
    pub fn push(&mut self, request: FollowUp) -> bool {
        if !self.seen.insert(canonical_key(&request.url)) {
            tracing::trace!("Skipping already queued {}", request.url);
            return false;
        }
        self.queue.push_back(request);
        true
    }

    pub fn pop(&mut self) -> Option<FollowUp> {
        self.queue.pop_front()
    }

    /// Number of requests waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs ever admitted
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::ParserRole;
    use url::Url;

    fn request(url: &str, role: ParserRole) -> FollowUp {
        FollowUp::new(Url::parse(url).unwrap(), role)
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.push(request("https://example.com/a", ParserRole::List));
        frontier.push(request("https://example.com/b", ParserRole::Book));

        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pop().unwrap().url.path(), "/a");
        assert_eq!(frontier.pop().unwrap().url.path(), "/b");
        assert!(frontier.pop().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_duplicates_rejected_by_canonical_form() {
        let mut frontier = Frontier::new();
        assert!(frontier.push(request(
            "https://example.com/author/show/1",
            ParserRole::Author
        )));
        assert!(!frontier.push(request(
            "https://example.com/author/show/1/#bio",
            ParserRole::Author
        )));
        assert!(!frontier.push(request(
            "https://example.com/author/show/1?from_search=true",
            ParserRole::Book
        )));

        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.seen_count(), 1);
    }

    #[test]
    fn test_popped_urls_stay_seen() {
        let mut frontier = Frontier::new();
        frontier.push(request("https://example.com/a", ParserRole::Book));
        frontier.pop();
        assert!(!frontier.push(request("https://example.com/a", ParserRole::Book)));
    }
}
