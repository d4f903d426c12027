//! URL handling for the crawl frontier
//!
//! Follow-up links arrive in many spellings of the same page: with a
//! `#reviews` fragment, with `?from_search=true`, with query parameters in
//! a different order. The frontier keys its visited set on a canonical form
//! so each page is fetched once.

mod canonical;

pub use canonical::{canonical_key, is_tracking_param};
