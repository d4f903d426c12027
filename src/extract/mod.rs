//! Field extractors
//!
//! Pure, total functions that turn one raw fragment (or a list of them) into
//! a typed value. Malformed input yields `None`; nothing in here panics or
//! returns an error, so a bad fragment can never abort a record.
//!
//! - Dates: fuzzy date parsing, publication date lines, first-published year
//! - Histogram: star counts scraped out of inline chart script
//! - Identifiers: ASIN / ISBN-10 / ISBN-13 validators
//! - Text: trimming, counts, ratings, page counts, tag stripping

mod dates;
mod histogram;
mod identifiers;
mod text;

pub use dates::{extract_first_publish_year, extract_publish_dates, parse_flexible_date};
pub use histogram::extract_rating_histogram;
pub use identifiers::{filter_asin, filter_isbn10, filter_isbn13};
pub use text::{
    clean_text, extract_num_pages, parse_count, parse_rating, strip_tags_and_boilerplate,
};
