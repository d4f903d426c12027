//! Rating histogram extraction from inline chart script
//!
//! Book pages do not ship the star distribution as markup. The chart is
//! drawn client-side from an inline script that looks like this:
//!
//! ```text
//! renderRatingGraph([6, 3, 2, 2, 1]);
//! if ($('rating_details')) {
//!   $('rating_details').insert({top: $('rating_graph')})
//! }
//! ```
//!
//! so the counts are read straight out of the script source. This is a
//! workaround tied to that call shape; if the call disappears the histogram
//! is simply absent.

use crate::record::RatingHistogram;

/// Name of the chart function whose argument carries the counts
const RENDER_CALL: &str = "renderRatingGraph";

/// Extracts the star histogram from inline script text
///
/// The script is split on `;`, the first statement containing the
/// `renderRatingGraph` call is kept, and the bracketed array inside it is
/// parsed as five integers ordered 5 stars down to 1 star.
///
/// Returns `None` if there is no such call, the brackets are missing, an
/// entry is not a non-negative integer, or the array does not hold exactly
/// five entries.
///
/// # Examples
///
/// ```
/// use bibliocrawl::extract::extract_rating_histogram;
///
/// let histogram = extract_rating_histogram("renderRatingGraph([6,3,2,2,1]);").unwrap();
/// assert_eq!(histogram.get(5), Some(6));
/// assert_eq!(histogram.get(1), Some(1));
/// ```
pub fn extract_rating_histogram(script: &str) -> Option<RatingHistogram> {
    let statement = script
        .split(';')
        .map(str::trim)
        .find(|statement| statement.contains(RENDER_CALL))?;
    // Anything before the call (e.g. a CDATA opener) may hold brackets too
    let call = &statement[statement.find(RENDER_CALL)?..];

    let open = call.find('[')?;
    let close = open + call[open..].find(']')?;

    let counts = call[open + 1..close]
        .split(',')
        .map(|value| value.trim().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let counts: [u64; 5] = counts.try_into().ok()?;
    Some(RatingHistogram::from_descending(counts))
}
