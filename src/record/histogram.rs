use serde::Serialize;
use std::collections::BTreeMap;

/// Number of ratings per star rank, keys are always 1 through 5
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RatingHistogram(BTreeMap<u8, u64>);

impl RatingHistogram {
    /// Builds a histogram from counts ordered 5 stars first, 1 star last
    pub fn from_descending(counts: [u64; 5]) -> Self {
        let ranks = counts
            .iter()
            .enumerate()
            .map(|(i, count)| (5 - i as u8, *count))
            .collect();
        Self(ranks)
    }

    /// Count for a star rank, `None` outside 1..=5
    pub fn get(&self, stars: u8) -> Option<u64> {
        self.0.get(&stars).copied()
    }
}
