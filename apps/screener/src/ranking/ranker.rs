//! Ranker — orders scored resumes for presentation.

use serde::Serialize;

/// Anything the ranker can order.
pub trait Ranked {
    fn score(&self) -> u32;
}

/// Presentation marker for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    /// CSS class used by the results table.
    pub fn css_class(self) -> &'static str {
        match self {
            Medal::Gold => "gold",
            Medal::Silver => "silver",
            Medal::Bronze => "bronze",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult<T> {
    /// 1-based position after sorting.
    pub rank: usize,
    pub item: T,
}

impl<T> RankedResult<T> {
    pub fn medal(&self) -> Option<Medal> {
        Medal::for_rank(self.rank)
    }
}

/// Sorts descending by score and assigns ranks `1..=n`.
///
/// The sort is stable: equal scores keep their upload order. Nothing else
/// (name, size) is used to break ties.
pub fn rank<T: Ranked>(mut items: Vec<T>) -> Vec<RankedResult<T>> {
    items.sort_by(|a, b| b.score().cmp(&a.score()));
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| RankedResult {
            rank: index + 1,
            item,
        })
        .collect()
}
