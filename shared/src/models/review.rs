//! Review Model

use serde::{Deserialize, Serialize};

use super::spot::ParseEnumError;

/// Lowest accepted star rating
pub const MIN_STAR: u8 = 1;
/// Highest accepted star rating
pub const MAX_STAR: u8 = 5;

/// Reaction to a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Like => "like",
            VoteKind::Dislike => "dislike",
        }
    }

    /// Counter field on the review document that this vote increments
    pub fn counter_field(&self) -> &'static str {
        match self {
            VoteKind::Like => "like_count",
            VoteKind::Dislike => "dislike_count",
        }
    }
}

impl std::str::FromStr for VoteKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(VoteKind::Like),
            "dislike" => Ok(VoteKind::Dislike),
            _ => Err(ParseEnumError {
                field: "vote",
                value: s.to_string(),
            }),
        }
    }
}

/// Counters after a vote was recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResult {
    pub review_id: String,
    pub kind: VoteKind,
    pub like_count: u64,
    pub dislike_count: u64,
}

/// Outcome of a review submission
///
/// Empty review text is dropped without an error; `accepted` tells the
/// client whether anything was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmitResult {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<String>,
    pub average_star: f64,
    pub review_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_kind_parse() {
        assert_eq!("Like".parse::<VoteKind>(), Ok(VoteKind::Like));
        assert_eq!("dislike".parse::<VoteKind>(), Ok(VoteKind::Dislike));
        assert!("meh".parse::<VoteKind>().is_err());
    }

    #[test]
    fn test_counter_field() {
        assert_eq!(VoteKind::Like.counter_field(), "like_count");
        assert_eq!(VoteKind::Dislike.counter_field(), "dislike_count");
    }
}
