use serde::{Deserialize, Serialize};

/// Stable identifier of a candidate destination.
pub type CandidateId = String;

/// A destination under vote. The descriptive fields are opaque to the
/// tallying and ranking logic; only `id` and `votes` matter to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub interests: Vec<String>,
    /// Price tier, e.g. `€` / `€€` / `€€€`.
    pub price: String,
    #[serde(flatten)]
    pub votes: VoteCount,
}

/// Like/dislike counters for one candidate, both starting at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCount {
    pub likes: u32,
    pub dislikes: u32,
}

impl VoteCount {
    /// Record exactly one vote. Uniqueness per member is not enforced here;
    /// the calling layer must reject duplicates before this point.
    pub fn record(&mut self, liked: bool) {
        if liked {
            self.likes += 1;
        } else {
            self.dislikes += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.likes + self.dislikes
    }

    /// Percentage of positive votes, rounded to the nearest integer.
    /// A candidate nobody has voted on scores zero.
    pub fn match_score(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (f64::from(self.likes) * 100.0 / f64::from(total)).round() as u32
    }
}

/// Votes still to cast by one member: `total_candidates - votes_cast`,
/// never below zero.
pub fn remaining_votes(total_candidates: usize, votes_cast: usize) -> usize {
    total_candidates.saturating_sub(votes_cast)
}
