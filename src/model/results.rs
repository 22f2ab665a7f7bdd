use serde::{Deserialize, Serialize};

use crate::model::candidate::{Candidate, CandidateId, VoteCount};

/// One entry in the final ordering presented to the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    /// 1-based position; ties receive distinct sequential ranks.
    pub rank: u32,
    pub id: CandidateId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub interests: Vec<String>,
    pub price: String,
    pub match_score: u32,
    pub votes: VoteCount,
}

/// Order candidates for display: match score descending, ties broken by
/// total vote count descending, then by candidate id ascending so the
/// ordering is fully deterministic.
///
/// Pure function of its input; may be called mid-vote for a provisional
/// ranking.
pub fn rank(candidates: &[Candidate]) -> Vec<RankedResult> {
    let mut ordered: Vec<&Candidate> = candidates.iter().collect();
    ordered.sort_by(|a, b| {
        b.votes
            .match_score()
            .cmp(&a.votes.match_score())
            .then(b.votes.total().cmp(&a.votes.total()))
            .then(a.id.cmp(&b.id))
    });
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, candidate)| RankedResult {
            rank: i as u32 + 1,
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            description: candidate.description.clone(),
            image: candidate.image.clone(),
            interests: candidate.interests.clone(),
            price: candidate.price.clone(),
            match_score: candidate.votes.match_score(),
            votes: candidate.votes,
        })
        .collect()
}
