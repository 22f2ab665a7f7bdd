use rocket::{serde::json::Json, Route, State};
use serde::Deserialize;

use crate::catalog::SharedCatalog;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    candidate::{Candidate, CandidateId},
    group::GroupCode,
    results::{rank, RankedResult},
};
use crate::store::{SharedStore, VoteReceipt};

pub fn routes() -> Vec<Route> {
    routes![get_suggestions, submit_vote, get_results]
}

/// The group's fixed candidate set. The first request asks the catalog
/// collaborator for suggestions and installs them; every later request
/// returns that same set with current tallies, so all members swipe the
/// same destinations.
#[get("/group-trips/<code>/suggestions")]
fn get_suggestions(
    code: GroupCode,
    store: &State<SharedStore>,
    catalog: &State<SharedCatalog>,
    config: &State<Config>,
) -> Result<Json<Vec<Candidate>>> {
    let trip = store
        .get(&code)
        .ok_or_else(|| Error::not_found(format!("group '{code}'")))?;
    let suggestions = catalog.suggest(&trip, config.suggestion_limit());
    Ok(Json(store.open_voting(&code, suggestions)?))
}

/// Record one member's like/dislike for one candidate. Each member gets
/// exactly one vote per candidate; duplicates are rejected before any
/// counter changes.
#[post("/group-trips/<code>/votes", data = "<vote>", format = "json")]
fn submit_vote(
    code: GroupCode,
    vote: Json<VoteRequest>,
    store: &State<SharedStore>,
) -> Result<Json<VoteReceipt>> {
    let vote = vote.into_inner();
    if vote.user_id.trim().is_empty() {
        return Err(Error::invalid_input("user id must not be empty"));
    }
    let receipt = store.record_vote(&code, &vote.user_id, &vote.candidate_id, vote.liked)?;
    info!(
        "Vote by {} on {} in group {code}: {}",
        vote.user_id,
        vote.candidate_id,
        if vote.liked { "like" } else { "dislike" }
    );
    Ok(Json(receipt))
}

/// Candidates ranked by match score. Can be called before every vote is in,
/// in which case the ranking is provisional.
#[get("/group-trips/<code>/results")]
fn get_results(code: GroupCode, store: &State<SharedStore>) -> Result<Json<Vec<RankedResult>>> {
    let candidates = store.candidates(&code)?;
    Ok(Json(rank(&candidates)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteRequest {
    user_id: String,
    candidate_id: CandidateId,
    liked: bool,
}
