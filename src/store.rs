use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::model::{
    candidate::{remaining_votes, Candidate, VoteCount},
    group::{GroupCode, GroupStatus, GroupTrip},
    preferences::UserPreferences,
};

/// The store as managed by Rocket and injected into handlers.
pub type SharedStore = Box<dyn GroupStore>;

/// Storage abstraction for group trips. Injected into the HTTP layer so a
/// durable backend can be substituted without touching the status, tally,
/// or ranking logic.
///
/// Every operation is short, synchronous, and all-or-nothing: on error the
/// prior state is unchanged.
pub trait GroupStore: Send + Sync {
    /// Register a new group with the given target size.
    /// Fails with [`Error::Conflict`] if the code is already taken.
    fn create(&self, code: GroupCode, expected_users: u32) -> Result<()>;

    /// Snapshot of a group, or `None` if the code is unknown.
    /// An unknown code is a normal outcome here, not a fault.
    fn get(&self, code: &GroupCode) -> Option<GroupTrip>;

    /// Insert or wholly replace the preferences for `(group, user)`.
    ///
    /// An unknown group is implicitly created with `default_users` as its
    /// target size. Fails with [`Error::Conflict`] if a new member would
    /// push the group past its target size.
    fn upsert_preferences(
        &self,
        code: &GroupCode,
        preferences: UserPreferences,
        default_users: u32,
    ) -> Result<()>;

    /// Preference-collection progress. Unknown groups report zero progress.
    fn status(&self, code: &GroupCode) -> GroupStatus;

    /// The group's fixed candidate set, installing `candidates` as that set
    /// if voting has not opened yet. Subsequent calls return the installed
    /// set untouched.
    fn open_voting(&self, code: &GroupCode, candidates: Vec<Candidate>) -> Result<Vec<Candidate>>;

    /// Snapshot of the candidate set with current tallies.
    /// Fails with [`Error::Conflict`] if voting has not opened.
    fn candidates(&self, code: &GroupCode) -> Result<Vec<Candidate>>;

    /// Count one like/dislike for a candidate on behalf of a member.
    ///
    /// Rejects a second vote by the same member on the same candidate with
    /// [`Error::DuplicateVote`], and a vote for a candidate outside the
    /// fixed set with [`Error::UnknownCandidate`]; in both cases no counter
    /// changes.
    fn record_vote(
        &self,
        code: &GroupCode,
        user_id: &str,
        candidate_id: &str,
        liked: bool,
    ) -> Result<VoteReceipt>;
}

/// Outcome of a successfully recorded vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    /// Updated tally for the voted-on candidate.
    #[serde(flatten)]
    pub votes: VoteCount,
    /// How many candidates this member has voted on so far.
    pub votes_cast: usize,
    /// How many candidates this member still has to vote on.
    pub remaining: usize,
}

/// Everything the server holds about one group.
#[derive(Debug)]
struct GroupEntry {
    trip: GroupTrip,
    /// Fixed candidate set; `None` until voting opens.
    candidates: Option<Vec<Candidate>>,
    /// `(user_id, candidate_id)` pairs already voted, for duplicate rejection.
    votes_seen: HashSet<(String, String)>,
}

impl GroupEntry {
    fn new(trip: GroupTrip) -> Self {
        Self {
            trip,
            candidates: None,
            votes_seen: HashSet::new(),
        }
    }
}

/// In-memory [`GroupStore`]. State lives for the lifetime of the process.
///
/// Groups are independent, so each gets its own lock: the outer map is only
/// locked long enough to find or insert an entry, and all reads and writes
/// of one group's members, candidates, and counters serialize on that
/// group's mutex. Readers clone a snapshot out while holding it, so no
/// partial update is ever observable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    groups: RwLock<HashMap<GroupCode, Arc<Mutex<GroupEntry>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the lock for an existing group.
    fn entry(&self, code: &GroupCode) -> Option<Arc<Mutex<GroupEntry>>> {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(code)
            .cloned()
    }

    /// Fetch the lock for a group, creating the group if it is unknown.
    fn entry_or_create(&self, code: &GroupCode, expected_users: u32) -> Arc<Mutex<GroupEntry>> {
        let mut groups = self.groups.write().unwrap_or_else(PoisonError::into_inner);
        groups
            .entry(code.clone())
            .or_insert_with(|| {
                info!("Implicitly creating group {code} for {expected_users} users");
                Arc::new(Mutex::new(GroupEntry::new(GroupTrip::new(
                    code.clone(),
                    expected_users,
                ))))
            })
            .clone()
    }
}

impl GroupStore for MemoryStore {
    fn create(&self, code: GroupCode, expected_users: u32) -> Result<()> {
        let mut groups = self.groups.write().unwrap_or_else(PoisonError::into_inner);
        if groups.contains_key(&code) {
            return Err(Error::Conflict(format!("group code '{code}' already taken")));
        }
        let trip = GroupTrip::new(code.clone(), expected_users);
        groups.insert(code, Arc::new(Mutex::new(GroupEntry::new(trip))));
        Ok(())
    }

    fn get(&self, code: &GroupCode) -> Option<GroupTrip> {
        let entry = self.entry(code)?;
        let entry = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Some(entry.trip.clone())
    }

    fn upsert_preferences(
        &self,
        code: &GroupCode,
        preferences: UserPreferences,
        default_users: u32,
    ) -> Result<()> {
        let entry = self.entry_or_create(code, default_users);
        let mut entry = entry.lock().unwrap_or_else(PoisonError::into_inner);
        let is_new_member = !entry.trip.members.contains_key(&preferences.user_id);
        if is_new_member && entry.trip.members.len() as u32 >= entry.trip.expected_users {
            return Err(Error::Conflict(format!(
                "group '{code}' already has its {} members",
                entry.trip.expected_users
            )));
        }
        entry
            .trip
            .members
            .insert(preferences.user_id.clone(), preferences);
        Ok(())
    }

    fn status(&self, code: &GroupCode) -> GroupStatus {
        match self.entry(code) {
            Some(entry) => {
                let entry = entry.lock().unwrap_or_else(PoisonError::into_inner);
                entry.trip.status()
            }
            None => GroupStatus::unknown_group(),
        }
    }

    fn open_voting(&self, code: &GroupCode, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let entry = self
            .entry(code)
            .ok_or_else(|| Error::not_found(format!("group '{code}'")))?;
        let mut entry = entry.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = &entry.candidates {
            return Ok(existing.clone());
        }
        info!(
            "Voting opened for group {code} with {} candidates",
            candidates.len()
        );
        entry.candidates = Some(candidates.clone());
        Ok(candidates)
    }

    fn candidates(&self, code: &GroupCode) -> Result<Vec<Candidate>> {
        let entry = self
            .entry(code)
            .ok_or_else(|| Error::not_found(format!("group '{code}'")))?;
        let entry = entry.lock().unwrap_or_else(PoisonError::into_inner);
        entry
            .candidates
            .clone()
            .ok_or_else(|| Error::Conflict(format!("voting has not opened for group '{code}'")))
    }

    fn record_vote(
        &self,
        code: &GroupCode,
        user_id: &str,
        candidate_id: &str,
        liked: bool,
    ) -> Result<VoteReceipt> {
        let entry = self
            .entry(code)
            .ok_or_else(|| Error::not_found(format!("group '{code}'")))?;
        let mut entry = entry.lock().unwrap_or_else(PoisonError::into_inner);

        let seen_key = (user_id.to_string(), candidate_id.to_string());
        if entry.votes_seen.contains(&seen_key) {
            return Err(Error::DuplicateVote {
                user_id: user_id.to_string(),
                candidate_id: candidate_id.to_string(),
            });
        }

        let candidates = entry
            .candidates
            .as_mut()
            .ok_or_else(|| Error::Conflict(format!("voting has not opened for group '{code}'")))?;
        let total_candidates = candidates.len();
        let candidate = candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| Error::UnknownCandidate(candidate_id.to_string()))?;

        candidate.votes.record(liked);
        let votes = candidate.votes;
        entry.votes_seen.insert(seen_key);
        let votes_cast = entry
            .votes_seen
            .iter()
            .filter(|(voter, _)| voter == user_id)
            .count();

        Ok(VoteReceipt {
            votes,
            votes_cast,
            remaining: remaining_votes(total_candidates, votes_cast),
        })
    }
}
