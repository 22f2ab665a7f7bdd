use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One member's travel preferences for a trip.
///
/// A resubmission for the same `(group, user)` pair replaces the previous
/// record wholesale; there is no field-level merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: String,
    /// Where the member is travelling from.
    #[serde(rename = "from")]
    pub origin: String,
    /// Free-text destination suggestions; duplicates collapse.
    pub destination_ideas: HashSet<String>,
    #[serde(default)]
    pub dates: Option<DateRange>,
    pub interests: HashSet<String>,
    pub budget: Budget,
    /// True once the member has submitted their final answer.
    pub completed: bool,
}

impl UserPreferences {
    /// Boundary validation. Malformed content is rejected here, before it
    /// can reach the store.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::invalid_input("user id must not be empty"));
        }
        if let Some(dates) = &self.dates {
            dates.validate()?;
        }
        self.budget.validate()
    }
}

/// An inclusive travel window. Either both ends are given or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(Error::invalid_input(format!(
                "travel dates out of order: {} is after {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Per-person budget range in the member's chosen currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub min: u32,
    pub max: u32,
    pub currency: String,
}

impl Budget {
    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(Error::invalid_input(format!(
                "budget minimum {} exceeds maximum {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}
