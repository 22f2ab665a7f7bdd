pub mod candidate;
pub mod group;
pub mod preferences;
pub mod results;
