use serde::Serialize;

use crate::timer::Mark;

/// Summary of a timing session, as returned by [`crate::Timer::stats`].
///
/// The `mark_*` fields are only present when at least one mark was recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub start: f64,
    pub stop: Option<f64>,
    pub elapsed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_shortest: Option<Mark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_longest: Option<Mark>,
}

/// Everything [`crate::Timer::dump`] prints.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    #[serde(rename = "STATISTICS")]
    pub statistics: Option<Stats>,
    #[serde(rename = "MARKS")]
    pub marks: Vec<Mark>,
    #[serde(rename = "ERRORS")]
    pub errors: Vec<String>,
}
