//! Prompt rendering for lab fixtures.
//!
//! Fixtures carry raw stats exactly as a user would type them; they go through
//! the same normalizer as the CLI before composition.

use anyhow::Result;
use runcard::compose::Session;
use runcard::core::clock::Clock;
use runcard::core::stats::RunStats;
use serde::{Deserialize, Serialize};

/// Stats fixture for a prompt render, loaded from `inputs/*.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestInput {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub time: String,
    /// Date text for `{date}`; the lab clock's month and year when absent.
    #[serde(default)]
    pub date: Option<String>,
}

impl TestInput {
    pub fn to_stats(&self) -> RunStats {
        let mut stats = RunStats::from_raw(&self.distance, &self.time);
        stats.set_date(self.date.clone());
        stats
    }
}

/// Render the prompt for one style with one fixture.
pub fn render_prompt<C: Clock>(
    session: &Session,
    style_id: &str,
    input: &TestInput,
    clock: C,
) -> Result<String> {
    session.compose(style_id, &input.to_stats(), clock, session.compose_options())
}
