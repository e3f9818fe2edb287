/// Seed construction — one deterministic string per decoration attempt.

use std::fmt;

/// Joins the seed components. None of the components may contain it:
/// ids and level tags come from the admin API's slug rules, the day
/// bucket is an ISO date.
pub const SEED_DELIMITER: char = '|';

/// Appended to the seed for the guard's single re-sample.
pub const RETRY_SUFFIX: &str = "|retry1";

/// Ephemeral inputs identifying one decoration attempt. Constructed
/// fresh per call and never persisted; only the sequence counter and the
/// pick history it derives from outlive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionContext {
    pub account_id: String,
    pub preset_id: String,
    pub level: String,
    /// The account's local calendar date, `YYYY-MM-DD`.
    pub day: String,
    pub sequence: u64,
}

impl SelectionContext {
    /// The seed string for this attempt, stable across retries with the
    /// same inputs.
    pub fn seed(&self) -> String {
        self.to_string()
    }

    /// The seed for the guard's re-sample. The sequence counter is NOT
    /// re-read for a retry; only the suffix changes.
    pub fn retry_seed(&self) -> String {
        let mut seed = self.seed();
        seed.push_str(RETRY_SUFFIX);
        seed
    }
}

impl fmt::Display for SelectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.account_id,
            self.preset_id,
            self.level,
            self.day,
            self.sequence,
            d = SEED_DELIMITER
        )
    }
}
