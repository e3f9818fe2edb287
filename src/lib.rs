//! Variant Engine — deterministic structure-variant selection for
//! generated content payloads.
//!
//! Given an account, a preset, a proficiency level, and a calendar day,
//! the engine picks one "content structure" template and splices it into
//! the outgoing payload. The pick is a pure function of its inputs (no
//! RNG, no wall clock, no server round-trip), honors per-level
//! probability weights, and never lets the same variant land three times
//! in a row for an account/preset pair.

pub mod core;
pub mod schema;
