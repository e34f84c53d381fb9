//! The production-rule corpus, English and German, split by concern.
//!
//! Every rule is declared with the `rule!` macro: a stable name (these end
//! up as scorer features), a pattern of regex literals and artifact
//! predicates, and a production over the matched window. Regex literals may
//! use the shared sub-patterns `(?&_day)`, `(?&_month)`, `(?&_year)`,
//! `(?&_hour)` and `(?&_minute)` (see `src/registry.rs`).
//!
//! The `regex` crate has no lookaround, so rules guard number boundaries
//! with `\b` where the original grammar calls for "not glued to more
//! digits". Spurious sub-matches this still admits (a bare hour inside a
//! longer token, a weekday abbreviation inside a word) are tolerated: the
//! search keeps overlapping matches apart and ranking prefers fuller
//! coverage.

pub(crate) mod absorb;
pub(crate) mod dates;
pub(crate) mod durations;
pub(crate) mod helpers;
pub(crate) mod instants;
pub(crate) mod intervals;
pub(crate) mod latent;
pub(crate) mod months;
pub(crate) mod pods;
pub(crate) mod predicates;
pub(crate) mod times;
pub(crate) mod weekdays;

use crate::RuleDef;

/// Every registered rule, in registration order.
pub(crate) fn all() -> Vec<RuleDef> {
    let mut rules = Vec::new();
    rules.extend(absorb::rules());
    rules.extend(weekdays::rules());
    rules.extend(months::rules());
    rules.extend(pods::rules());
    rules.extend(instants::rules());
    rules.extend(dates::rules());
    rules.extend(times::rules());
    rules.extend(intervals::rules());
    rules.extend(durations::rules());
    rules.extend(latent::rules());
    rules
}
