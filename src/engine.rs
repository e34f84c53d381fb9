//! The search core: from raw text to emitted parses.
//!
//! Parsing one input is a pipeline over the modules in `src/engine/`:
//!
//! ```text
//! input ── preprocess ── match_regex          (matcher.rs)
//!                            │
//!                            ▼
//!                       regex_stack           (contiguity.rs)
//!                   maximal contiguous match sequences
//!                            │
//!                            ▼
//!              PartialParse::from_regex_matches  (partial.rs)
//!                 score, prune by relative coverage,
//!                 truncate to the beam depth
//!                            │
//!                            ▼
//!                       ParseStream           (search.rs)
//!            pop best ── apply rules ── push/dedup/truncate
//!                   └─ nothing applied? emit
//! ```
//!
//! The loop is a best-first search over rule applications, ordered by
//! `(covered characters, score)`. Two maps keep it finite and
//! non-repetitive: one suppresses re-pushing a production already seen with
//! an equal or better score, the other suppresses re-emitting an artifact
//! already emitted with an equal or better score.
//!
//! Cancellation is cooperative: a timeout sentinel (timing.rs) is checked on
//! every turn of the contiguity builder and of the main loop. On expiry the
//! stream simply ends; whatever was emitted before stays valid.
//!
//! The engine is single-threaded and synchronous within one parse; the rule
//! registry and the compiled regex table are process-wide and immutable
//! after construction.

mod contiguity;
mod matcher;
mod partial;
mod search;
mod timing;

pub use partial::PartialParse;
pub use search::ParseStream;
