//! Absorption rules: swallow filler words next to an already-parsed value.

use crate::artifact::{Interval, Time};
use crate::RuleDef;

/// "at 8", "um 8", "on the 5th", "ca. 12.12." — the qualifier adds nothing.
pub(crate) fn rule_absorb_qualifier() -> RuleDef {
    rule! {
        name: "absorb at|on <time>",
        pattern: [
            re!(r"\b(at|on|am|um|gegen|den|der|the|ca\.?|approx\.?|about|in( the)?)\b"),
            dim!(Time),
        ],
        prod: |_ts, args| -> Option<Time> { args[1].as_time().cloned() },
    }
}

/// "from 14:00 - 17:00", "von 8 bis 10".
pub(crate) fn rule_absorb_from_interval() -> RuleDef {
    rule! {
        name: "absorb from <interval>",
        pattern: [re!(r"\b(von|vom|from)\b"), dim!(Interval)],
        prod: |_ts, args| -> Option<Interval> { args[1].as_interval().cloned() },
    }
}

pub(crate) fn rules() -> Vec<RuleDef> {
    vec![rule_absorb_qualifier(), rule_absorb_from_interval()]
}
