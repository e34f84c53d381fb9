//! Maximal contiguous match sequences, the seeds of the search.
//!
//! Two matches are contiguous when they do not overlap and nothing but
//! whitespace sits between them. The builder enumerates every maximal chain
//! of contiguous matches:
//!
//! - Seed the stack with every single match that no earlier match is
//!   contiguous with. Chains starting at any other match are suffixes of
//!   chains produced from these seeds, so seeding them too would only
//!   enumerate duplicates.
//! - Pop a chain, extend it by every match contiguous with its last element;
//!   a chain with no extension is a terminal sequence.
//!
//! Worst case this is exponential in the number of matches; the sentinel is
//! checked on every turn so a runaway input is cut off by the parse budget.

use crate::artifact::RegexMatch;

use super::timing::{Sentinel, TimeoutError};

pub(crate) fn regex_stack(
    txt: &str,
    matches: &[RegexMatch],
    sentinel: &Sentinel,
) -> Result<Vec<Vec<usize>>, TimeoutError> {
    let n = matches.len();

    // follows[j][i]: match j strictly follows match i with a pure-whitespace
    // gap. Only j > i entries are ever set.
    let mut follows = vec![vec![false; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            follows[j][i] = contiguous(txt, &matches[i], &matches[j]);
        }
    }

    let mut sequences = Vec::new();
    let mut stack: Vec<Vec<usize>> = (0..n)
        .rev()
        .filter(|&i| follows[i].iter().all(|&f| !f))
        .map(|i| vec![i])
        .collect();

    while let Some(seq) = stack.pop() {
        sentinel.check()?;
        let last = *seq.last().expect("chains are never empty");
        let mut extended = false;
        for j in (last + 1)..n {
            if follows[j][last] {
                let mut longer = seq.clone();
                longer.push(j);
                stack.push(longer);
                extended = true;
            }
        }
        if !extended {
            sequences.push(seq);
        }
    }
    Ok(sequences)
}

fn contiguous(txt: &str, first: &RegexMatch, second: &RegexMatch) -> bool {
    if second.span.mstart < first.span.mend {
        return false;
    }
    txt[first.span.mend..second.span.mstart].chars().all(char::is_whitespace)
}
