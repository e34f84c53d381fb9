//! The labeled corpus and the training-data driver.
//!
//! Each entry pins a canonical resolution (`nb_str` form) for a set of
//! texts at a fixed reference time. The driver runs every text through the
//! engine with the null scorer and an unbounded beam, labels each produced
//! parse by whether it hits the target, and turns the rule-application
//! prefixes of every parse into training samples for the scorer: a parse
//! built by productions `r0 … rn` yields the samples `[r0], [r0 r1], …,
//! [r0 … rn]`, all labeled `1` when the final resolution was correct and
//! `-1` otherwise.

use std::fmt;

use chrono::NaiveDateTime;

use crate::api::{Options, Parse};
use crate::scorer::DummyScorer;

/// One labeled corpus entry: every text must resolve to `target` at the
/// given reference time.
#[derive(Debug, Clone, Copy)]
pub struct CorpusEntry {
    /// Canonical `nb_str` form of the expected resolution.
    pub target: &'static str,
    /// Reference time, `YYYY-MM-DDTHH:MM`.
    pub reference: &'static str,
    pub texts: &'static [&'static str],
}

/// Counters collected over a corpus run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorpusStats {
    /// Number of texts run.
    pub total_tests: usize,
    /// Parses whose resolution hit the target.
    pub pos_parses: usize,
    /// Parses whose resolution missed it.
    pub neg_parses: usize,
    /// Texts whose very first parse was already correct.
    pub pos_first_parses: usize,
    /// Texts where the best-scored parse was correct.
    pub pos_best_scored: usize,
}

/// Labeled training data produced by [`run_corpus`].
#[derive(Debug, Clone, Default)]
pub struct TrainingData {
    /// Token sequences: production-history prefixes.
    pub x: Vec<Vec<String>>,
    /// `1` for prefixes of correct parses, `-1` otherwise.
    pub y: Vec<i32>,
    pub stats: CorpusStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusError {
    /// A reference timestamp did not parse.
    Reference(String),
    /// Targets that were never produced for one of their texts.
    TargetsNotProduced(Vec<(String, String)>),
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusError::Reference(ts) => write!(f, "invalid corpus reference time {ts:?}"),
            CorpusError::TargetsNotProduced(failures) => {
                write!(f, "{} corpus targets never produced, first: ", failures.len())?;
                match failures.first() {
                    Some((target, text)) => write!(f, "{target:?} for {text:?}"),
                    None => write!(f, "none"),
                }
            }
        }
    }
}

impl std::error::Error for CorpusError {}

/// Run the labeled corpus and emit training data.
///
/// Uses the null scorer, no timeout and an unbounded beam, so every
/// derivable parse is generated. Fails if any text never produces its
/// target.
pub fn run_corpus(corpus: &[CorpusEntry]) -> Result<TrainingData, CorpusError> {
    let options = Options {
        timeout: 0.0,
        relative_match_len: 1.0,
        max_stack_depth: 0,
        latent_time: false,
    };
    let mut data = TrainingData::default();
    let mut failures: Vec<(String, String)> = Vec::new();

    for entry in corpus {
        let reference = NaiveDateTime::parse_from_str(entry.reference, "%Y-%m-%dT%H:%M")
            .map_err(|_| CorpusError::Reference(entry.reference.to_string()))?;
        let context = crate::api::Context { reference_time: reference };

        for text in entry.texts {
            data.stats.total_tests += 1;
            let mut one_parse_correct = false;
            let mut first = true;
            let mut best: Option<(f64, bool)> = None;

            for parse in
                crate::api::parse_stream_with_scorer(text, &context, &options, &DummyScorer)
            {
                let correct = parse.resolution.nb_str() == entry.target;
                push_prefix_samples(&mut data, &parse, correct);
                one_parse_correct |= correct;
                if correct {
                    data.stats.pos_parses += 1;
                    if first {
                        data.stats.pos_first_parses += 1;
                    }
                } else {
                    data.stats.neg_parses += 1;
                }
                first = false;
                if best.as_ref().is_none_or(|(score, _)| parse.score > *score) {
                    best = Some((parse.score, correct));
                }
            }

            if matches!(best, Some((_, true))) {
                data.stats.pos_best_scored += 1;
            }
            if !one_parse_correct {
                log::warn!("target {:?} never produced for {text:?}", entry.target);
                failures.push((entry.target.to_string(), text.to_string()));
            }
        }
    }

    log::info!(
        "ran {} corpus texts: {} positive, {} negative parses, {} first-correct, {} best-correct",
        data.stats.total_tests,
        data.stats.pos_parses,
        data.stats.neg_parses,
        data.stats.pos_first_parses,
        data.stats.pos_best_scored,
    );

    if failures.is_empty() { Ok(data) } else { Err(CorpusError::TargetsNotProduced(failures)) }
}

fn push_prefix_samples(data: &mut TrainingData, parse: &Parse, correct: bool) {
    let tokens: Vec<String> = parse.production.iter().map(|step| step.to_string()).collect();
    for end in 1..=tokens.len() {
        data.x.push(tokens[..end].to_vec());
        data.y.push(if correct { 1 } else { -1 });
    }
}

/// The built-in corpus.
pub fn corpus() -> &'static [CorpusEntry] {
    CORPUS
}

const CORPUS: &[CorpusEntry] = &[
    CorpusEntry {
        target: "Time[]{2019-X-X X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["2019"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-07 X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["heute", "today", "zu dieser zeit"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-07 12:43 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["jetzt", "genau jetzt", "just now", "right now"],
    },
    CorpusEntry {
        target: "Time[]{2019-01-01 X:X (X/X)}",
        reference: "2018-12-31T12:43",
        texts: &["morgen", "tomorrow"],
    },
    CorpusEntry {
        target: "Time[]{2019-01-02 X:X (X/X)}",
        reference: "2018-12-31T12:43",
        texts: &["übermorgen", "day after tomorrow"],
    },
    CorpusEntry {
        target: "Time[]{2019-01-01 19:25 (X/X)}",
        reference: "2018-12-31T12:43",
        texts: &["morgen 19:25", "tomorrow 7.25 pm"],
    },
    // leap-year stepping
    CorpusEntry {
        target: "Time[]{2020-02-29 X:X (X/X)}",
        reference: "2020-03-01T12:43",
        texts: &["gestern", "yesterday"],
    },
    CorpusEntry {
        target: "Time[]{2020-02-28 X:X (X/X)}",
        reference: "2020-03-01T12:43",
        texts: &["vorgestern", "day before yesterday"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-31 X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["ende des monats", "end of the month", "eom"],
    },
    CorpusEntry {
        target: "Time[]{2018-12-31 X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["ende des jahres", "end of the year", "eoy"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-12 X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["Montag", "mondays", "Mo."],
    },
    CorpusEntry {
        target: "Time[]{2018-03-13 X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["Dienstag", "tuesday", "tue"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-12 X:X (X/morning)}",
        reference: "2018-03-07T12:43",
        texts: &["Montagmorgen"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-11 X:X (X/night)}",
        reference: "2018-03-07T12:43",
        texts: &["sunday night", "Sonntagnacht"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-10 X:X (X/morning)}",
        reference: "2018-03-07T12:43",
        texts: &["Samstagfrüh"],
    },
    CorpusEntry {
        target: "Time[]{X-01-X X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["Januar", "Jan."],
    },
    CorpusEntry {
        target: "Time[]{X-07-X X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["Juli", "July", "Jul."],
    },
    CorpusEntry {
        target: "Time[]{X-12-X X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["Dezember", "December", "Dec."],
    },
    // "am"/"on" grounds the weekday, same-day hits move a week out
    CorpusEntry {
        target: "Time[]{2018-03-13 X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["am Dienstag", "on Tue"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-14 X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["this Wednesday", "diesen Mittwoch"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-16 X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["next Friday", "am nächsten Freitag", "on the following Friday"],
    },
    CorpusEntry {
        target: "Time[]{2018-05-08 X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &[
            "8.5.2018",
            "2018-05-08",
            "8. Mai 2018",
            "8. Mai 18",
            "8.5.",
            "am 8. Mai 2018",
            "den 8.5.",
            "8th May",
            "8th of May",
            "May 8th",
            "may 8",
            "this May 8th",
            "Tuesday 8th",
            "Tuesday the 8th",
            "Dienstag 8.5.2018",
        ],
    },
    CorpusEntry {
        target: "Time[]{2018-11-X X:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["November 2018", "Nov. 2018"],
    },
    CorpusEntry {
        target: "Time[]{X-X-X 20:00 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["8:00 pm", "20:00", "8 pm", "abends 8", "8 in the evening"],
    },
    CorpusEntry {
        target: "Time[]{X-X-X 14:30 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["14:30", "1430", "2:30 pm"],
    },
    CorpusEntry {
        target: "Time[]{X-X-X 14:X (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["14 Uhr", "14h"],
    },
    CorpusEntry {
        target: "Time[]{X-X-X 07:45 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["quarter to eight", "viertel vor acht"],
    },
    CorpusEntry {
        target: "Time[]{X-X-X 08:15 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["quarter past eight", "viertel nach acht"],
    },
    CorpusEntry {
        target: "Time[]{X-X-X 02:30 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["halb drei", "half past two"],
    },
    // the morning of the reference day is over at 12:43
    CorpusEntry {
        target: "Time[]{2018-03-08 X:X (X/morning)}",
        reference: "2018-03-07T12:43",
        texts: &["morgens", "in the morning", "morning"],
    },
    CorpusEntry {
        target: "Time[]{2018-03-07 X:X (X/evening)}",
        reference: "2018-03-07T12:43",
        texts: &["abends", "evening", "tonight"],
    },
    CorpusEntry {
        target: "Interval[]{X-X-X 17:00 (X/X) - None}",
        reference: "2018-03-07T12:43",
        texts: &["nach 17:00", "ab 17:00", "after 5 pm"],
    },
    CorpusEntry {
        target: "Interval[]{None - X-X-X 09:00 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["vor 9:00", "before 9:00", "before 9 am"],
    },
    CorpusEntry {
        target: "Interval[]{X-X-X 14:00 (X/X) - X-X-X 17:00 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["14:00 - 17:00", "von 14:00 bis 17:00", "2 pm until 5 pm"],
    },
    CorpusEntry {
        target: "Interval[]{2018-05-08 14:00 (X/X) - 2018-05-08 16:00 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["8.5.2018 14:00 - 16:00"],
    },
    // overnight pair wraps onto the next day once the date is attached
    CorpusEntry {
        target: "Interval[]{2018-11-13 23:30 (X/X) - 2018-11-14 03:35 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["Mon, Nov 13 11:30 PM - 3:35 AM"],
    },
    CorpusEntry {
        target: "Time[]{2018-05-08 12:30 (X/X)}",
        reference: "2018-03-07T12:43",
        texts: &["8.5.2018 12:30"],
    },
    CorpusEntry {
        target: "Time[]{2018-05-08 X:X (X/morning)}",
        reference: "2018-03-07T12:43",
        texts: &["8.5.2018 morgens", "8. Mai 2018 morgens"],
    },
    CorpusEntry {
        target: "Duration[]{3 nights}",
        reference: "2018-03-07T12:43",
        texts: &["3 nights", "3 Nächte"],
    },
    CorpusEntry {
        target: "Duration[]{2 weeks}",
        reference: "2018-03-07T12:43",
        texts: &["2 weeks", "zwei Wochen"],
    },
    CorpusEntry {
        target: "Interval[]{2020-11-15 X:X (X/X) - 2020-11-18 X:X (X/X)}",
        reference: "2020-02-25T07:00",
        texts: &["15-18 Nov for 3 nights", "15 - 18 Nov für 3 Nächte", "15. Nov für 3 Nächte"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_runs_clean_and_yields_training_data() {
        let data = run_corpus(corpus()).unwrap();
        assert_eq!(data.x.len(), data.y.len());
        assert!(data.stats.pos_parses >= data.stats.total_tests);
        assert!(data.stats.neg_parses > 0, "noise candidates are expected");
        assert!(data.y.iter().any(|&label| label == 1));
        assert!(data.y.iter().any(|&label| label == -1));
        // prefixes of length one exist for every parse
        assert!(data.x.iter().any(|sample| sample.len() == 1));
    }

    #[test]
    fn training_on_the_corpus_produces_a_usable_model() {
        let data = run_corpus(corpus()).unwrap();
        let model = crate::learn::train_naive_bayes(&data.x, &data.y);
        let scorer = crate::learn::NaiveBayesScorer::new(model);

        // a trained scorer must rank the known-good reading of a corpus
        // text at the top
        let context = crate::api::Context {
            reference_time: chrono::NaiveDate::from_ymd_opt(2018, 3, 7)
                .unwrap()
                .and_hms_opt(12, 43, 0)
                .unwrap(),
        };
        let options = Options { latent_time: false, ..Options::default() };
        let best = crate::api::parse_with_scorer("8.5.2018", &context, &options, &scorer).unwrap();
        assert_eq!(best.resolution.nb_str(), "Time[]{2018-05-08 X:X (X/X)}");
    }

    #[test]
    fn a_missing_target_fails_the_run() {
        let broken = [CorpusEntry {
            target: "Time[]{1999-01-01 X:X (X/X)}",
            reference: "2018-03-07T12:43",
            texts: &["tomorrow"],
        }];
        match run_corpus(&broken) {
            Err(CorpusError::TargetsNotProduced(failures)) => assert_eq!(failures.len(), 1),
            other => panic!("expected a failed run, got {other:?}"),
        }
    }

    #[test]
    fn bad_reference_time_is_reported() {
        let broken = [CorpusEntry {
            target: "Time[]{2018-03-07 X:X (X/X)}",
            reference: "07.03.2018",
            texts: &["heute"],
        }];
        match run_corpus(&broken) {
            Err(CorpusError::Reference(ts)) => assert_eq!(ts, "07.03.2018"),
            other => panic!("expected a reference error, got {:?}", other.map(|d| d.stats)),
        }
    }
}
