use std::collections::HashMap;

use itertools::Itertools;

use crate::types::Transcript;

/// Post-hoc quality check on a generated summary.
///
/// Catches degenerate outputs: an empty summary, a summary longer than its
/// source, a verbatim excerpt of the transcript, or near-zero lexical
/// overlap with the source. A failed check is a quality signal, not an
/// error; the pipeline still returns the summary with `valid = false`.
#[derive(Debug, Clone)]
pub struct SummaryValidator {
    /// Minimum share of the transcript's top terms that must appear in the
    /// summary.
    overlap_threshold: f64,
    /// Summaries at least this long are checked for being verbatim copies.
    verbatim_len_threshold: usize,
}

const TOP_TERM_COUNT: usize = 15;
const MIN_TERM_LEN: usize = 5;

impl SummaryValidator {
    pub fn new(overlap_threshold: f64, verbatim_len_threshold: usize) -> Self {
        SummaryValidator {
            overlap_threshold,
            verbatim_len_threshold,
        }
    }

    /// Score `summary` against its source. Returns the verdict and, on
    /// failure, a human-readable note naming the failed check.
    #[tracing::instrument(skip_all)]
    pub fn check(&self, transcript: &Transcript, summary: &str) -> (bool, Option<String>) {
        let summary = summary.trim();
        if summary.is_empty() {
            return (false, Some("summary is empty".into()));
        }

        let summary_words = summary.split_whitespace().count();
        let transcript_words = transcript.word_count();
        if transcript_words > 0 && summary_words > transcript_words {
            return (
                false,
                Some(format!(
                    "summary ({summary_words} words) is longer than the source ({transcript_words} words)"
                )),
            );
        }

        if summary.len() >= self.verbatim_len_threshold && transcript.text.contains(summary) {
            return (
                false,
                Some("summary is a verbatim excerpt of the transcript".into()),
            );
        }

        let top_terms = top_terms(&transcript.text);
        if !top_terms.is_empty() {
            let summary_lower = summary.to_lowercase();
            let matched = top_terms
                .iter()
                .filter(|term| summary_lower.contains(term.as_str()))
                .count();
            let overlap = matched as f64 / top_terms.len() as f64;
            tracing::debug!(
                matched,
                total = top_terms.len(),
                overlap,
                "Computed lexical overlap"
            );
            if overlap < self.overlap_threshold {
                return (
                    false,
                    Some(format!(
                        "low lexical overlap with the source: {matched}/{} key terms present",
                        top_terms.len()
                    )),
                );
            }
        }

        (true, None)
    }
}

impl Default for SummaryValidator {
    fn default() -> Self {
        SummaryValidator::new(0.3, 200)
    }
}

/// Most frequent transcript terms longer than four characters. Ties are
/// broken lexicographically so repeated runs over the same input always
/// pick the same terms.
fn top_terms(text: &str) -> Vec<String> {
    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    let lowered = text.to_lowercase();
    for word in lowered
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() >= MIN_TERM_LEN)
    {
        *frequencies.entry(word).or_insert(0) += 1;
    }

    frequencies
        .into_iter()
        .sorted_by(|(word_a, count_a), (word_b, count_b)| {
            count_b.cmp(count_a).then_with(|| word_a.cmp(word_b))
        })
        .take(TOP_TERM_COUNT)
        .map(|(word, _)| word.to_string())
        .collect()
}
