use std::collections::HashMap;

use itertools::Itertools;

/// Offline extractive summarization engine.
///
/// Splits the transcript into sentences, scores each sentence by the
/// frequency of its content words, and re-emits the highest scoring
/// sentences in reading order until the word budget is spent. Pure CPU
/// work with no I/O; callers run it on a blocking thread. Output is a
/// deterministic function of (text, max_words).
#[derive(Debug, Clone, Default)]
pub struct ExtractiveEngine;

/// Function words excluded from frequency scoring.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have",
    "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "like", "more",
    "most", "not", "of", "on", "one", "or", "our", "out", "over", "she", "so", "some", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "to", "up", "was",
    "we", "were", "what", "when", "which", "who", "will", "with", "would", "you", "your",
];

impl ExtractiveEngine {
    pub fn summarize(&self, text: &str, max_words: usize) -> String {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return String::new();
        }

        let frequencies = content_word_frequencies(text);

        // Score sentences, keeping the original position for both stable
        // tie-breaking and reading-order output.
        let scored = sentences
            .iter()
            .enumerate()
            .map(|(position, sentence)| (position, sentence_score(sentence, &frequencies)))
            .sorted_by(|(pos_a, score_a), (pos_b, score_b)| {
                score_b
                    .partial_cmp(score_a)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| pos_a.cmp(pos_b))
            })
            .collect::<Vec<_>>();

        let mut selected = Vec::new();
        let mut budget = max_words;
        for (position, _) in scored {
            let words = sentences[position].split_whitespace().count();
            if words > budget && !selected.is_empty() {
                continue;
            }
            selected.push(position);
            budget = budget.saturating_sub(words);
            if budget == 0 {
                break;
            }
        }

        let summary = selected
            .into_iter()
            .sorted()
            .map(|position| sentences[position].as_str())
            .join(" ");

        crate::model::truncate_words(&summary, max_words)
    }
}

fn split_sentences(text: &str) -> Vec<String> {
    text.split_inclusive(['.', '!', '?'])
        .map(|s| s.trim().to_string())
        .filter(|s| s.split_whitespace().count() >= 3)
        .collect()
}

fn content_word_frequencies(text: &str) -> HashMap<String, f64> {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for word in text
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty() && !STOPWORDS.contains(&w.as_str()))
    {
        *counts.entry(word).or_insert(0.0) += 1.0;
    }

    let max = counts.values().cloned().fold(0.0_f64, f64::max);
    if max > 0.0 {
        for value in counts.values_mut() {
            *value /= max;
        }
    }
    counts
}

fn sentence_score(sentence: &str, frequencies: &HashMap<String, f64>) -> f64 {
    let words: Vec<String> = sentence
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return 0.0;
    }
    let total: f64 = words
        .iter()
        .map(|w| frequencies.get(w).copied().unwrap_or(0.0))
        .sum();
    // Normalize by length so long rambling sentences do not dominate.
    total / words.len() as f64
}

fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}
