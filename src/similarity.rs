// src/similarity.rs
//! Title tokenization and Jaccard similarity for near-duplicate detection.
//!
//! Titles are lowercased, stripped of punctuation, split on whitespace, and
//! filtered against a fixed English stopword list before comparison. Two
//! titles whose token sets overlap heavily are likely reporting the same
//! story even when the wording differs.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Common English stopwords excluded from title comparison.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "s", "t",
    ]
    .into_iter()
    .collect()
});

/// Tokenize a title for comparison: lowercase, drop punctuation, split on
/// whitespace, remove stopwords. Total on any input; empty or
/// punctuation-only titles yield the empty set.
pub fn title_tokens(title: &str) -> HashSet<String> {
    let mut cleaned = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_punctuation() {
            continue;
        }
        for lower in ch.to_lowercase() {
            cleaned.push(lower);
        }
    }

    cleaned
        .split_whitespace()
        .filter(|tok| !STOPWORDS.contains(tok))
        .map(|tok| tok.to_string())
        .collect()
}

/// Jaccard similarity between two token sets: |A ∩ B| / |A ∪ B|.
/// Defined as 0.0 when either set is empty.
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Similarity between two raw titles, in [0.0, 1.0]. Symmetric.
pub fn title_similarity(title_a: &str, title_b: &str) -> f64 {
    jaccard_similarity(&title_tokens(title_a), &title_tokens(title_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_lowercased_and_depunctuated() {
        let toks = title_tokens("What's Happening? Big News!");
        assert!(toks.contains("whats"));
        assert!(toks.contains("happening"));
        assert!(toks.contains("big"));
        assert!(toks.contains("news"));
    }

    #[test]
    fn stopwords_are_removed() {
        let toks = title_tokens("The cat is on the mat");
        assert!(!toks.contains("the"));
        assert!(!toks.contains("is"));
        assert!(!toks.contains("on"));
        assert!(toks.contains("cat"));
        assert!(toks.contains("mat"));
    }

    #[test]
    fn empty_and_punctuation_only_titles_yield_empty_sets() {
        assert!(title_tokens("").is_empty());
        assert!(title_tokens("?!... --- !!!").is_empty());
    }

    #[test]
    fn identical_titles_score_one() {
        let sim = title_similarity("Fed raises interest rates", "Fed raises interest rates");
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_titles_score_zero() {
        let sim = title_similarity("Cat stuck in tree", "Markets rally on rate cut");
        assert!(sim.abs() < 1e-9);
    }

    #[test]
    fn empty_normalized_title_never_matches() {
        // "the" reduces to nothing; even against itself the score is 0.
        assert_eq!(title_similarity("the", "the"), 0.0);
        assert_eq!(title_similarity("", "Fed raises rates"), 0.0);
    }

    #[test]
    fn similarity_is_symmetric_and_bounded() {
        let pairs = [
            ("Fed raises interest rates", "Federal Reserve hikes rates"),
            ("Markets rally", "Global markets rally on rate cut hopes"),
            ("", "anything"),
        ];
        for (a, b) in pairs {
            let ab = title_similarity(a, b);
            let ba = title_similarity(b, a);
            assert!((ab - ba).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&ab));
        }
    }

    #[test]
    fn overlapping_titles_score_between_zero_and_one() {
        let sim = title_similarity("Fed raises interest rates", "Fed cuts interest rates");
        assert!(sim > 0.0 && sim < 1.0);
    }
}
