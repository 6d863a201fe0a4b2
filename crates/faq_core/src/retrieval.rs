use serde::{Deserialize, Serialize};

use crate::model::FaqEntry;
use crate::tokenize::{normalize, TokenSet};

pub const QUESTION_WEIGHT: f64 = 0.7;
pub const ANSWER_WEIGHT: f64 = 0.2;
pub const SUBSTRING_BONUS: f64 = 0.1;
pub const DEFAULT_TOP_K: usize = 5;

/// Weights of the lexical score. The default reproduces the hand-tuned
/// 0.7 / 0.2 / 0.1 mix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub question: f64,
    pub answer: f64,
    pub substring_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            question: QUESTION_WEIGHT,
            answer: ANSWER_WEIGHT,
            substring_bonus: SUBSTRING_BONUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub jaccard_question: f64,
    pub jaccard_answer: f64,
    pub substring_bonus: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch<'a> {
    pub entry: &'a FaqEntry,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Intersection over union, with the union floored at 1 so two empty sets
/// score 0.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let overlap = a.intersection(b).count();
    let union = a.len() + b.len() - overlap;
    overlap as f64 / union.max(1) as f64
}

/// True when some query token occurs inside some question token.
pub fn has_substring_match(query_tokens: &TokenSet, question_tokens: &TokenSet) -> bool {
    query_tokens
        .iter()
        .any(|q| question_tokens.iter().any(|t| t.contains(q.as_str())))
}

pub fn score_breakdown_with(
    weights: &ScoringWeights,
    query_tokens: &TokenSet,
    entry: &FaqEntry,
) -> ScoreBreakdown {
    let jaccard_question = jaccard(query_tokens, entry.question_tokens());
    let jaccard_answer = jaccard(query_tokens, entry.answer_tokens());
    let substring_bonus = if has_substring_match(query_tokens, entry.question_tokens()) {
        weights.substring_bonus
    } else {
        0.0
    };

    ScoreBreakdown {
        jaccard_question,
        jaccard_answer,
        substring_bonus,
        total: weights.question * jaccard_question
            + weights.answer * jaccard_answer
            + substring_bonus,
    }
}

pub fn score(query_tokens: &TokenSet, entry: &FaqEntry) -> f64 {
    score_breakdown_with(&ScoringWeights::default(), query_tokens, entry).total
}

/// Scores every entry and orders them by descending score. The sort is
/// stable, so ties keep corpus order.
pub fn rank_with<'a>(
    weights: &ScoringWeights,
    entries: &'a [FaqEntry],
    question: &str,
) -> Vec<ScoredMatch<'a>> {
    let query_tokens = normalize(question);
    let mut scored: Vec<ScoredMatch<'a>> = entries
        .iter()
        .map(|entry| {
            let breakdown = score_breakdown_with(weights, &query_tokens, entry);
            ScoredMatch {
                entry,
                score: breakdown.total,
                breakdown,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

pub fn rank<'a>(entries: &'a [FaqEntry], question: &str) -> Vec<ScoredMatch<'a>> {
    rank_with(&ScoringWeights::default(), entries, question)
}

pub fn top_k<'a>(entries: &'a [FaqEntry], question: &str, k: usize) -> Vec<ScoredMatch<'a>> {
    let mut ranked = rank(entries, question);
    ranked.truncate(k);
    ranked
}

pub fn retrieve<'a>(entries: &'a [FaqEntry], question: &str, k: usize) -> Vec<&'a FaqEntry> {
    top_k(entries, question, k)
        .into_iter()
        .map(|m| m.entry)
        .collect()
}

pub fn top_match<'a>(entries: &'a [FaqEntry], question: &str) -> Option<ScoredMatch<'a>> {
    top_k(entries, question, 1).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<FaqEntry> {
        vec![
            FaqEntry::new("What is your refund policy?", "Refunds within 30 days."),
            FaqEntry::new(
                "How do I reset my password?",
                "Use the reset link on login page.",
            ),
        ]
    }

    fn questions(entries: &[&FaqEntry]) -> Vec<String> {
        entries.iter().map(|e| e.question().to_string()).collect()
    }

    #[test]
    fn jaccard_handles_empty_sets() {
        let empty = TokenSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&normalize("a b"), &empty), 0.0);
        assert!((jaccard(&normalize("a b"), &normalize("b c")) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn substring_bonus_uses_containment() {
        let question = normalize("Where are the passwords stored?");
        assert!(has_substring_match(&normalize("password"), &question));
        assert!(!has_substring_match(&normalize("passwords please"), &normalize("pass")));
        assert!(!has_substring_match(&TokenSet::new(), &question));
    }

    #[test]
    fn refund_query_picks_refund_entry() {
        let entries = corpus();
        let top = retrieve(&entries, "refund policy", 1);
        assert_eq!(questions(&top), vec!["What is your refund policy?"]);

        let m = top_match(&entries, "refund policy").expect("match");
        assert!((m.breakdown.jaccard_question - 0.4).abs() < 1e-12);
        // "refund" vs "refunds" is a token mismatch, so the answer adds nothing.
        assert_eq!(m.breakdown.jaccard_answer, 0.0);
        // "refund" is contained in the question token "refund".
        assert_eq!(m.breakdown.substring_bonus, SUBSTRING_BONUS);
        assert!((m.score - 0.38).abs() < 1e-9);
    }

    #[test]
    fn score_combines_weighted_jaccards_and_bonus() {
        let entry = FaqEntry::new("alpha beta", "beta gamma delta");
        let q = normalize("beta zeta");
        let with_bonus = 0.7 * (1.0 / 3.0) + 0.2 * (1.0 / 4.0) + 0.1;
        assert!((score(&q, &entry) - with_bonus).abs() < 1e-12);

        let q = normalize("gamma zeta");
        let expected = 0.2 * (1.0 / 4.0);
        assert!((score(&q, &entry) - expected).abs() < 1e-12);
    }

    #[test]
    fn custom_weights_change_the_mix() {
        let entry = FaqEntry::new("alpha", "beta");
        let weights = ScoringWeights {
            question: 0.0,
            answer: 1.0,
            substring_bonus: 0.0,
        };
        let b = score_breakdown_with(&weights, &normalize("beta"), &entry);
        assert_eq!(b.total, 1.0);
    }

    #[test]
    fn empty_query_keeps_corpus_order() {
        let entries = corpus();
        for q in ["", "?!?"] {
            let ranked = rank(&entries, q);
            assert!(ranked.iter().all(|m| m.score == 0.0));
            let got: Vec<&FaqEntry> = ranked.iter().map(|m| m.entry).collect();
            assert_eq!(
                questions(&got),
                vec!["What is your refund policy?", "How do I reset my password?"]
            );
        }
    }

    #[test]
    fn empty_corpus_yields_nothing() {
        assert!(retrieve(&[], "anything", 5).is_empty());
        assert!(retrieve(&[], "anything", 0).is_empty());
        assert!(top_match(&[], "anything").is_none());
    }

    #[test]
    fn result_length_is_min_of_k_and_corpus() {
        let entries = corpus();
        for k in 0..5 {
            assert_eq!(retrieve(&entries, "password", k).len(), k.min(entries.len()));
        }
    }

    #[test]
    fn scores_are_non_increasing_and_ties_stable() {
        let entries = vec![
            FaqEntry::new("shipping times", "we ship daily"),
            FaqEntry::new("reset password", "click reset"),
            FaqEntry::new("shipping costs", "free over 50"),
            FaqEntry::new("password rules", "eight characters"),
            FaqEntry::new("shipping times", "we ship daily"),
        ];
        let ranked = rank(&entries, "shipping");
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }

        let positions: Vec<usize> = ranked
            .iter()
            .map(|m| {
                entries
                    .iter()
                    .position(|e| std::ptr::eq(e, m.entry))
                    .expect("entry from corpus")
            })
            .collect();
        for pair in ranked.windows(2).zip(positions.windows(2)) {
            let (m, p) = pair;
            if m[0].score == m[1].score {
                assert!(p[0] < p[1], "ties must keep corpus order");
            }
        }
    }

    #[test]
    fn duplicates_both_survive_in_order() {
        let entries = vec![
            FaqEntry::new("Opening hours?", "9 to 5."),
            FaqEntry::new("Where is the office?", "Main street."),
            FaqEntry::new("Opening hours?", "9 to 5."),
        ];
        let top = top_k(&entries, "opening hours", 2);
        assert_eq!(top.len(), 2);
        assert!(std::ptr::eq(top[0].entry, &entries[0]));
        assert!(std::ptr::eq(top[1].entry, &entries[2]));
    }

    #[test]
    fn retrieve_does_not_mutate_corpus() {
        let entries = corpus();
        let before = entries.clone();
        let _ = retrieve(&entries, "reset", 1);
        assert_eq!(entries, before);
    }
}
