use crate::corpus::FaqCorpus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_REQUIRED_PASS_RATE: f64 = 0.85;

/// A labelled question. `expected_question: None` means no entry should
/// match at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub question: String,
    #[serde(default)]
    pub expected_question: Option<String>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    /// 1-based position of the expected entry within the top-k.
    pub rank: Option<usize>,
    pub top_question: Option<String>,
    pub top_score: f64,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub evaluated_at: DateTime<Utc>,
    pub k: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub outcomes: Vec<EvalOutcome>,
}

impl EvalSummary {
    pub fn meets(&self, required_pass_rate: f64) -> bool {
        self.pass_rate >= required_pass_rate
    }
}

pub fn evaluate_cases(corpus: &FaqCorpus, cases: &[EvalCase], k: usize) -> EvalSummary {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let start = Instant::now();
        let ranked = corpus.top_k(&case.question, k);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let top_score = ranked.first().map(|m| m.score).unwrap_or(0.0);
        let rank = case.expected_question.as_deref().and_then(|expected| {
            ranked
                .iter()
                .position(|m| m.entry.question() == expected)
                .map(|idx| idx + 1)
        });

        let found = match &case.expected_question {
            Some(_) => rank.is_some(),
            None => top_score == 0.0,
        };
        let score_ok = case.min_score.map_or(true, |min| top_score >= min);

        outcomes.push(EvalOutcome {
            case_id: case.case_id.clone(),
            passed: found && score_ok,
            rank,
            top_question: ranked.first().map(|m| m.entry.question().to_string()),
            top_score,
            latency_ms,
        });
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    };

    EvalSummary {
        evaluated_at: Utc::now(),
        k,
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    }
}
