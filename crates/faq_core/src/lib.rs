pub mod config;
pub mod corpus;
pub mod error;
pub mod eval;
pub mod generate;
pub mod handler;
pub mod model;
pub mod prompt;
pub mod retrieval;
pub mod storage;
pub mod tokenize;

pub use config::{
    ConfigError, GenerationConfig, ServiceConfig, DEFAULT_FAQ_PATH, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL_ID, DEFAULT_TEMPERATURE,
};
pub use corpus::{CorpusCache, CorpusLoader, FaqCorpus, FileLoader, StaticLoader};
pub use error::{FaqError, Result};
pub use eval::{evaluate_cases, EvalCase, EvalOutcome, EvalSummary, DEFAULT_REQUIRED_PASS_RATE};
pub use generate::{ExtractiveGenerator, TextGenerator};
pub use handler::{ApiEvent, ApiResponse, AskResponse, FaqService};
pub use model::{FaqEntry, FaqRecord};
pub use prompt::{build_prompt, extract_answer, PromptRequest};
pub use retrieval::{
    jaccard, rank, rank_with, retrieve, score, score_breakdown_with, top_k, top_match,
    ScoreBreakdown, ScoredMatch, ScoringWeights, ANSWER_WEIGHT, DEFAULT_TOP_K, QUESTION_WEIGHT,
    SUBSTRING_BONUS,
};
pub use storage::{load_faq_file, load_faq_json, load_faq_jsonl, parse_faq_json, save_faq_jsonl};
pub use tokenize::{normalize, TokenSet};
