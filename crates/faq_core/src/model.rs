use serde::{Deserialize, Deserializer, Serialize};

use crate::tokenize::{normalize, TokenSet};

/// Raw FAQ item as stored in the corpus document. Absent or `null` fields
/// load as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub answer: String,
}

impl FaqRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<String> = Option::deserialize(deserializer)?;
    Ok(val.unwrap_or_default())
}

/// A FAQ item with its token sets precomputed. Text is only settable through
/// the constructor, so the token sets always match it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FaqRecord", into = "FaqRecord")]
pub struct FaqEntry {
    question: String,
    answer: String,
    question_tokens: TokenSet,
    answer_tokens: TokenSet,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let question = question.into();
        let answer = answer.into();
        Self {
            question_tokens: normalize(&question),
            answer_tokens: normalize(&answer),
            question,
            answer,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn question_tokens(&self) -> &TokenSet {
        &self.question_tokens
    }

    pub fn answer_tokens(&self) -> &TokenSet {
        &self.answer_tokens
    }

    pub fn to_record(&self) -> FaqRecord {
        FaqRecord::new(self.question.clone(), self.answer.clone())
    }
}

impl From<FaqRecord> for FaqEntry {
    fn from(record: FaqRecord) -> Self {
        FaqEntry::new(record.question, record.answer)
    }
}

impl From<FaqEntry> for FaqRecord {
    fn from(entry: FaqEntry) -> Self {
        FaqRecord {
            question: entry.question,
            answer: entry.answer,
        }
    }
}
