use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::config::ServiceConfig;
use crate::corpus::{CorpusCache, CorpusLoader, FaqCorpus};
use crate::error::Result;
use crate::generate::TextGenerator;
use crate::model::FaqRecord;
use crate::prompt::build_prompt;

pub const SERVICE_NAME: &str = "faq-bot";

/// Proxy-style HTTP event. Only the fields the bot routes on are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

impl ApiEvent {
    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            http_method: "POST".to_string(),
            path: path.into(),
            body: Some(body.into()),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self {
            http_method: "GET".to_string(),
            path: path.into(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn json(status_code: u16, body: &Value) -> Self {
        let headers = [
            ("content-type", "application/json"),
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Headers", "Content-Type,Authorization"),
            ("Access-Control-Allow-Methods", "OPTIONS,POST,GET"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    fn error(status_code: u16, message: &str) -> Self {
        Self::json(status_code, &json!({ "error": message }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<FaqRecord>,
}

/// Request-handling context. Owns the corpus cache, so the corpus is loaded
/// on the first question and reused for the lifetime of the service.
pub struct FaqService<L, G> {
    config: ServiceConfig,
    loader: L,
    generator: G,
    cache: CorpusCache,
}

impl<L, G> FaqService<L, G>
where
    L: CorpusLoader,
    G: TextGenerator,
{
    pub fn new(config: ServiceConfig, loader: L, generator: G) -> Self {
        Self {
            config,
            loader,
            generator,
            cache: CorpusCache::new(),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn corpus(&self) -> Result<&FaqCorpus> {
        self.cache.get_or_load(&self.loader)
    }

    /// Retrieves the top-K entries for `question`, asks the generator, and
    /// returns the answer with its sources.
    pub fn ask(&self, question: &str) -> Result<AskResponse> {
        let corpus = self.corpus()?;
        let top = corpus.retrieve(question, self.config.top_k);
        debug!(question, retrieved = top.len(), "retrieved FAQ context");

        let prompt = build_prompt(question, &top, &self.config.generation);
        let answer = self.generator.generate(&prompt)?;

        Ok(AskResponse {
            answer,
            sources: prompt.sources,
        })
    }

    pub fn handle(&self, event: &ApiEvent) -> ApiResponse {
        let method = event.http_method.as_str();
        let path = event.path.as_str();
        debug!(method, path, "handling request");

        match method {
            "OPTIONS" => ApiResponse::json(200, &json!({ "ok": true })),
            "GET" if path.ends_with("/health") => {
                ApiResponse::json(200, &json!({ "ok": true, "service": SERVICE_NAME }))
            }
            "POST" => {
                let body = event.body.as_deref().filter(|b| !b.is_empty());
                self.handle_post(body.unwrap_or("{}"))
            }
            _ => ApiResponse::error(404, "Not found"),
        }
    }

    fn handle_post(&self, body: &str) -> ApiResponse {
        let data: Value = match serde_json::from_str(body) {
            Ok(data) => data,
            Err(err) => {
                warn!(%err, "rejecting request body");
                return ApiResponse::error(400, "Invalid JSON");
            }
        };

        let question = data
            .get("question")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if question.is_empty() {
            return ApiResponse::error(400, "Missing 'question' in body");
        }

        match self.ask(question) {
            Ok(resp) => ApiResponse::json(200, &json!(resp)),
            Err(err) => {
                error!(%err, "failed to answer question");
                ApiResponse::error(500, &err.to_string())
            }
        }
    }
}
