use crate::error::Result;
use crate::prompt::PromptRequest;

pub const DONT_KNOW: &str =
    "I don't know based on the available FAQ. Please contact support for help.";

/// Turns a built prompt into answer text. Hosted model clients live outside
/// this crate and plug in here.
pub trait TextGenerator {
    fn generate(&self, prompt: &PromptRequest) -> Result<String>;
}

/// Offline generator: answers with the best retrieved FAQ answer verbatim.
#[derive(Debug, Clone, Default)]
pub struct ExtractiveGenerator;

impl TextGenerator for ExtractiveGenerator {
    fn generate(&self, prompt: &PromptRequest) -> Result<String> {
        let answer = prompt
            .sources
            .iter()
            .map(|s| s.answer.trim())
            .find(|a| !a.is_empty())
            .unwrap_or(DONT_KNOW);
        Ok(answer.to_string())
    }
}
