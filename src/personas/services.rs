use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::llm::{prompts, LanguageModel, LlmError};

pub const NEED_MORE_TIME: &str =
    "I need more time to think about that. Could you ask me something else?";

const ENGLISH_ONLY: &str =
    "I provide legal advice in English only. Please consult a licensed Myanmar attorney.";
const TOO_SHORT: &str = "Based on Myanmar law, I recommend consulting a licensed attorney for proper legal advice regarding your specific situation.";
const MIN_WORDS: usize = 3;

lazy_static! {
    static ref MYANMAR_SCRIPT: Regex = Regex::new(r"[\u{1000}-\u{109F}]").unwrap();
}

/// Renders `template` around the user's text and asks the model.
pub async fn ask(llm: &dyn LanguageModel, template: &str, text: &str) -> Result<String, LlmError> {
    let prompt = prompts::render_text(template, text)?;
    let reply = llm.generate(&prompt).await?;
    Ok(reply.trim().to_string())
}

/// Gate for the English-only lawyer line: any Myanmar or other non-ASCII
/// script is refused, and near-empty answers get a standard referral.
pub fn enforce_english(reply: &str) -> String {
    let reply = reply.trim();
    if reply.is_empty() {
        return "Please describe your legal issue in English.".to_string();
    }
    if MYANMAR_SCRIPT.is_match(reply) {
        warn!("myanmar script in english-only reply");
        return ENGLISH_ONLY.to_string();
    }
    if !reply.is_ascii() {
        warn!("non-ascii characters in english-only reply");
        return ENGLISH_ONLY.to_string();
    }
    if reply.split_whitespace().count() < MIN_WORDS {
        return TOO_SHORT.to_string();
    }
    reply.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fakes::{EchoModel, FailingModel};

    #[test]
    fn english_gate() {
        assert_eq!(
            enforce_english("You may file a claim under the Contract Act."),
            "You may file a claim under the Contract Act."
        );
        assert_eq!(enforce_english("မင်္ဂလာပါ sir"), ENGLISH_ONLY);
        assert_eq!(enforce_english("Café rules apply here"), ENGLISH_ONLY);
        assert_eq!(enforce_english("Yes."), TOO_SHORT);
        assert!(enforce_english("  ").contains("in English"));
    }

    #[tokio::test]
    async fn ask_renders_prompt_and_propagates_errors() {
        let reply = ask(&EchoModel, prompts::DOCTOR_CALL, "I have a cough").await.unwrap();
        assert!(reply.contains("User said: \"I have a cough\""));
        assert!(ask(&FailingModel, prompts::DOCTOR_CALL, "x").await.is_err());
    }
}
