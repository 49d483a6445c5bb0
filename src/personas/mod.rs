//! Role-played personas and their HTTP surface.

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::{llm::prompts, state::AppState};

mod dto;
pub mod handlers;
pub mod profile;
pub mod services;

pub use profile::CallProfile;

/// A fixed system-prompt identity. `character` is the tag stored with each chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    English,
    Doctor,
    Lawyer,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::English, Persona::Doctor, Persona::Lawyer];

    /// URL segment.
    pub fn slug(self) -> &'static str {
        match self {
            Persona::English => "english",
            Persona::Doctor => "doctor",
            Persona::Lawyer => "lawyer",
        }
    }

    pub fn character(self) -> &'static str {
        match self {
            Persona::English => "english_teacher",
            Persona::Doctor => "doctor",
            Persona::Lawyer => "lawyer",
        }
    }

    pub fn from_character(character: &str) -> Option<Persona> {
        Persona::ALL.into_iter().find(|p| p.character() == character)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Persona::English => "English Tutor",
            Persona::Doctor => "Medical Doctor",
            Persona::Lawyer => "Legal Advisor",
        }
    }

    pub fn chat_prompt(self) -> &'static str {
        match self {
            Persona::English => prompts::ENGLISH_TEACHER,
            Persona::Doctor => prompts::DOCTOR,
            Persona::Lawyer => prompts::LAWYER,
        }
    }

    pub fn call_profile(self) -> CallProfile {
        match self {
            Persona::English => CallProfile::English,
            Persona::Doctor => CallProfile::Doctor,
            Persona::Lawyer => CallProfile::Lawyer,
        }
    }

    /// Shown on the dashboard before the user has talked to this persona.
    pub fn demo_greeting(self) -> &'static str {
        match self {
            Persona::English => {
                "Hello! I'm here to help you improve your English skills. What would you like to practice today?"
            }
            Persona::Doctor => {
                "Hi there! I'm Dr. Kyaw. How can I assist you with your health concerns today?"
            }
            Persona::Lawyer => {
                "Good day! I'm here to provide legal guidance. What legal matter can I help you with?"
            }
        }
    }

    /// Reply used when the model call fails.
    pub fn fallback_reply(self, message: &str) -> &'static str {
        let lower = message.to_lowercase();
        let has_word = |words: &[&str]| {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|w| words.contains(&w))
        };
        match self {
            Persona::English => "I'm sorry, I encountered an error processing your message.",
            Persona::Doctor if has_word(&["hello", "hi", "hey"]) => {
                "Hello! I'm Dr. Kyaw. How can I help you with your health concerns today?"
            }
            Persona::Doctor => {
                "Thank you for your message. I'm Dr. Kyaw, here to discuss your health concerns. Could you tell me more about what you're experiencing?"
            }
            Persona::Lawyer if has_word(&["hello", "hi", "hey"]) => {
                "Hello! I'm U Khin Zaw. How can I assist you with your legal matters today?"
            }
            Persona::Lawyer if has_word(&["contract", "contracts", "agreement", "agreements"]) => {
                "Contract questions depend on the exact terms. Please share the key clauses and I will explain your position under Myanmar law."
            }
            Persona::Lawyer if has_word(&["divorce", "marriage", "married"]) => {
                "Family matters such as marriage and divorce depend on your personal law and circumstances. Please tell me more so I can guide you."
            }
            Persona::Lawyer => {
                "I apologize, but I'm having trouble processing your legal inquiry at the moment. Please try again."
            }
        }
    }
}

fn persona_routes(persona: Persona) -> Router<AppState> {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/chat-history-api", get(handlers::history))
        .route("/call", post(handlers::call))
        .route("/clean-audio", post(handlers::clean_audio))
        .layer(Extension(persona.call_profile()))
        .layer(Extension(persona))
}

pub fn router() -> Router<AppState> {
    let mut router = Router::new();
    for persona in Persona::ALL {
        router = router.nest(&format!("/{}", persona.slug()), persona_routes(persona));
    }
    // English-only voice line for the lawyer, kept beside the bilingual one.
    router.nest(
        "/lawyer-call",
        Router::new()
            .route("/call", post(handlers::call))
            .route("/clean-audio", post(handlers::clean_audio))
            .layer(Extension(CallProfile::LawyerEnglish)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_round_trip() {
        for p in Persona::ALL {
            assert_eq!(Persona::from_character(p.character()), Some(p));
        }
        assert_eq!(Persona::from_character("english"), None);
    }

    #[test]
    fn doctor_fallback_is_greeting_aware() {
        assert!(Persona::Doctor.fallback_reply("Hi doctor").starts_with("Hello!"));
        assert!(Persona::Doctor
            .fallback_reply("my head hurts")
            .starts_with("Thank you"));
        // "this" must not count as "hi"
        assert!(Persona::Doctor.fallback_reply("this hurts").starts_with("Thank you"));
    }

    #[test]
    fn lawyer_fallback_follows_keywords() {
        assert!(Persona::Lawyer.fallback_reply("hello").contains("U Khin Zaw"));
        assert!(Persona::Lawyer
            .fallback_reply("My rental agreement was broken")
            .starts_with("Contract"));
        assert!(Persona::Lawyer
            .fallback_reply("How do I file for divorce?")
            .starts_with("Family"));
        assert!(Persona::Lawyer
            .fallback_reply("land dispute")
            .starts_with("I apologize"));
    }
}
