use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const EXAMPLE_COUNT: usize = 3;

pub(crate) const NO_DEFINITION: &str = "Definition not available";
pub(crate) const NO_DEFINITION_MY: &str = "အဓိပ္ပာယ်ဖွင့်ဆိုချက် မရှိပါ";
pub(crate) const NO_TRANSLATION: &str = "ဘာသာပြန်မရှိပါ";

/// Dictionary entry returned by `/vocabulary/search`. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub part_of_speech: PartOfSpeech,
    pub burmese: String,
    pub definition: Definition,
    pub examples: [Example; EXAMPLE_COUNT],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub english: String,
    pub burmese: String,
}

impl Definition {
    pub fn not_available() -> Self {
        Self {
            english: NO_DEFINITION.into(),
            burmese: NO_DEFINITION_MY.into(),
        }
    }

    pub fn for_word(word: &str) -> Self {
        Self {
            english: format!("Definition of {word}"),
            burmese: format!("{word} ၏ အဓိပ္ပာယ်ဖွင့်ဆိုချက်"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub english: String,
    pub burmese_translation: String,
}

impl Example {
    /// Filler used to top the list up to [`EXAMPLE_COUNT`]; `n` is 1-based.
    pub fn placeholder(word: &str, n: usize) -> Self {
        Self {
            english: format!("Example sentence {n} with {word}"),
            burmese_translation: format!("{word} စကားလုံးပါဝင်သော ဥပမာဝါကျ {n}"),
        }
    }
}

/// Word class as reported by the model. Anything outside the closed set is
/// carried through verbatim in `Other` so well-formed model output is not rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Preposition,
    Conjunction,
    Interjection,
    Unknown,
    Error,
    Other(String),
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Preposition => "preposition",
            Self::Conjunction => "conjunction",
            Self::Interjection => "interjection",
            Self::Unknown => "unknown",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for PartOfSpeech {
    fn from(s: String) -> Self {
        match s.as_str() {
            "noun" => Self::Noun,
            "verb" => Self::Verb,
            "adjective" => Self::Adjective,
            "adverb" => Self::Adverb,
            "preposition" => Self::Preposition,
            "conjunction" => Self::Conjunction,
            "interjection" => Self::Interjection,
            "unknown" => Self::Unknown,
            "error" => Self::Error,
            _ => Self::Other(s),
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PartOfSpeech {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PartOfSpeech {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl VocabularyEntry {
    /// Canned entry for when the model call itself failed.
    pub fn service_error(word: &str) -> Self {
        Self {
            word: word.to_string(),
            part_of_speech: PartOfSpeech::Error,
            burmese: "အမှားတစ်ခုဖြစ်နေပါသည်".into(),
            definition: Definition {
                english: "An error occurred while processing your request".into(),
                burmese: "တောင်းပန်ပါတယ်၊ သင့်တောင်းဆိုမှုကို ပြုလုပ်စဉ် အမှားတစ်ခုဖြစ်ပေါ်ခဲ့သည်".into(),
            },
            examples: [
                Example {
                    english: "Please try again with a different word.".into(),
                    burmese_translation: "ကျေးဇူးပြု၍ အခြားစကားလုံးဖြင့် ထပ်မံကြိုးစားကြည့်ပါ။".into(),
                },
                Example {
                    english: "Check your internet connection.".into(),
                    burmese_translation: "သင့်အင်တာနက်ချိတ်ဆက်မှုကို စစ်ဆေးကြည့်ပါ။".into(),
                },
                Example {
                    english: "If the problem persists, contact support.".into(),
                    burmese_translation: "ပြဿနာဆက်ရှိနေပါက အကူအညီယူပါ။".into(),
                },
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub entry: VocabularyEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
