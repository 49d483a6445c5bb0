use std::time::Duration;

use crate::llm::prompts;

const HALF_DAY: Duration = Duration::from_secs(12 * 60 * 60);

/// Voice-call configuration. `LawyerEnglish` shares the lawyer audio folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallProfile {
    English,
    Doctor,
    Lawyer,
    LawyerEnglish,
}

const ENGLISH_VOICES: &[(&str, &str)] = &[
    ("default", "en-US-JennyNeural"),
    ("female2", "en-US-AriaNeural"),
    ("female3", "en-US-AnaNeural"),
    ("female4", "en-US-AshleyNeural"),
    ("female5", "en-US-MichelleNeural"),
    ("female6", "en-US-SaraNeural"),
];

const DOCTOR_VOICES: &[(&str, &str)] = &[
    ("default", "en-US-ChristopherNeural"),
    ("male2", "en-US-EricNeural"),
    ("male3", "en-US-GuyNeural"),
];

const LAWYER_VOICES: &[(&str, &str)] = &[
    ("male1", "en-US-ChristopherNeural"),
    ("male2", "en-US-EricNeural"),
    ("male3", "en-US-GuyNeural"),
    ("female1", "en-US-AriaNeural"),
    ("female2", "en-US-JennyNeural"),
];

impl CallProfile {
    /// Audio sub-folder, also the file-name prefix.
    pub fn folder(self) -> &'static str {
        match self {
            CallProfile::English => "english",
            CallProfile::Doctor => "doctor",
            CallProfile::Lawyer | CallProfile::LawyerEnglish => "lawyer",
        }
    }

    /// Voice key -> neural voice id; the first entry is the default.
    fn voices(self) -> &'static [(&'static str, &'static str)] {
        match self {
            CallProfile::English => ENGLISH_VOICES,
            CallProfile::Doctor | CallProfile::LawyerEnglish => DOCTOR_VOICES,
            CallProfile::Lawyer => LAWYER_VOICES,
        }
    }

    /// Resolves a requested key to `(key, voice id)`, falling back to the default.
    pub fn voice(self, key: Option<&str>) -> (&'static str, &'static str) {
        let voices = self.voices();
        key.and_then(|k| voices.iter().find(|(name, _)| *name == k))
            .copied()
            .unwrap_or(voices[0])
    }

    /// Age beyond which old files are swept before a new synthesis; `None` clears the folder.
    pub fn retention(self) -> Option<Duration> {
        match self {
            CallProfile::English => None,
            _ => Some(HALF_DAY),
        }
    }

    pub fn tts_timeout(self) -> Duration {
        match self {
            CallProfile::English => Duration::from_secs(15),
            _ => Duration::from_secs(30),
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            CallProfile::English => prompts::ENGLISH_TEACHER,
            CallProfile::Doctor => prompts::DOCTOR_CALL,
            CallProfile::Lawyer => prompts::LAWYER,
            CallProfile::LawyerEnglish => prompts::LAWYER_CALL_ENGLISH,
        }
    }

    pub fn empty_message_reply(self) -> &'static str {
        match self {
            CallProfile::English => "Please say something.",
            CallProfile::Doctor => "Please provide a message",
            CallProfile::Lawyer => "Please describe your legal concern.",
            CallProfile::LawyerEnglish => "Please describe your legal issue in English.",
        }
    }

    pub fn error_reply(self) -> &'static str {
        match self {
            CallProfile::English => "Sorry, I'm having technical difficulties. Please try again.",
            CallProfile::Doctor => {
                "I apologize, but I'm having trouble processing your request. Please try again."
            }
            CallProfile::Lawyer => {
                "I'm having trouble processing your legal question. Please try again."
            }
            CallProfile::LawyerEnglish => {
                "I apologize for the technical issue. Please consult a licensed Myanmar attorney for legal advice."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_voice_uses_profile_default() {
        assert_eq!(
            CallProfile::English.voice(Some("female3")),
            ("female3", "en-US-AnaNeural")
        );
        assert_eq!(
            CallProfile::English.voice(Some("baritone")),
            ("default", "en-US-JennyNeural")
        );
        assert_eq!(CallProfile::Lawyer.voice(None), ("male1", "en-US-ChristopherNeural"));
        assert_eq!(
            CallProfile::LawyerEnglish.voice(Some("male3")),
            ("male3", "en-US-GuyNeural")
        );
    }

    #[test]
    fn english_clears_folder_others_keep_half_a_day() {
        assert_eq!(CallProfile::English.retention(), None);
        assert_eq!(CallProfile::Doctor.retention(), Some(HALF_DAY));
        assert_eq!(CallProfile::English.tts_timeout(), Duration::from_secs(15));
        assert_eq!(CallProfile::Lawyer.tts_timeout(), Duration::from_secs(30));
        assert_eq!(CallProfile::LawyerEnglish.folder(), "lawyer");
    }
}
