use std::cmp::Reverse;

use strum_macros::{EnumString, IntoStaticStr};

/// Voice age, as reported by the engine.
#[derive(Debug, PartialEq, Eq, Clone, Copy, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum VoiceAge {
    Adult,
    Child,
    Senior,
    Teen,
}

/// Voice gender, as reported by the engine.
#[derive(Debug, PartialEq, Eq, Clone, Copy, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum VoiceGender {
    Female,
    Male,
    Neutral,
}

/// Describes a voice installed in a speech engine.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VoiceInfo {
    /// The name used to select the voice.
    pub name: String,
    /// The gender the voice reports, if any.
    pub gender: Option<VoiceGender>,
    /// The age the voice reports, if any.
    pub age: Option<VoiceAge>,
    /// The locale name the voice reports, if any.
    pub language: Option<String>,
}

impl VoiceInfo {
    /// Describes a voice with only a name.
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            gender: None,
            age: None,
            language: None,
        }
    }

    /// Sets the reported gender.
    pub fn with_gender(mut self, gender: VoiceGender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Sets the reported age.
    pub fn with_age(mut self, age: VoiceAge) -> Self {
        self.age = Some(age);
        self
    }
}

/// Picks the voice that best matches the given hints. Gender weighs more than age. Among equally
/// good matches, the one listed first wins.
pub fn best_match(voices: &[VoiceInfo], gender: VoiceGender, age: VoiceAge) -> Option<&VoiceInfo> {
    voices.iter().min_by_key(|voice| {
        let mut score = 0;
        if voice.gender == Some(gender) {
            score += 2;
        }
        if voice.age == Some(age) {
            score += 1;
        }
        Reverse(score)
    })
}
