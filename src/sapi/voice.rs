use std::str::FromStr;

use crate::tts::{VoiceAge, VoiceGender, VoiceInfo};

use super::token::{Category, Token, Tokens, VOICES_CATEGORY};

/// Builds a SAPI attribute query, e.g. `name=Microsoft Zira Desktop;gender=Female`.
#[derive(Debug, Default)]
pub struct VoiceSelector {
    sapi_expr: String,
}

impl VoiceSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_eq<S: AsRef<str>>(self, name: S) -> Self {
        self.append_condition("name=", name.as_ref())
    }

    fn append_condition(mut self, prefix: &str, val: &str) -> Self {
        if !self.sapi_expr.is_empty() {
            self.sapi_expr.push(';')
        }
        self.sapi_expr.push_str(prefix);
        self.sapi_expr.push_str(val);
        self
    }

    pub fn into_sapi_expr(self) -> String {
        self.sapi_expr
    }
}

/// Enumerates the installed voices that satisfy `required`.
pub fn voice_tokens(required: VoiceSelector) -> windows::core::Result<Tokens> {
    Category::new(VOICES_CATEGORY)?.enum_tokens(&required.into_sapi_expr())
}

/// Describes a voice token. Tokens without a name are skipped.
pub fn voice_info(token: &Token) -> Option<VoiceInfo> {
    Some(VoiceInfo {
        name: token.str_attr("name")?,
        gender: token.str_attr("gender").and_then(|s| VoiceGender::from_str(&s).ok()),
        age: token.str_attr("age").and_then(|s| VoiceAge::from_str(&s).ok()),
        language: token.str_attr("language"),
    })
}
