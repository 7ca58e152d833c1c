//! Placeholder substitution applied to the text before it is spoken.
//!
//! The recognized placeholders are `{NOW}`, `{DATE}`, `{TIME}` and `{COMPUTERNAME}`, matched
//! without regard to ASCII case.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDateTime};

const DEFAULT_NOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// The runtime values the placeholders expand to.
#[derive(Debug, Clone)]
pub struct Placeholders {
    /// The moment used for `{NOW}`, `{DATE}` and `{TIME}`.
    pub now: NaiveDateTime,
    /// The value of `{COMPUTERNAME}`.
    pub host_name: String,
}

impl Placeholders {
    /// Captures the current local time and the name of this machine.
    pub fn current() -> Self {
        Self {
            now: Local::now().naive_local(),
            host_name: gethostname::gethostname().to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Token {
    Now,
    Date,
    Time,
    ComputerName,
}

const TOKENS: [(&str, Token); 4] = [
    ("{NOW}", Token::Now),
    ("{DATE}", Token::Date),
    ("{TIME}", Token::Time),
    ("{COMPUTERNAME}", Token::ComputerName),
];

/// Replaces the placeholders in `text` with the current values, formatting dates and times with
/// the `strftime` pattern `fmt`. An empty or invalid pattern selects a default for each
/// placeholder.
pub fn normalize(text: &str, fmt: &str) -> String {
    normalize_with(text, fmt, &Placeholders::current())
}

/// Like [`normalize`], with explicit placeholder values.
pub fn normalize_with(text: &str, fmt: &str, values: &Placeholders) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        rest = &rest[start..];
        match match_token(rest) {
            Some((token, len)) => {
                result.push_str(&expand(token, fmt, values));
                rest = &rest[len..];
            }
            None => {
                result.push('{');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

fn match_token(s: &str) -> Option<(Token, usize)> {
    TOKENS.iter().find_map(|(name, token)| {
        s.get(..name.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(name))
            .map(|_| (*token, name.len()))
    })
}

fn expand(token: Token, fmt: &str, values: &Placeholders) -> String {
    match token {
        Token::Now => format_time(&values.now, fmt, DEFAULT_NOW_FORMAT),
        Token::Date => {
            let midnight = values.now.date().and_hms_opt(0, 0, 0).unwrap_or(values.now);
            format_time(&midnight, fmt, DEFAULT_DATE_FORMAT)
        }
        Token::Time => format_time(&values.now, fmt, DEFAULT_TIME_FORMAT),
        Token::ComputerName => values.host_name.clone(),
    }
}

fn format_time(time: &NaiveDateTime, fmt: &str, default: &str) -> String {
    if !fmt.is_empty() {
        let items: Vec<Item> = StrftimeItems::new(fmt).collect();
        if !items.iter().any(|item| matches!(item, Item::Error)) {
            let mut out = String::new();
            if write!(out, "{}", time.format_with_items(items.into_iter())).is_ok() {
                return out;
            }
        }
        tracing::warn!(format = fmt, "invalid date/time format, using default");
    }
    time.format(default).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn values() -> Placeholders {
        Placeholders {
            now: NaiveDate::from_ymd_opt(2021, 3, 8)
                .and_then(|date| date.and_hms_opt(14, 5, 9))
                .unwrap(),
            host_name: "WORKSTATION".into(),
        }
    }

    #[test]
    fn replaces_all_tokens_in_any_case() {
        let text = "It is {now}, {Date} at {TIME} on {ComputerName}; again {DATE}.";
        assert_eq!(
            "It is 2021-03-08 14:05:09, 2021-03-08 at 14:05:09 on WORKSTATION; again 2021-03-08.",
            normalize_with(text, "", &values())
        );
    }

    #[test]
    fn leaves_other_text_untouched() {
        let text = "{NOWHERE} {date {} }{ {TIME";
        assert_eq!(text, normalize_with(text, "", &values()));
        assert_eq!("", normalize_with("", "", &values()));
        assert_eq!("héllo {wörld}", normalize_with("héllo {wörld}", "", &values()));
    }

    #[test]
    fn applies_custom_format() {
        assert_eq!(
            "08.03.2021 00:00 / 08.03.2021 14:05",
            normalize_with("{DATE} / {NOW}", "%d.%m.%Y %H:%M", &values())
        );
    }

    #[test]
    fn invalid_format_falls_back_to_default() {
        assert_eq!("14:05:09", normalize_with("{time}", "%Q", &values()));
    }

    #[test]
    fn replacement_is_not_rescanned() {
        let values = Placeholders {
            host_name: "{NOW}".into(),
            ..values()
        };
        assert_eq!("{NOW}", normalize_with("{COMPUTERNAME}", "", &values));
    }
}
