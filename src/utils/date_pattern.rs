use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::MatcherError;

/// Converts Java style date patterns (`yyyy-MM-dd`, `dd.MM.yyyy HH:mm:ss`)
/// into chrono format strings.
pub struct DatePattern;

impl DatePattern {
    /// Translate a Java date pattern to a chrono format string
    pub fn to_chrono_format(pattern: &str) -> Result<String, MatcherError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut format = String::with_capacity(pattern.len() * 2);
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            // quoted literal text, '' is an escaped quote
            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    format.push('\'');
                    i += 2;
                    continue;
                }
                let mut j = i + 1;
                while j < chars.len() && chars[j] != '\'' {
                    push_literal(&mut format, chars[j]);
                    j += 1;
                }
                if j == chars.len() {
                    return Err(MatcherError::invalid_parameter(
                        "datePattern",
                        format!("unterminated quote in date pattern '{}'", pattern),
                    ));
                }
                i = j + 1;
                continue;
            }

            if !c.is_ascii_alphabetic() {
                push_literal(&mut format, c);
                i += 1;
                continue;
            }

            let mut run = 1;
            while i + run < chars.len() && chars[i + run] == c {
                run += 1;
            }

            let directive = match (c, run) {
                ('y', 2) => "%y",
                ('y', _) => "%Y",
                ('M', 1) | ('M', 2) => "%m",
                ('M', 3) => "%b",
                ('M', _) => "%B",
                ('d', _) => "%d",
                ('H', _) => "%H",
                ('h', _) => "%I",
                ('m', _) => "%M",
                ('s', _) => "%S",
                ('S', _) => "%3f",
                ('E', 1..=3) => "%a",
                ('E', _) => "%A",
                ('a', _) => "%p",
                ('Z', _) => "%z",
                ('X', 1) | ('X', 2) => "%z",
                ('X', _) => "%:z",
                _ => {
                    return Err(MatcherError::invalid_parameter(
                        "datePattern",
                        format!("unsupported pattern letter '{}' in '{}'", c, pattern),
                    ))
                }
            };

            format.push_str(directive);
            i += run;
        }

        Ok(format)
    }

    /// Parse `value` with a Java date pattern. Date-only patterns yield midnight,
    /// time-only patterns are placed on 1970-01-01.
    pub fn parse(value: &str, pattern: &str) -> Result<NaiveDateTime, MatcherError> {
        let format = Self::to_chrono_format(pattern)?;

        Self::parse_formatted(value, &format).ok_or_else(|| {
            MatcherError::invalid_parameter(
                "datePattern",
                format!("'{}' does not match date pattern '{}'", value, pattern),
            )
        })
    }

    /// Parse `value` with an already translated chrono format
    pub fn parse_formatted(value: &str, format: &str) -> Option<NaiveDateTime> {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date_time);
        }

        if let Some(midnight) = NaiveDate::parse_from_str(value, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Some(midnight);
        }

        let time = NaiveTime::parse_from_str(value, format).ok()?;
        NaiveDate::from_ymd_opt(1970, 1, 1).map(|epoch| epoch.and_time(time))
    }
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}
