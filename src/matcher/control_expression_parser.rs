use crate::error::MatcherError;

/// Default parameter delimiter in control expressions
pub const DEFAULT_DELIMITER: char = '\'';

/// Splits the body of a control expression (`'a','b','c'`) into parameters.
///
/// The provided implementation scans for delimiter enclosed values. A closing
/// delimiter only counts when it is followed by `,` or `)` or sits within
/// two characters of the end, so delimiters inside a value such as `'it's'`
/// survive. A non-blank body without any delimited value is returned as one
/// trimmed parameter.
pub trait ControlExpressionParser: Send + Sync {
    fn extract_control_values(
        &self,
        control_expression: &str,
        delimiter: Option<char>,
    ) -> Result<Vec<String>, MatcherError> {
        let delimiter = delimiter.unwrap_or(DEFAULT_DELIMITER);
        let mut extracted = Vec::new();

        if control_expression.trim().is_empty() {
            return Ok(extracted);
        }

        let chars: Vec<char> = control_expression.chars().collect();
        let mut search_from = 0;

        while let Some(start) = position_of(&chars, delimiter, search_from) {
            let end = closing_delimiter(&chars, delimiter, start + 1).ok_or_else(|| {
                MatcherError::UnmatchedDelimiter {
                    delimiter,
                    position: start,
                    expression: control_expression.to_string(),
                }
            })?;

            extracted.push(chars[start + 1..end].iter().collect());

            match position_of(&chars, ',', end) {
                Some(comma) => search_from = comma + 1,
                None => break,
            }
        }

        if extracted.is_empty() {
            extracted.push(control_expression.trim().to_string());
        }

        Ok(extracted)
    }
}

/// Parser used when a matcher brings no parser of its own
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultControlExpressionParser;

impl ControlExpressionParser for DefaultControlExpressionParser {}

fn position_of(chars: &[char], needle: char, from: usize) -> Option<usize> {
    chars
        .iter()
        .skip(from)
        .position(|c| *c == needle)
        .map(|offset| from + offset)
}

fn closing_delimiter(chars: &[char], delimiter: char, from: usize) -> Option<usize> {
    let mut search_from = from;

    loop {
        let candidate = position_of(chars, delimiter, search_from)?;

        if candidate + 2 >= chars.len() {
            return Some(candidate);
        }

        match chars[candidate + 1] {
            ',' | ')' => return Some(candidate),
            _ => search_from = candidate + 1,
        }
    }
}
