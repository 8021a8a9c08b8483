//! Core function library (`core:` prefix)

use super::function_registry::{Function, FunctionLibrary};
use crate::context::TestContext;
use crate::error::MatcherError;
use crate::utils::DatePattern;
use std::sync::Arc;

pub const CORE_PREFIX: &str = "core:";

pub fn core_library() -> FunctionLibrary {
    FunctionLibrary::new("core", CORE_PREFIX)
        .with_function("concat", Arc::new(ConcatFunction))
        .with_function("upperCase", Arc::new(UpperCaseFunction))
        .with_function("lowerCase", Arc::new(LowerCaseFunction))
        .with_function("substring", Arc::new(SubstringFunction))
        .with_function("stringLength", Arc::new(StringLengthFunction))
        .with_function("trim", Arc::new(TrimFunction))
        .with_function("currentDate", Arc::new(CurrentDateFunction))
}

fn single_parameter<'a>(function: &str, parameters: &'a [String]) -> Result<&'a str, MatcherError> {
    parameters.first().map(String::as_str).ok_or_else(|| {
        MatcherError::InvalidFunctionCall(format!("{} requires one parameter", function))
    })
}

pub struct ConcatFunction;

impl Function for ConcatFunction {
    fn execute(&self, parameters: &[String], _context: &TestContext) -> Result<String, MatcherError> {
        Ok(parameters.concat())
    }
}

pub struct UpperCaseFunction;

impl Function for UpperCaseFunction {
    fn execute(&self, parameters: &[String], _context: &TestContext) -> Result<String, MatcherError> {
        Ok(single_parameter("upperCase", parameters)?.to_uppercase())
    }
}

pub struct LowerCaseFunction;

impl Function for LowerCaseFunction {
    fn execute(&self, parameters: &[String], _context: &TestContext) -> Result<String, MatcherError> {
        Ok(single_parameter("lowerCase", parameters)?.to_lowercase())
    }
}

/// `substring(value, beginIndex[, endIndex])`, character based
pub struct SubstringFunction;

impl Function for SubstringFunction {
    fn execute(&self, parameters: &[String], _context: &TestContext) -> Result<String, MatcherError> {
        if parameters.len() < 2 {
            return Err(MatcherError::InvalidFunctionCall(
                "substring requires value and begin index".to_string(),
            ));
        }

        let chars: Vec<char> = parameters[0].chars().collect();
        let parse_index = |raw: &str| {
            raw.trim().parse::<usize>().map_err(|_| {
                MatcherError::InvalidFunctionCall(format!("substring index '{}' is not a number", raw))
            })
        };

        let begin = parse_index(&parameters[1])?;
        let end = match parameters.get(2) {
            Some(raw) => parse_index(raw)?,
            None => chars.len(),
        };

        if begin > end || end > chars.len() {
            return Err(MatcherError::InvalidFunctionCall(format!(
                "substring range {}..{} out of bounds for '{}'",
                begin, end, parameters[0]
            )));
        }

        Ok(chars[begin..end].iter().collect())
    }
}

pub struct StringLengthFunction;

impl Function for StringLengthFunction {
    fn execute(&self, parameters: &[String], _context: &TestContext) -> Result<String, MatcherError> {
        Ok(single_parameter("stringLength", parameters)?.chars().count().to_string())
    }
}

pub struct TrimFunction;

impl Function for TrimFunction {
    fn execute(&self, parameters: &[String], _context: &TestContext) -> Result<String, MatcherError> {
        Ok(single_parameter("trim", parameters)?.trim().to_string())
    }
}

/// Local date/time formatted with a Java date pattern, defaults to the
/// configured date format
pub struct CurrentDateFunction;

impl Function for CurrentDateFunction {
    fn execute(&self, parameters: &[String], context: &TestContext) -> Result<String, MatcherError> {
        let pattern = parameters
            .first()
            .map(String::as_str)
            .unwrap_or(context.settings().default_date_format.as_str());
        let format = DatePattern::to_chrono_format(pattern)?;
        Ok(chrono::Local::now().format(&format).to_string())
    }
}
