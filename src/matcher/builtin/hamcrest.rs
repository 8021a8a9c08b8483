//! `assertThat` with hamcrest style nested matcher expressions such as
//! `allOf(startsWith(a), not(endsWith(z)))`

use crate::context::TestContext;
use crate::error::{MatcherError, ValidationError};
use crate::matcher::{ControlExpressionParser, DefaultControlExpressionParser, ValidationMatcher, DEFAULT_DELIMITER};
use log::debug;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

const MATCHER_NAME: &str = "assertThat";

/// Matchers that take arguments
const CALL_MATCHERS: &[&str] = &[
    "equalTo",
    "equalToIgnoringCase",
    "equalToIgnoringWhiteSpace",
    "containsString",
    "startsWith",
    "endsWith",
    "matchesPattern",
    "is",
    "not",
    "anyOf",
    "allOf",
    "greaterThan",
    "greaterThanOrEqualTo",
    "lessThan",
    "lessThanOrEqualTo",
    "closeTo",
    "isOneOf",
    "isIn",
    "hasSize",
    "hasItem",
    "hasItems",
    "contains",
    "containsInAnyOrder",
    "everyItem",
    "hasKey",
    "hasValue",
    "hasEntry",
];

/// Matchers that may be written without parentheses
const BARE_MATCHERS: &[&str] = &[
    "isEmptyString",
    "emptyString",
    "isEmptyOrNullString",
    "emptyOrNullString",
    "nullValue",
    "notNullValue",
    "anything",
    "empty",
];

/// Keeps the body in one piece so nested parentheses and commas survive.
/// `'value', matcher(...)` splits into the value to check and the matcher.
#[derive(Debug, Default)]
pub struct HamcrestExpressionParser;

impl ControlExpressionParser for HamcrestExpressionParser {
    fn extract_control_values(&self, control_expression: &str, delimiter: Option<char>) -> Result<Vec<String>, MatcherError> {
        let body = control_expression.trim();
        if body.is_empty() {
            return Ok(Vec::new());
        }

        let delimiter = delimiter.unwrap_or(DEFAULT_DELIMITER);
        if body.starts_with(delimiter) {
            let separator = format!("{},", delimiter);
            if body.starts_with(&separator) {
                return Err(MatcherError::invalid_parameter(
                    MATCHER_NAME,
                    format!("missing value before matcher expression in '{}'", body),
                ));
            }

            let skip = delimiter.len_utf8();
            if let Some(split) = body[skip..].find(&separator).map(|i| i + skip) {
                let value = body[skip..split].to_string();
                let expression = unquote(&body[split + separator.len()..]).to_string();
                return Ok(vec![value, expression]);
            }
            return DefaultControlExpressionParser.extract_control_values(body, Some(delimiter));
        }

        Ok(vec![body.to_string()])
    }
}

/// Named custom matcher usable inside `assertThat` expressions, e.g.
/// `matchesPath(value/{id})`. The provider receives the single argument as
/// predicate.
pub trait HamcrestMatcherProvider: Send + Sync {
    fn name(&self) -> &str;

    fn matches(&self, predicate: &str, value: &str) -> Result<bool, MatcherError>;
}

/// `matchesPath(pattern)`: ant style path pattern where `{name}` and `*`
/// match one segment, `?` one character and `**` any number of segments
#[derive(Debug, Default)]
pub struct PathMatcherProvider;

impl PathMatcherProvider {
    fn to_regex(pattern: &str) -> String {
        let mut translated = String::from("^");
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '/' if chars.get(i + 1) == Some(&'*') && chars.get(i + 2) == Some(&'*') => {
                    translated.push_str("(?:/.*)?");
                    i += 3;
                    continue;
                }
                '*' if chars.get(i + 1) == Some(&'*') => {
                    translated.push_str(".*");
                    i += 2;
                    continue;
                }
                '*' => translated.push_str("[^/]*"),
                '?' => translated.push_str("[^/]"),
                '{' => match chars[i..].iter().position(|c| *c == '}') {
                    Some(close) => {
                        let variable: String = chars[i + 1..i + close].iter().collect();
                        match variable.split_once(':') {
                            Some((_, custom)) => {
                                translated.push_str("(?:");
                                translated.push_str(custom);
                                translated.push(')');
                            }
                            None => translated.push_str("[^/]+"),
                        }
                        i += close + 1;
                        continue;
                    }
                    None => translated.push_str(&regex::escape("{")),
                },
                c => translated.push_str(&regex::escape(&c.to_string())),
            }
            i += 1;
        }

        translated.push('$');
        translated
    }
}

impl HamcrestMatcherProvider for PathMatcherProvider {
    fn name(&self) -> &str {
        "matchesPath"
    }

    fn matches(&self, predicate: &str, value: &str) -> Result<bool, MatcherError> {
        Ok(Regex::new(&Self::to_regex(predicate))?.is_match(value))
    }
}

/// Evaluates a hamcrest style expression against the received value, or
/// against an explicit value given as first parameter.
pub struct HamcrestValidationMatcher {
    parser: HamcrestExpressionParser,
    providers: Vec<Arc<dyn HamcrestMatcherProvider>>,
}

impl HamcrestValidationMatcher {
    pub fn new() -> Self {
        Self {
            parser: HamcrestExpressionParser,
            providers: vec![Arc::new(PathMatcherProvider)],
        }
    }

    /// Add a custom matcher. Providers are consulted before the built-in
    /// matchers, the latest registration wins on equal names.
    pub fn with_provider(mut self, provider: Arc<dyn HamcrestMatcherProvider>) -> Self {
        self.providers.insert(0, provider);
        self
    }

    fn provider(&self, name: &str) -> Option<&Arc<dyn HamcrestMatcherProvider>> {
        self.providers.iter().find(|provider| provider.name() == name)
    }
}

impl Default for HamcrestValidationMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HamcrestValidationMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamcrestValidationMatcher")
            .field("providers", &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl ValidationMatcher for HamcrestValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        let (actual, expression) = match control {
            [expression] => (value, expression.as_str()),
            [actual, expression, ..] => (actual.as_str(), expression.as_str()),
            [] => {
                return Err(MatcherError::invalid_parameter(
                    MATCHER_NAME,
                    "missing matcher expression",
                ))
            }
        };

        let parsed = HamcrestExpr::parse(expression, &|name: &str| self.provider(name).cloned())?;
        debug!("Evaluating '{}' against value '{}'", expression, actual);

        if parsed.evaluate(actual)? {
            Ok(())
        } else {
            Err(ValidationError::new(
                field_name,
                actual,
                format!(
                    "{} failed for field '{}'. Received value is '{}' and did not match '{}'.",
                    MATCHER_NAME, field_name, actual, expression
                ),
            )
            .with_expected(vec![expression.to_string()])
            .into())
        }
    }

    fn name(&self) -> &str {
        MATCHER_NAME
    }

    fn control_expression_parser(&self) -> Option<&dyn ControlExpressionParser> {
        Some(&self.parser)
    }
}

/// Finds a custom matcher provider by name
type ProviderLookup<'a> = dyn Fn(&str) -> Option<Arc<dyn HamcrestMatcherProvider>> + 'a;

#[derive(Clone)]
enum Argument {
    Matcher(HamcrestExpr),
    Literal(String),
}

impl Argument {
    fn parse(text: &str, providers: &ProviderLookup<'_>) -> Result<Self, MatcherError> {
        let text = text.trim();
        if is_quoted(text) {
            return Ok(Argument::Literal(unescape_quotes(unquote(text))));
        }
        match HamcrestExpr::try_parse(text, providers)? {
            Some(expr) => Ok(Argument::Matcher(expr)),
            None => Ok(Argument::Literal(unescape_quotes(text))),
        }
    }

    fn literal(&self) -> Option<&str> {
        match self {
            Argument::Literal(value) => Some(value),
            Argument::Matcher(_) => None,
        }
    }

    /// Nested matchers are evaluated, literals compared for equality
    fn matches(&self, value: &str) -> Result<bool, MatcherError> {
        match self {
            Argument::Matcher(expr) => expr.evaluate(value),
            Argument::Literal(expected) => Ok(value == expected),
        }
    }
}

#[derive(Clone)]
struct HamcrestExpr {
    name: String,
    args: Vec<Argument>,
    provider: Option<Arc<dyn HamcrestMatcherProvider>>,
}

impl HamcrestExpr {
    fn parse(text: &str, providers: &ProviderLookup<'_>) -> Result<Self, MatcherError> {
        let text = unquote(text.trim());
        Self::try_parse(text, providers)?.ok_or_else(|| {
            MatcherError::invalid_parameter(MATCHER_NAME, format!("'{}' is not a supported matcher expression", text))
        })
    }

    /// `None` when `text` is neither a custom nor a known matcher call
    fn try_parse(text: &str, providers: &ProviderLookup<'_>) -> Result<Option<Self>, MatcherError> {
        if BARE_MATCHERS.contains(&text) {
            return Ok(Some(Self {
                name: text.to_string(),
                args: Vec::new(),
                provider: None,
            }));
        }

        let open = match text.find('(') {
            Some(open) if text.ends_with(')') => open,
            _ => return Ok(None),
        };

        let name = text[..open].trim();
        let inner = &text[open + 1..text.len() - 1];

        if let Some(provider) = providers(name) {
            let predicate = unescape_quotes(unquote(inner));
            return Ok(Some(Self {
                name: name.to_string(),
                args: vec![Argument::Literal(predicate)],
                provider: Some(provider),
            }));
        }

        if !CALL_MATCHERS.contains(&name) && !BARE_MATCHERS.contains(&name) {
            return Ok(None);
        }

        let args = split_arguments(inner)
            .iter()
            .map(|arg| Argument::parse(arg, providers))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Self {
            name: name.to_string(),
            args,
            provider: None,
        }))
    }

    fn arg(&self, index: usize) -> Result<&Argument, MatcherError> {
        self.args.get(index).ok_or_else(|| {
            MatcherError::invalid_parameter(
                MATCHER_NAME,
                format!("'{}' expects at least {} argument(s)", self.name, index + 1),
            )
        })
    }

    fn text_arg(&self, index: usize) -> Result<&str, MatcherError> {
        let arg = self.arg(index)?;
        arg.literal().ok_or_else(|| {
            MatcherError::invalid_parameter(MATCHER_NAME, format!("'{}' expects a value, not a matcher", self.name))
        })
    }

    fn number_arg(&self, index: usize) -> Result<f64, MatcherError> {
        let raw = self.text_arg(index)?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| MatcherError::invalid_parameter(MATCHER_NAME, format!("'{}' is not a number", raw)))
    }

    fn evaluate(&self, value: &str) -> Result<bool, MatcherError> {
        if let Some(provider) = &self.provider {
            return provider.matches(self.text_arg(0)?, value);
        }

        let result = match self.name.as_str() {
            "equalTo" => value == self.text_arg(0)?,
            "equalToIgnoringCase" => value.to_lowercase() == self.text_arg(0)?.to_lowercase(),
            "equalToIgnoringWhiteSpace" => collapse_whitespace(value) == collapse_whitespace(self.text_arg(0)?),
            "containsString" => value.contains(self.text_arg(0)?),
            "startsWith" => value.starts_with(self.text_arg(0)?),
            "endsWith" => value.ends_with(self.text_arg(0)?),
            "matchesPattern" => Regex::new(&format!("^(?:{})$", self.text_arg(0)?))?.is_match(value),

            "isEmptyString" | "emptyString" => value.is_empty(),
            "isEmptyOrNullString" | "emptyOrNullString" => value.is_empty() || value == "null",
            "nullValue" => value == "null",
            "notNullValue" => value != "null",
            "anything" => true,

            "is" => self.arg(0)?.matches(value)?,
            "not" => !self.arg(0)?.matches(value)?,
            "anyOf" => {
                let mut any = false;
                for arg in &self.args {
                    if arg.matches(value)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            "allOf" => {
                let mut all = true;
                for arg in &self.args {
                    if !arg.matches(value)? {
                        all = false;
                        break;
                    }
                }
                all
            }

            "greaterThan" => compare(value, self.number_arg(0)?, |a, b| a > b),
            "greaterThanOrEqualTo" => compare(value, self.number_arg(0)?, |a, b| a >= b),
            "lessThan" => compare(value, self.number_arg(0)?, |a, b| a < b),
            "lessThanOrEqualTo" => compare(value, self.number_arg(0)?, |a, b| a <= b),
            "closeTo" => {
                let operand = self.number_arg(0)?;
                let error = if self.args.len() > 1 { self.number_arg(1)? } else { 0.0 };
                compare(value, operand, |a, b| (a - b).abs() <= error)
            }

            "isOneOf" | "isIn" => self.args.iter().any(|arg| arg.literal() == Some(value)),

            "empty" => match Collection::parse(value) {
                Some(collection) => collection.len() == 0,
                None => value.is_empty(),
            },
            "hasSize" => {
                let expected = self.number_arg(0)?;
                Collection::parse(value).map_or(false, |c| c.len() as f64 == expected)
            }
            "hasItem" => match Collection::parse(value) {
                Some(collection) => any_item(&collection.items(), self.arg(0)?)?,
                None => false,
            },
            "hasItems" => match Collection::parse(value) {
                Some(collection) => {
                    let items = collection.items();
                    let mut all = true;
                    for arg in &self.args {
                        if !any_item(&items, arg)? {
                            all = false;
                            break;
                        }
                    }
                    all
                }
                None => false,
            },
            "contains" => match Collection::parse(value) {
                Some(collection) => {
                    let items = collection.items();
                    if items.len() != self.args.len() {
                        false
                    } else {
                        let mut all = true;
                        for (item, arg) in items.iter().zip(&self.args) {
                            if !arg.matches(item)? {
                                all = false;
                                break;
                            }
                        }
                        all
                    }
                }
                None => false,
            },
            "containsInAnyOrder" => match Collection::parse(value) {
                Some(collection) => matches_in_any_order(&collection.items(), &self.args)?,
                None => false,
            },
            "everyItem" => match Collection::parse(value) {
                Some(collection) => {
                    let matcher = self.arg(0)?;
                    let mut all = true;
                    for item in collection.items() {
                        if !matcher.matches(&item)? {
                            all = false;
                            break;
                        }
                    }
                    all
                }
                None => false,
            },

            "hasKey" => match Collection::parse(value) {
                Some(Collection::Map(entries)) => any_item(&keys(&entries), self.arg(0)?)?,
                _ => false,
            },
            "hasValue" => match Collection::parse(value) {
                Some(Collection::Map(entries)) => any_item(&values(&entries), self.arg(0)?)?,
                _ => false,
            },
            "hasEntry" => match Collection::parse(value) {
                Some(Collection::Map(entries)) => {
                    let key = self.arg(0)?;
                    let expected = self.arg(1)?;
                    let mut found = false;
                    for (k, v) in &entries {
                        if key.matches(k)? && expected.matches(v)? {
                            found = true;
                            break;
                        }
                    }
                    found
                }
                _ => false,
            },

            other => {
                return Err(MatcherError::invalid_parameter(
                    MATCHER_NAME,
                    format!("unsupported matcher '{}'", other),
                ))
            }
        };

        Ok(result)
    }
}

/// Received value rendered as `[a, b]` list or `{k=v, k2=v2}` map
enum Collection {
    List(Vec<String>),
    Map(Vec<(String, String)>),
}

impl Collection {
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with('[') && value.ends_with(']') {
            let items = split_arguments(&value[1..value.len() - 1])
                .into_iter()
                .map(|item| unquote(&item).to_string())
                .collect();
            return Some(Collection::List(items));
        }

        if value.starts_with('{') && value.ends_with('}') {
            let entries = split_arguments(&value[1..value.len() - 1])
                .into_iter()
                .map(|entry| match entry.split_once(|c| c == '=' || c == ':') {
                    Some((k, v)) => (unquote(k).to_string(), unquote(v).to_string()),
                    None => (unquote(&entry).to_string(), String::new()),
                })
                .collect();
            return Some(Collection::Map(entries));
        }

        None
    }

    fn len(&self) -> usize {
        match self {
            Collection::List(items) => items.len(),
            Collection::Map(entries) => entries.len(),
        }
    }

    /// List items, or `k=v` renderings of map entries
    fn items(&self) -> Vec<String> {
        match self {
            Collection::List(items) => items.clone(),
            Collection::Map(entries) => entries.iter().map(|(k, v)| format!("{}={}", k, v)).collect(),
        }
    }
}

fn keys(entries: &[(String, String)]) -> Vec<String> {
    entries.iter().map(|(k, _)| k.clone()).collect()
}

fn values(entries: &[(String, String)]) -> Vec<String> {
    entries.iter().map(|(_, v)| v.clone()).collect()
}

fn any_item(items: &[String], matcher: &Argument) -> Result<bool, MatcherError> {
    for item in items {
        if matcher.matches(item)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Every argument claims a distinct item and no item is left over
fn matches_in_any_order(items: &[String], args: &[Argument]) -> Result<bool, MatcherError> {
    if items.len() != args.len() {
        return Ok(false);
    }

    let mut used = vec![false; items.len()];
    for arg in args {
        let mut claimed = false;
        for (index, item) in items.iter().enumerate() {
            if !used[index] && arg.matches(item)? {
                used[index] = true;
                claimed = true;
                break;
            }
        }
        if !claimed {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Numeric comparison, non-numeric values never match
fn compare(value: &str, operand: f64, check: impl Fn(f64, f64) -> bool) -> bool {
    value.trim().parse::<f64>().map_or(false, |number| check(number, operand))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `\'` in an argument stands for a plain quote
fn unescape_quotes(text: &str) -> String {
    text.replace("\\'", "'")
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2
        && ((text.starts_with('\'') && text.ends_with('\'')) || (text.starts_with('"') && text.ends_with('"')))
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    if is_quoted(text) {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Split at commas outside quotes and brackets, pieces are trimmed but keep
/// their quotes
fn split_arguments(text: &str) -> Vec<String> {
    let mut arguments = Vec::new();
    if text.trim().is_empty() {
        return arguments;
    }

    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in text.chars() {
        if escaped {
            escaped = false;
            current.push(c);
            continue;
        }

        match (c, quote) {
            ('\\', _) => {
                escaped = true;
                current.push(c);
            }
            ('\'' | '"', None) => {
                quote = Some(c);
                current.push(c);
            }
            (_, Some(q)) if c == q => {
                quote = None;
                current.push(c);
            }
            ('(' | '[' | '{', None) => {
                depth += 1;
                current.push(c);
            }
            (')' | ']' | '}', None) => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            (',', None) if depth == 0 => {
                arguments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    arguments.push(current.trim().to_string());

    arguments
}
