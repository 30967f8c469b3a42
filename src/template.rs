use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template variable '{{{0}}}' has no matching input")]
    MissingInput(String),
}

/// Named string inputs supplied once per kickoff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineInputs(BTreeMap<String, String>);

impl PipelineInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|s| s.as_str())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for PipelineInputs {
    fn from(pairs: [(K, V); N]) -> Self {
        let mut inputs = Self::new();
        for (k, v) in pairs {
            inputs.insert(k, v);
        }
        inputs
    }
}

impl fmt::Display for PipelineInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.keys().collect();
        write!(f, "[{}]", keys.join(", "))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Replace every `{identifier}` in `template` with its input value.
///
/// Braces around anything that is not an identifier (JSON snippets, empty
/// braces, spaces) are copied through untouched.
pub fn interpolate(template: &str, inputs: &PipelineInputs) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(out);
        };

        let name = &after[..close];
        if is_identifier(name) {
            let value = inputs
                .get(name)
                .ok_or_else(|| TemplateError::MissingInput(name.to_string()))?;
            out.push_str(value);
            rest = &after[close + 1..];
        } else {
            // Keep the brace and rescan from the next character so nested
            // placeholders such as `{{topic}}` still resolve.
            out.push('{');
            rest = after;
        }
    }
    out.push_str(rest);
    Ok(out)
}
