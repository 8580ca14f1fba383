//! # URL Building
//!
//! Endpoint templates are plain paths whose `:name` segments are filled from the
//! command parameters. Parameters not consumed by the path are sent as query pairs.
//!
//! ```ignore
//! let builder = TemplateUrlBuilder::parse("http://localhost:8080")?;
//! // {"id": 7, "tag": "x"}
//! builder.build("/api/notes/:id", &params)?; // http://localhost:8080/api/notes/7?tag=x
//! ```

use super::UrlError;
use crate::model::Params;
use serde_json::Value;
use std::collections::HashSet;
use url::Url;

/// Resolves an endpoint template against request parameters.
pub trait UrlBuilder: Send + Sync {
    fn build(&self, template: &str, params: &Params) -> Result<String, UrlError>;
}

/// [`UrlBuilder`] rooted at a base URL.
///
/// Template segments are appended to the base path, so a base of `http://host/v1/`
/// and a template of `/notes` give `http://host/v1/notes`.
#[derive(Debug, Clone)]
pub struct TemplateUrlBuilder {
    base: Url,
}

impl TemplateUrlBuilder {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn parse(base: &str) -> Result<Self, UrlError> {
        let base = Url::parse(base).map_err(|e| UrlError::Parse(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(UrlError::Parse(format!("{base} cannot be a base url")));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl UrlBuilder for TemplateUrlBuilder {
    fn build(&self, template: &str, params: &Params) -> Result<String, UrlError> {
        let mut used = HashSet::new();
        let mut segments = Vec::new();
        for segment in template.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix(':') {
                Some(name) => {
                    let value = params
                        .get(name)
                        .and_then(scalar)
                        .ok_or_else(|| UrlError::MissingParam(name.to_string()))?;
                    used.insert(name);
                    segments.push(value);
                }
                None => segments.push(segment.to_string()),
            }
        }

        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| UrlError::Parse(format!("{} cannot be a base url", self.base)))?;
            path.pop_if_empty();
            path.extend(segments.iter());
        }

        let query: Vec<(&String, String)> = params
            .iter()
            .filter(|(name, _)| !used.contains(name.as_str()))
            .flat_map(|(name, value)| query_values(value).into_iter().map(move |v| (name, v)))
            .collect();
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, &value);
            }
        }

        Ok(url.into())
    }
}

/// Text form of a scalar parameter. `null`, arrays and objects have none.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Arrays repeat the key, objects are sent as JSON text, `null` is skipped.
fn query_values(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(values) => values.iter().filter_map(scalar).collect(),
        Value::Object(_) => vec![value.to_string()],
        other => scalar(other).into_iter().collect(),
    }
}
