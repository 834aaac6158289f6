//! `{placeholder}` templates
//!
//! Placeholders are identifiers wrapped in single braces. Anything else that
//! looks brace-like (`{ spaced }`, `{1}`, a lone `{`) is copied through as-is,
//! and doubled braces are the escape for a literal brace.

use crate::{PromptError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Variables available to a template render
pub type Variables = BTreeMap<String, String>;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .unwrap_or_else(|e| panic!("invalid placeholder pattern: {e}"))
});

/// A text template with named placeholders
///
/// # Examples
///
/// ```
/// use crew_prompt::{Template, Variables};
///
/// let template = Template::new("Report on {company} as {{markdown}}");
/// assert_eq!(template.placeholders(), vec!["company"]);
///
/// let vars = Variables::from([("company".to_string(), "NET".to_string())]);
/// assert_eq!(template.render(&vars).unwrap(), "Report on NET as {markdown}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    source: String,
}

impl Template {
    /// Wrap raw template text
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The raw, unrendered text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of first appearance, without duplicates
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in TOKEN.captures_iter(&self.source) {
            if let Some(name) = caps.get(1).map(|m| m.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Render the template, failing on the first placeholder without a value
    pub fn render(&self, vars: &Variables) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut last = 0;

        for caps in TOKEN.captures_iter(&self.source) {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            out.push_str(&self.source[last..whole.start]);
            out.push_str(&substitute(&caps, vars)?);
            last = whole.end;
        }

        out.push_str(&self.source[last..]);
        Ok(out)
    }
}

fn substitute(caps: &Captures<'_>, vars: &Variables) -> Result<String> {
    match caps.get(1) {
        Some(name) => vars
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| PromptError::MissingPlaceholder {
                name: name.as_str().to_string(),
            }),
        None if &caps[0] == "{{" => Ok("{".to_string()),
        None => Ok("}".to_string()),
    }
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_every_occurrence() {
        let template = Template::new("{company} news; more {company} data");
        let out = template.render(&vars(&[("company", "AAPL")])).unwrap();
        assert_eq!(out, "AAPL news; more AAPL data");
    }

    #[test]
    fn test_missing_placeholder() {
        let template = Template::new("Analyze {company} over {period}");
        let err = template.render(&vars(&[("company", "AAPL")])).unwrap_err();
        assert_eq!(
            err,
            PromptError::MissingPlaceholder {
                name: "period".to_string()
            }
        );
        assert_eq!(err.to_string(), "missing value for placeholder '{period}'");
    }

    #[test]
    fn test_escaped_and_non_identifier_braces_are_literal() {
        let template = Template::new("{{company}} {not valid} {1} {company}");
        let out = template.render(&vars(&[("company", "NET")])).unwrap();
        assert_eq!(out, "{company} {not valid} {1} NET");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let template = Template::new("{company}");
        let out = template.render(&vars(&[("company", "{other}")])).unwrap();
        assert_eq!(out, "{other}");
    }

    #[test]
    fn test_placeholders_deduplicated_in_order() {
        let template = Template::new("{b} {a} {b} {{c}}");
        assert_eq!(template.placeholders(), vec!["b", "a"]);
    }

    #[test]
    fn test_plain_text_renders_unchanged() {
        let template = Template::new("no placeholders at all");
        assert_eq!(template.render(&Variables::new()).unwrap(), "no placeholders at all");
    }

    #[test]
    fn test_serde_transparent() {
        let template: Template = serde_json::from_str(r#""Hello {name}""#).unwrap();
        assert_eq!(template.source(), "Hello {name}");
    }
}
