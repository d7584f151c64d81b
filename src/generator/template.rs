//! Named-placeholder text templates.
//!
//! Placeholders are `$name` or `${name}`; `$$` renders a literal `$`.
//! Rendering is pure substitution: anything conditional is decided by the
//! caller before the values map is built.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\}|(?P<invalid>))",
    )
    .expect("placeholder pattern is valid")
});

/// A template the caller failed to satisfy.
///
/// Either case is a programming error in whoever owns the template,
/// never a problem with user data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template placeholder `${name}` has no value")]
    MissingValue { name: String },

    #[error("invalid placeholder at line {line}, column {column}")]
    InvalidPlaceholder { line: usize, column: usize },
}

/// A parsed-on-demand template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    /// Create a template from its source text.
    pub fn new(source: impl Into<String>) -> Self {
        Template {
            source: source.into(),
        }
    }

    /// Names of every placeholder the template refers to.
    pub fn placeholders(&self) -> BTreeSet<&str> {
        PLACEHOLDER
            .captures_iter(&self.source)
            .filter_map(|caps| caps.name("named").or_else(|| caps.name("braced")))
            .map(|m| m.as_str())
            .collect()
    }

    /// Substitute every placeholder with its value from `values`.
    ///
    /// Extra entries in `values` are ignored.
    pub fn render(&self, values: &BTreeMap<&str, String>) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(self.source.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(&self.source) {
            let whole = caps.get(0).expect("group 0 always participates");
            output.push_str(&self.source[last..whole.start()]);
            output.push_str(self.substitution(&caps, values)?);
            last = whole.end();
        }

        output.push_str(&self.source[last..]);
        Ok(output)
    }

    fn substitution<'v>(
        &self,
        caps: &Captures<'_>,
        values: &'v BTreeMap<&str, String>,
    ) -> Result<&'v str, TemplateError> {
        if caps.name("escaped").is_some() {
            return Ok("$");
        }

        if let Some(name) = caps.name("named").or_else(|| caps.name("braced")) {
            return values
                .get(name.as_str())
                .map(String::as_str)
                .ok_or_else(|| TemplateError::MissingValue {
                    name: name.as_str().to_string(),
                });
        }

        let offset = caps.get(0).map(|m| m.start()).unwrap_or_default();
        let before = &self.source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = offset - before.rfind('\n').map(|i| i + 1).unwrap_or(0) + 1;
        Err(TemplateError::InvalidPlaceholder { line, column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, &str)]) -> BTreeMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_render_named_and_braced() {
        let template = Template::new("project($name)\nset(X ${value}_suffix)\n");
        let output = template
            .render(&values(&[("name", "app"), ("value", "42")]))
            .unwrap();
        assert_eq!(output, "project(app)\nset(X 42_suffix)\n");
    }

    #[test]
    fn test_escaped_dollar_is_literal() {
        let template = Template::new("include_directories(SYSTEM $${SYSTEM_DIRS})");
        assert_eq!(
            template.render(&BTreeMap::new()).unwrap(),
            "include_directories(SYSTEM ${SYSTEM_DIRS})"
        );
        assert!(template.placeholders().is_empty());
    }

    #[test]
    fn test_missing_value_fails() {
        let template = Template::new("project($component_name)");
        let err = template.render(&BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingValue {
                name: "component_name".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_placeholder_reports_position() {
        let template = Template::new("ok\ncost: $5");
        let err = template.render(&BTreeMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::InvalidPlaceholder { line: 2, column: 7 });
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let template = Template::new("$a");
        let output = template.render(&values(&[("a", "$b")])).unwrap();
        assert_eq!(output, "$b");
    }

    #[test]
    fn test_placeholders() {
        let template = Template::new("$a ${b} $$c $a");
        let names: Vec<_> = template.placeholders().into_iter().collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
