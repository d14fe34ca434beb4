//! Prompt templates.
//!
//! Templates use a small handlebars-like syntax:
//! - `{{name}}` is replaced by the argument value, or nothing when unset
//! - `{{#if name}}...{{/if}}` keeps its body only when `name` is non-empty
//! - `{{#if name}}...{{else}}...{{/if}}` picks one of two bodies
//!
//! Conditionals do not nest.

use rmcp::model::PromptArgument;
use std::collections::HashMap;

use super::error::PromptError;

const IF_OPEN: &str = "{{#if ";
const ELSE: &str = "{{else}}";
const END_IF: &str = "{{/if}}";

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the prompt.
    pub name: String,

    pub title: Option<String>,

    /// A description of what the prompt does.
    pub description: Option<String>,

    /// The arguments that this prompt accepts.
    pub arguments: Vec<PromptArgument>,

    pub template: String,
}

impl PromptTemplate {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        arguments: Vec<PromptArgument>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: None,
            description,
            arguments,
            template: template.into(),
        }
    }

    /// Render the template with the given arguments.
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
        let resolved = resolve_conditionals(&self.template, arguments)?;
        Ok(substitute(&resolved, arguments))
    }
}

fn is_set(arguments: &HashMap<String, String>, name: &str) -> bool {
    arguments.get(name).is_some_and(|v| !v.is_empty())
}

fn resolve_conditionals(
    template: &str,
    arguments: &HashMap<String, String>,
) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find(IF_OPEN) {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + IF_OPEN.len()..];

        let name_end = after_open
            .find("}}")
            .ok_or_else(|| PromptError::template("Unclosed {{#if}} tag"))?;
        let name = after_open[..name_end].trim();
        let body_and_rest = &after_open[name_end + 2..];

        let end = body_and_rest
            .find(END_IF)
            .ok_or_else(|| PromptError::template(format!("Missing {{{{/if}}}} for '{name}'")))?;
        let body = &body_and_rest[..end];

        let (then_branch, else_branch) = body.split_once(ELSE).unwrap_or((body, ""));
        out.push_str(if is_set(arguments, name) {
            then_branch
        } else {
            else_branch
        });

        rest = &body_and_rest[end + END_IF.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

fn substitute(template: &str, arguments: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        match after_open.find("}}") {
            Some(close) => {
                let key = after_open[..close].trim();
                if let Some(value) = arguments.get(key) {
                    out.push_str(value);
                }
                rest = &after_open[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_simple_substitution() {
        let template = PromptTemplate::new("test", None, vec![], "Hello, {{name}}!");
        let result = template.render(&args(&[("name", "World")])).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_value_is_not_reinterpreted() {
        let template = PromptTemplate::new("test", None, vec![], "Dir: {{directory}}");
        let result = template
            .render(&args(&[("directory", "/tmp/{{goal}}"), ("goal", "x")]))
            .unwrap();
        assert_eq!(result, "Dir: /tmp/{{goal}}");
    }

    #[test]
    fn test_conditional_with_value() {
        let template =
            PromptTemplate::new("test", None, vec![], "Hello{{#if name}}, {{name}}{{/if}}!");
        let result = template.render(&args(&[("name", "World")])).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_conditional_without_value() {
        let template =
            PromptTemplate::new("test", None, vec![], "Hello{{#if name}}, {{name}}{{/if}}!");
        assert_eq!(template.render(&HashMap::new()).unwrap(), "Hello!");
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let template = PromptTemplate::new("test", None, vec![], "a{{#if x}}b{{/if}}c");
        assert_eq!(template.render(&args(&[("x", "")])).unwrap(), "ac");
    }

    #[test]
    fn test_conditional_with_else() {
        let template = PromptTemplate::new(
            "test",
            None,
            vec![],
            "Hello, {{#if name}}{{name}}{{else}}stranger{{/if}}!",
        );
        assert_eq!(template.render(&HashMap::new()).unwrap(), "Hello, stranger!");
    }

    #[test]
    fn test_missing_end_if_is_an_error() {
        let template = PromptTemplate::new("test", None, vec![], "{{#if name}}oops");
        let err = template.render(&HashMap::new()).unwrap_err();
        assert!(matches!(err, PromptError::TemplateError(_)));
    }

    #[test]
    fn test_unset_placeholder_removed() {
        let template = PromptTemplate::new("test", None, vec![], "[{{missing}}]");
        assert_eq!(template.render(&HashMap::new()).unwrap(), "[]");
    }
}
