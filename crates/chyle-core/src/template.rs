//! Changelog templates
//!
//! A small logic-light template language rendered over JSON values:
//!
//! - `{{ .a.b }}` prints a value looked up from the current context
//!   (`{{ . }}` prints the context itself, `{{ $.a }}` looks up from the root)
//! - `{{ range .entries }}…{{ else }}…{{ end }}` iterates arrays and objects
//! - `{{ if .a }}…{{ else }}…{{ end }}` renders on truthiness
//!
//! Missing values render as empty strings.

use serde_json::Value;
use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Template parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// `{{` without a matching `}}`
    #[error("unterminated action at byte {0}")]
    UnterminatedAction(usize),

    /// Action that is neither a lookup nor a keyword
    #[error("invalid action \"{0}\"")]
    InvalidAction(String),

    /// `range`/`if` block without `end`
    #[error("missing {{{{ end }}}} for \"{0}\"")]
    Unclosed(String),

    /// `end` or `else` outside of a block
    #[error("unexpected \"{0}\"")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    Current,
    Root,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Lookup {
    scope: Scope,
    segments: Vec<String>,
}

impl Lookup {
    fn parse(expr: &str) -> Option<Self> {
        let (scope, rest) = if let Some(rest) = expr.strip_prefix('$') {
            (Scope::Root, rest)
        } else if expr.starts_with('.') {
            (Scope::Current, expr)
        } else {
            return None;
        };

        if rest.is_empty() || rest == "." {
            return Some(Self { scope, segments: Vec::new() });
        }

        let rest = rest.strip_prefix('.')?;
        let segments: Vec<String> = rest.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty() || s.contains(char::is_whitespace)) {
            return None;
        }
        Some(Self { scope, segments })
    }

    fn resolve<'a>(&self, root: &'a Value, current: &'a Value) -> Option<&'a Value> {
        let start = match self.scope {
            Scope::Current => current,
            Scope::Root => root,
        };
        lookup_path(start, self.segments.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Print(Lookup),
    Range {
        lookup: Lookup,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
    If {
        lookup: Lookup,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

enum Token<'a> {
    Text(&'a str),
    Action(&'a str),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse a template
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let tokens = tokenize(source)?;
        let mut tokens = tokens.into_iter();
        let (nodes, terminator) = parse_block(&mut tokens)?;
        if let Some(keyword) = terminator {
            return Err(TemplateError::Unexpected(keyword.to_string()));
        }
        Ok(Self { nodes })
    }

    /// Render against a JSON value
    pub fn render(&self, data: &Value) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, data, data, &mut out);
        out
    }
}

fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TemplateError> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    while let Some(start) = source[offset..].find(OPEN) {
        let start = offset + start;
        if start > offset {
            tokens.push(Token::Text(&source[offset..start]));
        }
        let inner = start + OPEN.len();
        let end = source[inner..]
            .find(CLOSE)
            .map(|e| inner + e)
            .ok_or(TemplateError::UnterminatedAction(start))?;
        tokens.push(Token::Action(source[inner..end].trim()));
        offset = end + CLOSE.len();
    }

    if offset < source.len() {
        tokens.push(Token::Text(&source[offset..]));
    }
    Ok(tokens)
}

/// Parse nodes until `end`/`else` or the end of input; returns the
/// terminating keyword, if any
fn parse_block<'a, I>(tokens: &mut I) -> Result<(Vec<Node>, Option<&'static str>), TemplateError>
where
    I: Iterator<Item = Token<'a>>,
{
    let mut nodes = Vec::new();

    while let Some(token) = tokens.next() {
        let action = match token {
            Token::Text(text) => {
                nodes.push(Node::Text(text.to_string()));
                continue;
            }
            Token::Action(action) => action,
        };

        match action {
            "end" => return Ok((nodes, Some("end"))),
            "else" => return Ok((nodes, Some("else"))),
            _ => {}
        }

        let (keyword, expr) = match action.split_once(char::is_whitespace) {
            Some((keyword @ ("range" | "if"), expr)) => (Some(keyword), expr.trim()),
            _ => (None, action),
        };

        let lookup =
            Lookup::parse(expr).ok_or_else(|| TemplateError::InvalidAction(action.to_string()))?;

        let Some(keyword) = keyword else {
            nodes.push(Node::Print(lookup));
            continue;
        };

        let (body, terminator) = parse_block(tokens)?;
        let otherwise = match terminator {
            Some("end") => Vec::new(),
            Some(_) => match parse_block(tokens)? {
                (otherwise, Some("end")) => otherwise,
                (_, Some(other)) => return Err(TemplateError::Unexpected(other.to_string())),
                (_, None) => return Err(TemplateError::Unclosed(action.to_string())),
            },
            None => return Err(TemplateError::Unclosed(action.to_string())),
        };

        nodes.push(if keyword == "range" {
            Node::Range { lookup, body, otherwise }
        } else {
            Node::If { lookup, body, otherwise }
        });
    }

    Ok((nodes, None))
}

fn render_nodes(nodes: &[Node], root: &Value, current: &Value, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Print(lookup) => {
                if let Some(value) = lookup.resolve(root, current) {
                    out.push_str(&display(value));
                }
            }
            Node::Range { lookup, body, otherwise } => {
                let items: Vec<&Value> = match lookup.resolve(root, current) {
                    Some(Value::Array(items)) => items.iter().collect(),
                    Some(Value::Object(map)) => map.values().collect(),
                    _ => Vec::new(),
                };
                if items.is_empty() {
                    render_nodes(otherwise, root, current, out);
                }
                for item in items {
                    render_nodes(body, root, item, out);
                }
            }
            Node::If { lookup, body, otherwise } => {
                if lookup.resolve(root, current).is_some_and(is_truthy) {
                    render_nodes(body, root, current, out);
                } else {
                    render_nodes(otherwise, root, current, out);
                }
            }
        }
    }
}

/// Follow a path of object keys and array indexes
pub fn lookup_path<'a, 'p>(
    value: &'a Value,
    segments: impl IntoIterator<Item = &'p str>,
) -> Option<&'a Value> {
    segments.into_iter().try_fold(value, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn changelog() -> Value {
        json!({
            "entries": [
                {"id": "abc", "message": "feat: one", "issue": {"key": "PRJ-1"}},
                {"id": "def", "message": "fix: two"}
            ],
            "metadata": {"version": "1.2.0"}
        })
    }

    #[test]
    fn test_render_range() {
        let template =
            Template::parse("{{ range .entries }}- {{ .message }} ({{ .id }})\n{{ end }}").unwrap();
        assert_eq!(
            template.render(&changelog()),
            "- feat: one (abc)\n- fix: two (def)\n"
        );
    }

    #[test]
    fn test_render_root_and_nested_lookup() {
        let template = Template::parse(
            "{{ range .entries }}{{ $.metadata.version }}:{{ .issue.key }};{{ end }}",
        )
        .unwrap();
        assert_eq!(template.render(&changelog()), "1.2.0:PRJ-1;1.2.0:;");
    }

    #[test]
    fn test_render_if_else() {
        let template = Template::parse(
            "{{ range .entries }}{{ if .issue }}[{{ .issue.key }}]{{ else }}[none]{{ end }}{{ end }}",
        )
        .unwrap();
        assert_eq!(template.render(&changelog()), "[PRJ-1][none]");
    }

    #[test]
    fn test_range_else_on_empty() {
        let template = Template::parse("{{ range .missing }}x{{ else }}empty{{ end }}").unwrap();
        assert_eq!(template.render(&changelog()), "empty");
    }

    #[test]
    fn test_array_index_lookup() {
        let template = Template::parse("{{ .entries.1.id }}").unwrap();
        assert_eq!(template.render(&changelog()), "def");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Template::parse("{{ .entries "),
            Err(TemplateError::UnterminatedAction(0))
        );
        assert!(matches!(
            Template::parse("{{ range .entries }}x"),
            Err(TemplateError::Unclosed(_))
        ));
        assert!(matches!(
            Template::parse("x{{ end }}"),
            Err(TemplateError::Unexpected(_))
        ));
        assert!(matches!(
            Template::parse("{{ entries }}"),
            Err(TemplateError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_plain_text() {
        let template = Template::parse("no actions here").unwrap();
        assert_eq!(template.render(&Value::Null), "no actions here");
    }
}
