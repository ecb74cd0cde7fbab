//! Row and detail templates.
//!
//! A template is literal text with `{{ ... }}` actions. An action is either a
//! field reference (`.Branch`) or a quoted string literal (`"▶"`), followed by
//! any number of `| formatter` pipes applied left to right:
//!
//! ```text
//! {{"▶" | cyan}} [ {{.Branch | cyan}} | {{.Status | status}} ] {{.Pipeline}}
//! ```
//!
//! Templates are parsed once, when [`Templates::new`] is called, and every
//! formatter they name must exist in the [`FormatterRegistry`]. Field names are
//! only resolved at render time, against whatever implements [`Fields`]; an
//! unknown field turns that one rendering into an error message instead of
//! failing the session.

use crate::domain::error::{BeaverError, Result};
use crate::domain::record::Fields;
use crate::ui::theme::Theme;
use crate::TemplateConfig;
use std::collections::HashMap;
use std::fmt;

/// Row template for the item under the cursor.
pub const DEFAULT_ACTIVE: &str =
    r#"{{"▶" | cyan}} [ {{.Branch | cyan}} | {{.Status | status}} ] {{.Pipeline | cyan}} "#;

/// Row template for every other visible item.
pub const DEFAULT_INACTIVE: &str = "  [ {{.Branch}} | {{.Status}} ] {{.Pipeline}}";

/// Detail panel template for the item under the cursor.
pub const DEFAULT_DETAILS: &str = r#"
{{"---------------------------------------------" | blue}}
Message: {{.Message}}
Branch:  {{.Branch}}
Status:  {{.Status | status}}
Age:     {{.Elapsed}}
Commit:  {{.Commit}}
Creator: {{.Creator}} ({{.CreatorEmail}})
Started: {{.CreatedAt}}
ENV:     {{.ENV}}
"#;

type Formatter = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Named string transformations available to templates.
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Formatter>,
}

impl FormatterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `formatter` under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, formatter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.formatters.insert(name.into(), Box::new(formatter));
    }

    /// Whether a formatter named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Applies the formatter `name`, or returns `text` unchanged if it is unknown.
    #[must_use]
    pub fn apply(&self, name: &str, text: &str) -> String {
        self.formatters
            .get(name)
            .map_or_else(|| text.to_string(), |format| format(text))
    }

    /// Registry with the colour formatters drawn from `theme`.
    ///
    /// Provides `cyan`, `blue`, `green`, `red`, `yellow`, `magenta`, `bold`,
    /// `dim`, and `status`, which colours a build state by its outcome.
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        let mut registry = Self::new();
        let colors = &theme.colors;

        for (name, hex) in [
            ("cyan", &colors.cyan),
            ("blue", &colors.blue),
            ("green", &colors.green),
            ("red", &colors.red),
            ("yellow", &colors.yellow),
            ("magenta", &colors.magenta),
        ] {
            let hex = hex.clone();
            registry.register(name, move |text| Theme::paint(&hex, text));
        }

        registry.register("bold", |text| format!("{}{text}{}", Theme::bold(), Theme::reset()));

        let dim = colors.text_dim.clone();
        registry.register("dim", move |text| Theme::paint(&dim, text));

        let status_theme = theme.clone();
        registry.register("status", move |text| {
            status_theme
                .status_color(text)
                .map_or_else(|| text.to_string(), |hex| Theme::paint(hex, text))
        });

        registry
    }

    /// Registry with the same names as [`from_theme`](Self::from_theme) but no
    /// styling, for pipes and tests.
    #[must_use]
    pub fn plain() -> Self {
        let mut registry = Self::new();
        for name in ["cyan", "blue", "green", "red", "yellow", "magenta", "bold", "dim", "status"] {
            registry.register(name, str::to_string);
        }
        registry
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FormatterRegistry").field("formatters", &names).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Field(String),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Action { value: Value, pipes: Vec<String> },
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source`.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Template`] for an unclosed `{{`, an empty action,
    /// an unterminated string literal, a malformed field reference or an
    /// empty pipe.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Text(rest[..open].to_string()));
            }
            let after = &rest[open + 2..];
            let close = find_close(after)
                .ok_or_else(|| template_error(format!("unclosed action in {source:?}")))?;
            segments.push(parse_action(&after[..close])?);
            rest = &after[close + 2..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Formatter names used by this template, in order of appearance.
    pub fn formatters(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Action { pipes, .. } => Some(pipes),
                Segment::Text(_) => None,
            })
            .flatten()
            .map(String::as_str)
    }

    /// Renders the template for `item`.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Template`] if a referenced field does not exist.
    pub fn render<T: Fields + ?Sized>(&self, item: &T, registry: &FormatterRegistry) -> Result<String> {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Action { value, pipes } => {
                    let mut text = match value {
                        Value::Literal(lit) => lit.clone(),
                        Value::Field(name) => item
                            .field(name)
                            .ok_or_else(|| template_error(format!("can't evaluate field {name}")))?
                            .into_owned(),
                    };
                    for pipe in pipes {
                        text = registry.apply(pipe, &text);
                    }
                    out.push_str(&text);
                }
            }
        }

        Ok(out)
    }
}

/// Finds the `}}` closing an action, skipping over string literals.
fn find_close(action: &str) -> Option<usize> {
    let bytes = action.as_bytes();
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'}' if !in_string && bytes.get(i + 1) == Some(&b'}') => return Some(i),
            _ => {}
        }
        i += 1;
    }

    None
}

fn parse_action(body: &str) -> Result<Segment> {
    let body = body.trim();
    if body.is_empty() {
        return Err(template_error("empty action {{}}".to_string()));
    }

    let (value, rest) = if let Some(quoted) = body.strip_prefix('"') {
        let (lit, rest) = parse_string(quoted)
            .ok_or_else(|| template_error(format!("unterminated string in {{{{{body}}}}}")))?;
        (Value::Literal(lit), rest)
    } else {
        let end = body.find('|').unwrap_or(body.len());
        let token = body[..end].trim();
        let name = token
            .strip_prefix('.')
            .filter(|name| is_identifier(name))
            .ok_or_else(|| template_error(format!("expected .Field or \"text\", found {token:?}")))?;
        (Value::Field(name.to_string()), &body[end..])
    };

    let rest = rest.trim();
    let pipes = if rest.is_empty() {
        Vec::new()
    } else {
        let rest = rest
            .strip_prefix('|')
            .ok_or_else(|| template_error(format!("unexpected {rest:?} in action")))?;
        rest.split('|')
            .map(|pipe| {
                let pipe = pipe.trim();
                if is_identifier(pipe) {
                    Ok(pipe.to_string())
                } else {
                    Err(template_error(format!("invalid formatter name {pipe:?}")))
                }
            })
            .collect::<Result<Vec<_>>>()?
    };

    Ok(Segment::Action { value, pipes })
}

/// Reads a string literal body up to its closing quote, handling `\"` and `\\`.
fn parse_string(input: &str) -> Option<(String, &str)> {
    let mut out = String::new();
    let mut chars = input.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Some((out, &input[idx + 1..])),
            '\\' => match chars.next()? {
                (_, 'n') => out.push('\n'),
                (_, 't') => out.push('\t'),
                (_, other) => out.push(other),
            },
            _ => out.push(c),
        }
    }

    None
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn template_error(message: String) -> BeaverError {
    BeaverError::Template(message)
}

/// The three templates of a session together with their formatters.
#[derive(Debug)]
pub struct Templates {
    active: Template,
    inactive: Template,
    details: Template,
    formatters: FormatterRegistry,
}

impl Templates {
    /// Parses the configured templates and checks their formatters exist.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Template`] naming the template that failed to
    /// parse or the formatter that is not registered.
    pub fn new(config: &TemplateConfig, formatters: FormatterRegistry) -> Result<Self> {
        let parse = |which: &str, source: &str| -> Result<Template> {
            let template = Template::parse(source).map_err(|e| match e {
                BeaverError::Template(msg) => template_error(format!("{which} template: {msg}")),
                other => other,
            })?;
            if let Some(unknown) = template.formatters().find(|name| !formatters.contains(name)) {
                return Err(template_error(format!(
                    "{which} template: unknown formatter {unknown:?}"
                )));
            }
            Ok(template)
        };

        let active = parse("active", &config.active)?;
        let inactive = parse("inactive", &config.inactive)?;
        let details = parse("details", &config.details)?;

        Ok(Self {
            active,
            inactive,
            details,
            formatters,
        })
    }

    /// Renders a list row. A rendering error is returned as the row text.
    #[must_use]
    pub fn render_row<T: Fields + ?Sized>(&self, item: &T, active: bool) -> String {
        let template = if active { &self.active } else { &self.inactive };
        template
            .render(item, &self.formatters)
            .unwrap_or_else(|err| err.to_string())
    }

    /// Renders the detail panel, one entry per output line.
    #[must_use]
    pub fn render_details<T: Fields + ?Sized>(&self, item: &T) -> Vec<String> {
        match self.details.render(item, &self.formatters) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(err) => vec![err.to_string()],
        }
    }

    /// Formatters available to the templates, for styling the frame chrome.
    #[must_use]
    pub const fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Build;

    fn build() -> Build {
        Build {
            pipeline: "lexer".into(),
            branch: "main".into(),
            status: "failed".into(),
            message: "Fix tokenizer\n\nCloses #12".into(),
            creator: "Ada".into(),
            creator_email: "ada@example.com".into(),
            ..Build::default()
        }
    }

    fn render(source: &str) -> Result<String> {
        Template::parse(source)?.render(&build(), &FormatterRegistry::plain())
    }

    #[test]
    fn renders_fields_and_literals() {
        assert_eq!(
            render(r#"{{"▶"}} [ {{.Branch}} | {{ .Status }} ] {{.Pipeline}}"#).unwrap(),
            "▶ [ main | failed ] lexer"
        );
        assert_eq!(render("no actions").unwrap(), "no actions");
        assert_eq!(render("").unwrap(), "");
    }

    #[test]
    fn pipes_apply_left_to_right() {
        let mut registry = FormatterRegistry::new();
        registry.register("upper", |s| s.to_uppercase());
        registry.register("wrap", |s| format!("<{s}>"));

        let template = Template::parse("{{.Branch | upper | wrap}}").unwrap();
        assert_eq!(template.render(&build(), &registry).unwrap(), "<MAIN>");
        assert_eq!(template.formatters().collect::<Vec<_>>(), ["upper", "wrap"]);
    }

    #[test]
    fn string_literals_may_contain_pipes_and_braces() {
        assert_eq!(render(r#"{{"a | }} b" | cyan}}"#).unwrap(), "a | }} b");
        assert_eq!(render(r#"{{"say \"hi\""}}"#).unwrap(), "say \"hi\"");
    }

    #[test]
    fn malformed_templates_are_rejected() {
        for source in [
            "{{.Branch",
            "{{}}",
            "{{ Branch }}",
            "{{.}}",
            r#"{{"open}}"#,
            "{{.Branch |}}",
            "{{.Branch | two words}}",
            "{{.Branch extra}}",
        ] {
            assert!(
                matches!(Template::parse(source), Err(BeaverError::Template(_))),
                "{source:?} should not parse"
            );
        }
    }

    #[test]
    fn unknown_field_is_a_render_error() {
        let err = render("{{.Nope}}").unwrap_err();
        assert!(err.to_string().contains("Nope"));
    }

    #[test]
    fn unknown_formatter_fails_construction() {
        let config = TemplateConfig {
            active: "{{.Branch | sparkle}}".into(),
            ..TemplateConfig::default()
        };
        let err = Templates::new(&config, FormatterRegistry::plain()).unwrap_err();
        assert!(err.to_string().contains("sparkle"));
        assert!(err.to_string().contains("active"));
    }

    #[test]
    fn default_templates_render() {
        let templates = Templates::new(&TemplateConfig::default(), FormatterRegistry::plain()).unwrap();

        assert_eq!(templates.render_row(&build(), false), "  [ main | failed ] lexer");
        assert_eq!(templates.render_row(&build(), true), "▶ [ main | failed ] lexer ");

        let details = templates.render_details(&build());
        assert_eq!(details[0], "");
        assert!(details.contains(&"Message: Fix tokenizer".to_string()));
        assert!(details.contains(&"Closes #12".to_string()));
        assert!(details.contains(&"Creator: Ada (ada@example.com)".to_string()));
    }

    #[test]
    fn row_errors_become_text() {
        let config = TemplateConfig {
            inactive: "{{.Missing}}".into(),
            ..TemplateConfig::default()
        };
        let templates = Templates::new(&config, FormatterRegistry::plain()).unwrap();
        assert!(templates.render_row(&build(), false).contains("Missing"));
    }

    #[test]
    fn themed_status_colours_by_outcome() {
        let theme = Theme::basic();
        let registry = FormatterRegistry::from_theme(&theme);

        assert_eq!(registry.apply("status", "failed"), Theme::paint(&theme.colors.red, "failed"));
        assert_eq!(registry.apply("status", "skipped"), "skipped");
        assert_eq!(registry.apply("cyan", "x"), Theme::paint(&theme.colors.cyan, "x"));
        assert_eq!(registry.apply("unregistered", "x"), "x");
        assert!(format!("{registry:?}").contains("status"));
    }
}
