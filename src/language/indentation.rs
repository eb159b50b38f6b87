//! Indentation and enter-key rules for XML and XSL documents
//!
//! Two views of the same rules:
//! - [`LanguageConfiguration`] is what the host installs. Its patterns are in the
//!   host's ECMAScript regex dialect and serialize as `{ "pattern", "flags" }`.
//! - [`IndentRules`] evaluates the rules in Rust. The `regex` crate has no
//!   look-around or back-references, so those parts of the increase pattern are
//!   checked in code.
//!
//! The host patterns carry no `u` flag: `\w`, `\b` and case folding are ASCII-only
//! there. The Rust regexes spell out ASCII classes instead of relying on the
//! crate's Unicode defaults, and the decrease rule's `\b` is expanded to "the
//! name run contains an ASCII word character".

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const INCREASE_INDENT_PATTERN: &str = r#"<(?!\?|[^>]*\/>)([-_\.A-Za-z0-9]+)(?=\s|>)\b[^>]*>(?!.*<\/\1>)|<!--(?!.*-->)|\{[^}"']*$"#;
const DECREASE_INDENT_PATTERN: &str = r"^\s*(<\/[-_\.A-Za-z0-9]+\b[^>]*>|-->|\})";
const TAG_PAIR_BEFORE_PATTERN: &str = r"<([_:\w][_:\w-.\d]*)([^/>]*(?!/)>)[^<]*$";
const TAG_PAIR_AFTER_PATTERN: &str = r"^<\/([_:\w][_:\w-.\d]*)\s*>";
const OPEN_TAG_BEFORE_PATTERN: &str = r"<(\w[\w\d]*)([^/>]*(?!/)>)[^<]*$";

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-_.A-Za-z0-9]+").expect("valid tag name regex"));
static OPEN_BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{[^}"']*$"#).expect("valid open brace regex"));
static DECREASE_INDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(</[-.]*[_A-Za-z0-9][-_.A-Za-z0-9]*[^>]*>|-->|\})")
        .expect("valid decrease indent regex")
});
static TAG_PAIR_BEFORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([_:A-Za-z0-9][_:A-Za-z0-9\-.]*)([^/>]*>)[^<]*$")
        .expect("valid tag pair regex")
});
static TAG_PAIR_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^</([_:A-Za-z0-9][_:A-Za-z0-9\-.]*)\s*>").expect("valid closing tag regex")
});
static OPEN_TAG_BEFORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z0-9_][A-Za-z0-9_]*)([^/>]*>)[^<]*$").expect("valid open tag regex")
});

/// What the editor does with the line created by Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IndentAction {
    None,
    Indent,
    /// Indent the new line and push the text after the cursor to an outdented line
    IndentOutdent,
    Outdent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub pattern: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<&'static str>,
}

impl Pattern {
    const fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            flags: None,
        }
    }

    const fn case_insensitive(pattern: &'static str) -> Self {
        Self {
            pattern,
            flags: Some("i"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndentationRules {
    pub increase_indent_pattern: Pattern,
    pub decrease_indent_pattern: Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterAction {
    pub indent_action: IndentAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnEnterRule {
    pub before_text: Pattern,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_text: Option<Pattern>,
    pub action: EnterAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfiguration {
    pub indentation_rules: IndentationRules,
    pub on_enter_rules: Vec<OnEnterRule>,
}

/// Returns the configuration shared by the `xml` and `xsl` languages.
/// Rules are listed in evaluation order; the first matching enter rule wins.
pub fn indentation_rules() -> LanguageConfiguration {
    LanguageConfiguration {
        indentation_rules: IndentationRules {
            increase_indent_pattern: Pattern::new(INCREASE_INDENT_PATTERN),
            decrease_indent_pattern: Pattern::new(DECREASE_INDENT_PATTERN),
        },
        on_enter_rules: vec![
            OnEnterRule {
                before_text: Pattern::case_insensitive(TAG_PAIR_BEFORE_PATTERN),
                after_text: Some(Pattern::case_insensitive(TAG_PAIR_AFTER_PATTERN)),
                action: EnterAction {
                    indent_action: IndentAction::IndentOutdent,
                },
            },
            OnEnterRule {
                before_text: Pattern::case_insensitive(OPEN_TAG_BEFORE_PATTERN),
                after_text: None,
                action: EnterAction {
                    indent_action: IndentAction::Indent,
                },
            },
        ],
    }
}

/// Evaluates the XML indentation rules against editor text
pub struct IndentRules;

impl IndentRules {
    /// True when the line should indent the line that follows it
    pub fn increases_indent(line: &str) -> bool {
        opens_unclosed_tag(line) || opens_unclosed_comment(line) || OPEN_BRACE.is_match(line)
    }

    /// True when the line should be outdented relative to the previous one
    pub fn decreases_indent(line: &str) -> bool {
        DECREASE_INDENT.is_match(line)
    }

    /// Action for Enter pressed with `before` left of the cursor and `after` right of it
    pub fn on_enter(before: &str, after: &str) -> Option<IndentAction> {
        if TAG_PAIR_BEFORE.is_match(before) && TAG_PAIR_AFTER.is_match(after) {
            return Some(IndentAction::IndentOutdent);
        }
        if OPEN_TAG_BEFORE.is_match(before) {
            return Some(IndentAction::Indent);
        }
        None
    }
}

/// An opening tag that is neither a processing instruction, self-closing, nor
/// closed again later on the same line.
fn opens_unclosed_tag(line: &str) -> bool {
    line.match_indices('<').any(|(start, _)| {
        let rest = &line[start + 1..];
        if rest.starts_with('?') {
            return false;
        }

        let Some(close) = rest.find('>') else {
            return false;
        };
        if rest[..close].ends_with('/') {
            return false;
        }

        let Some(name) = TAG_NAME.find(rest) else {
            return false;
        };
        let name = name.as_str();

        // Name must end on a word boundary followed by whitespace or '>'
        let terminated = rest[name.len()..]
            .chars()
            .next()
            .is_some_and(|c| c == '>' || c.is_whitespace());
        let word_end = name
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if !terminated || !word_end {
            return false;
        }

        !rest[close + 1..].contains(&format!("</{}>", name))
    })
}

fn opens_unclosed_comment(line: &str) -> bool {
    line.match_indices("<!--")
        .any(|(start, open)| !line[start + open.len()..].contains("-->"))
}
