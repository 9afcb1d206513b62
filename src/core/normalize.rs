//! Response normalization: strips HTML and Markdown artifacts from AI output
//! so the text can be printed verbatim.
//!
//! The step chain is applied until the text stops changing, which makes
//! `normalize(normalize(s)) == normalize(s)` hold even when one step uncovers
//! markup for an earlier one (e.g. `> # Title`).

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

struct Patterns {
    line_break: Regex,
    html_tag: Regex,
    table_separator: Regex,
    bold: Regex,
    italic_star: Regex,
    italic_underscore: Regex,
    header: Regex,
    link: Regex,
    code_fence: Regex,
    inline_code: Regex,
    blockquote: Regex,
    bullet: Regex,
    horizontal_rule: Regex,
    spaces: Regex,
    blank_lines: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("normalizer patterns are valid")
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        line_break: compile(r"(?i)<br\s*/?>"),
        html_tag: compile(r"(?s)<!--.*?-->|<[/!]?[A-Za-z][^<>]*>"),
        table_separator: compile(r"(?m)^[ \t]*\|[ \t:|-]*-[ \t:|-]*\|[ \t]*$"),
        bold: compile(r"\*\*(.+?)\*\*|__(.+?)__"),
        italic_star: compile(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*"),
        italic_underscore: compile(r"\b_([^_\s](?:[^_\n]*[^_\s])?)_\b"),
        header: compile(r"(?m)^[ \t]*(?:#+[ \t]+)+"),
        link: compile(r"!?\[([^\[\]\n]*)\]\([^()\n]*\)"),
        code_fence: compile(r"(?m)^[ \t]*(?:```|~~~).*$"),
        inline_code: compile(r"`([^`\n]*)`"),
        blockquote: compile(r"(?m)^(?:[ \t]*>[ \t]?)+"),
        bullet: compile(r"(?m)^([ \t]*)[-*][ \t]+"),
        horizontal_rule: compile(r"(?m)^[ \t]*(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$"),
        spaces: compile(r"[ \t]{2,}"),
        blank_lines: compile(r"\n[ \t]*\n(?:[ \t]*\n)+"),
    })
}

fn replace(re: &Regex, text: String, replacement: &str) -> String {
    if re.is_match(&text) {
        re.replace_all(&text, replacement).into_owned()
    } else {
        text
    }
}

/// Delete matches until none are left. Removing an inner tag can form a new one (`<<b>b>`).
fn remove_all(re: &Regex, mut text: String) -> String {
    while re.is_match(&text) {
        text = re.replace_all(&text, "").into_owned();
    }
    text
}

/// One pass of the ordered substitution chain.
fn normalize_once(raw: &str) -> String {
    let p = patterns();
    let text = raw.replace("\r\n", "\n");

    let text = replace(&p.line_break, text, "\n");
    let text = remove_all(&p.html_tag, text);

    let text = replace(&p.table_separator, text, "");
    let text = text.replace('|', " ");
    // Rules go before emphasis and bullets, which would otherwise eat `***` and `* * *`.
    let text = replace(&p.horizontal_rule, text, "");

    let text = replace(&p.bold, text, "${1}${2}");
    let text = replace(&p.italic_star, text, "${1}");
    let text = replace(&p.italic_underscore, text, "${1}");

    let text = replace(&p.header, text, "");
    let text = replace(&p.link, text, "${1}");

    let text = replace(&p.code_fence, text, "");
    let text = replace(&p.inline_code, text, "${1}");

    let text = replace(&p.blockquote, text, "");
    let text = replace(&p.bullet, text, "${1}• ");

    let text = replace(&p.spaces, text, " ");
    let text = replace(&p.blank_lines, text, "\n\n");

    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Normalize raw AI output into plain display text.
///
/// Never fails; the empty string normalizes to the empty string.
pub fn normalize(raw: &str) -> String {
    // A pass that changes the text either shortens it or replaces a `|` or
    // bullet marker without adding new ones, so this reaches a fixpoint.
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Normalize a JSON value taken from a response body.
/// `null` becomes the empty string; non-string values use their JSON text.
pub fn normalize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => normalize(s),
        other => normalize(&other.to_string()),
    }
}
