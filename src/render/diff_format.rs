//! Small and large value diff rendering
//!
//! Small values render inline so they can live inside a table cell; large
//! values get a dedicated block. The Compact format sticks to plain
//! Markdown (`+`/`-` markers, fenced blocks); the Styled format emits
//! inline HTML with background-colored line and span highlights for
//! renderers that support it. A fenced block is never emitted inside a
//! table cell.

use crate::diff::{diff_lines, LineDiffEntry, LineTag};
use crate::options::DiffFormat;
use crate::render::markdown::{escape_html, escape_table_cell};

const REMOVED_LINE_STYLE: &str = "background-color: #fff5f5; border-left: 3px solid #d73a49; \
     color: #24292e; display: block; padding-left: 8px; margin-left: 0;";
const ADDED_LINE_STYLE: &str = "background-color: #f0fff4; border-left: 3px solid #28a745; \
     color: #24292e; display: block; padding-left: 8px; margin-left: 0;";
const REMOVED_HIGHLIGHT_COLOR: &str = "#ffc0c0";
const ADDED_HIGHLIGHT_COLOR: &str = "#acf2bd";

/// Render a short before/after pair for a table cell.
///
/// Equal values render as the value itself; differing values render as a
/// line-broken diff, never as a fenced block.
pub fn render_small_diff(before: Option<&str>, after: Option<&str>, format: DiffFormat) -> String {
    let before_value = before.unwrap_or("");
    let after_value = after.unwrap_or("");

    if before_value.is_empty() && after_value.is_empty() {
        return String::new();
    }

    if before_value == after_value {
        return match format {
            DiffFormat::Compact => escape_table_cell(after_value),
            DiffFormat::Styled => format!("<code>{}</code>", escape_table_cell(after_value)),
        };
    }

    match format {
        DiffFormat::Compact => format!(
            "- {}<br>+ {}",
            escape_table_cell(before_value),
            escape_table_cell(after_value)
        ),
        DiffFormat::Styled => build_inline_diff_cell(before_value, after_value),
    }
}

/// Render a large (multi-line or long) value change as a block.
///
/// When only one side exists the value renders verbatim in a fenced
/// block, with JSON/XML detected and pretty-printed. When both sides
/// exist, both are normalized the same way before diffing so the diff
/// aligns on structural boundaries.
pub fn render_large_diff(before: Option<&str>, after: Option<&str>, format: DiffFormat) -> String {
    let before_value = before.filter(|value| !value.trim().is_empty());
    let after_value = after.filter(|value| !value.trim().is_empty());

    match (before_value, after_value) {
        (None, None) => String::new(),
        (Some(value), None) | (None, Some(value)) => {
            let (content, language) = normalize_structured_value(value);
            code_fence(&content, language)
        }
        (Some(before_value), Some(after_value)) => {
            let (diff_before, _) = normalize_structured_value(before_value);
            let (diff_after, _) = normalize_structured_value(after_value);

            match format {
                DiffFormat::Compact => build_diff_fence(&diff_before, &diff_after),
                DiffFormat::Styled => build_inline_diff_block(&diff_before, &diff_after),
            }
        }
    }
}

/// Build a fenced `diff` block from the line diff of two values.
fn build_diff_fence(before: &str, after: &str) -> String {
    let mut output = String::from("```diff\n");

    for entry in diff_lines(before, after) {
        match entry.tag {
            LineTag::Unchanged => output.push_str(&entry.text),
            LineTag::Removed => {
                output.push_str("- ");
                output.push_str(&entry.text);
            }
            LineTag::Added => {
                output.push_str("+ ");
                output.push_str(&entry.text);
            }
        }
        output.push('\n');
    }

    output.push_str("```");
    output
}

/// Build a preformatted HTML block with styled line-level changes.
fn build_inline_diff_block(before: &str, after: &str) -> String {
    let entries = diff_lines(before, after);
    let mut output = String::from("<pre style=\"font-family: monospace; line-height: 1.5;\"><code>");

    for line in styled_lines(&entries) {
        output.push_str(&line);
        output.push('\n');
    }

    output.push_str("</code></pre>");
    output
}

/// Inline variant of the styled diff, safe for table cells.
fn build_inline_diff_cell(before: &str, after: &str) -> String {
    let entries = diff_lines(before, after);
    let lines: Vec<String> = styled_lines(&entries)
        .into_iter()
        .map(|line| line.replace("display: block;", "display: inline-block;"))
        .collect();

    format!(
        "<code style=\"display:block; white-space:normal; padding:0; margin:0;\">{}</code>",
        lines.join("<br>")
    )
}

/// Render diff entries as one styled HTML fragment per line.
///
/// A removed line directly followed by an added line is treated as an
/// edit pair and gets an intra-line highlight over the changed span.
fn styled_lines(entries: &[LineDiffEntry]) -> Vec<String> {
    let mut lines = Vec::with_capacity(entries.len());
    let mut index = 0;

    while index < entries.len() {
        let entry = &entries[index];
        match entry.tag {
            LineTag::Unchanged => {
                lines.push(escape_html(&entry.text));
                index += 1;
            }
            LineTag::Removed => {
                if let Some(next) = entries.get(index + 1) {
                    if next.tag == LineTag::Added {
                        lines.push(styled_line_with_highlight(&entry.text, &next.text, true));
                        lines.push(styled_line_with_highlight(&next.text, &entry.text, false));
                        index += 2;
                        continue;
                    }
                }
                lines.push(styled_line(&entry.text, true));
                index += 1;
            }
            LineTag::Added => {
                lines.push(styled_line(&entry.text, false));
                index += 1;
            }
        }
    }

    lines
}

fn styled_line(line: &str, removed: bool) -> String {
    let (style, marker) = line_decoration(removed);
    format!("<span style=\"{style}\">{marker}{}</span>", escape_html(line))
}

fn styled_line_with_highlight(line: &str, other_line: &str, removed: bool) -> String {
    let (style, marker) = line_decoration(removed);
    let highlight_color = if removed {
        REMOVED_HIGHLIGHT_COLOR
    } else {
        ADDED_HIGHLIGHT_COLOR
    };

    let body = match changed_span(line, other_line) {
        Some((start, end)) => format!(
            "{}<span style=\"background-color: {highlight_color}; color: #24292e;\">{}</span>{}",
            escape_html(&line[..start]),
            escape_html(&line[start..end]),
            escape_html(&line[end..])
        ),
        None => escape_html(line),
    };

    format!("<span style=\"{style}\">{marker}{body}</span>")
}

fn line_decoration(removed: bool) -> (&'static str, &'static str) {
    if removed {
        (REMOVED_LINE_STYLE, "- ")
    } else {
        (ADDED_LINE_STYLE, "+ ")
    }
}

/// Find the changed byte span of `line` against `other` by trimming the
/// common prefix and suffix.
///
/// Returns `None` when the lines share no usable prefix or suffix (the
/// whole line differs — highlighting everything would say nothing) or
/// when the change is a pure insertion into the other line.
fn changed_span(line: &str, other: &str) -> Option<(usize, usize)> {
    if line == other || line.is_empty() {
        return None;
    }

    let prefix: usize = line
        .chars()
        .zip(other.chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum();

    let suffix: usize = line[prefix..]
        .chars()
        .rev()
        .zip(other[prefix.min(other.len())..].chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum();

    let start = prefix;
    let end = line.len() - suffix;

    if start >= end {
        return None;
    }

    if start == 0 && end == line.len() {
        return None;
    }

    Some((start, end))
}

/// Detect JSON or XML content and pretty-print it for diffing.
///
/// Content that is already formatted (has indented continuation lines)
/// passes through unchanged so hand-formatted values keep their shape.
fn normalize_structured_value(value: &str) -> (String, Option<&'static str>) {
    if let Some(formatted) = try_format_json(value) {
        return (formatted, Some("json"));
    }

    if let Some(formatted) = try_format_xml(value) {
        return (formatted, Some("xml"));
    }

    (value.to_string(), None)
}

fn try_format_json(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let parsed: serde_json::Value = serde_json::from_str(trimmed).ok()?;

    if is_already_formatted(trimmed) {
        Some(trimmed.to_string())
    } else {
        serde_json::to_string_pretty(&parsed).ok()
    }
}

fn try_format_xml(value: &str) -> Option<String> {
    use quick_xml::events::Event;
    use quick_xml::{Reader, Writer};

    let trimmed = value.trim();
    if !trimmed.starts_with('<') {
        return None;
    }

    let mut reader = Reader::from_str(trimmed);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let mut depth = 0usize;
    let mut saw_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                depth += 1;
                saw_element = true;
                writer.write_event(Event::Start(start)).ok()?;
            }
            Ok(Event::End(end)) => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                writer.write_event(Event::End(end)).ok()?;
            }
            Ok(Event::Empty(empty)) => {
                saw_element = true;
                writer.write_event(Event::Empty(empty)).ok()?;
            }
            Ok(Event::Text(text)) => {
                // Skip inter-element whitespace so re-indentation is clean
                if !text.as_ref().iter().all(|byte| byte.is_ascii_whitespace()) {
                    writer.write_event(Event::Text(text)).ok()?;
                }
            }
            Ok(event) => {
                writer.write_event(event).ok()?;
            }
            Err(_) => return None,
        }
    }

    if !saw_element || depth != 0 {
        return None;
    }

    if is_already_formatted(trimmed) {
        return Some(trimmed.to_string());
    }

    String::from_utf8(writer.into_inner()).ok()
}

fn is_already_formatted(content: &str) -> bool {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = normalized.split('\n');
    lines.next();

    lines.any(|line| line.starts_with(' ') || line.starts_with('\t'))
}

fn code_fence(content: &str, language: Option<&str>) -> String {
    format!("```{}\n{}\n```", language.unwrap_or(""), content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_diff_equal_compact() {
        assert_eq!(
            render_small_diff(Some("TCP"), Some("TCP"), DiffFormat::Compact),
            "TCP"
        );
    }

    #[test]
    fn test_small_diff_changed_compact() {
        assert_eq!(
            render_small_diff(Some("TCP"), Some("UDP"), DiffFormat::Compact),
            "- TCP<br>+ UDP"
        );
    }

    #[test]
    fn test_small_diff_escapes_each_side() {
        let rendered = render_small_diff(Some("a|b"), Some("c|d"), DiffFormat::Compact);

        assert_eq!(rendered, "- a\\|b<br>+ c\\|d");
    }

    #[test]
    fn test_small_diff_both_empty() {
        assert_eq!(render_small_diff(None, None, DiffFormat::Compact), "");
        assert_eq!(render_small_diff(Some(""), Some(""), DiffFormat::Styled), "");
    }

    #[test]
    fn test_small_diff_equal_styled_uses_code_tag() {
        assert_eq!(
            render_small_diff(Some("TCP"), Some("TCP"), DiffFormat::Styled),
            "<code>TCP</code>"
        );
    }

    #[test]
    fn test_small_diff_styled_never_uses_fence() {
        let rendered = render_small_diff(Some("TCP"), Some("UDP"), DiffFormat::Styled);

        assert!(!rendered.contains("```"));
        assert!(rendered.starts_with("<code style="));
        assert!(rendered.contains("<br>") || !rendered.contains('\n'));
        assert!(rendered.contains(REMOVED_HIGHLIGHT_COLOR) || rendered.contains(ADDED_HIGHLIGHT_COLOR));
    }

    #[test]
    fn test_large_diff_one_sided_create() {
        let rendered = render_large_diff(None, Some("line one\nline two"), DiffFormat::Compact);

        assert_eq!(rendered, "```\nline one\nline two\n```");
        assert!(!rendered.contains("+ "));
    }

    #[test]
    fn test_large_diff_one_sided_delete() {
        let rendered = render_large_diff(Some("old body"), None, DiffFormat::Compact);

        assert_eq!(rendered, "```\nold body\n```");
    }

    #[test]
    fn test_large_diff_detects_json() {
        let rendered = render_large_diff(None, Some("{\"a\":1,\"b\":[2,3]}"), DiffFormat::Compact);

        assert!(rendered.starts_with("```json\n"));
        assert!(rendered.contains("\"a\": 1"));
    }

    #[test]
    fn test_large_diff_keeps_preformatted_json() {
        let pretty = "{\n  \"a\": 1\n}";
        let rendered = render_large_diff(None, Some(pretty), DiffFormat::Compact);

        assert_eq!(rendered, format!("```json\n{pretty}\n```"));
    }

    #[test]
    fn test_large_diff_detects_xml() {
        let rendered = render_large_diff(None, Some("<root><item>1</item></root>"), DiffFormat::Compact);

        assert!(rendered.starts_with("```xml\n"));
        assert!(rendered.contains("<item>"));
    }

    #[test]
    fn test_large_diff_rejects_invalid_xml() {
        let rendered = render_large_diff(None, Some("<not closed\nat all"), DiffFormat::Compact);

        assert!(rendered.starts_with("```\n"));
    }

    #[test]
    fn test_large_diff_update_compact_is_diff_fence() {
        let rendered = render_large_diff(
            Some("common\nold"),
            Some("common\nnew"),
            DiffFormat::Compact,
        );

        assert_eq!(rendered, "```diff\ncommon\n- old\n+ new\n```");
    }

    #[test]
    fn test_large_diff_update_styled_is_pre_block() {
        let rendered = render_large_diff(
            Some("common\nold"),
            Some("common\nnew"),
            DiffFormat::Styled,
        );

        assert!(rendered.starts_with("<pre style="));
        assert!(rendered.ends_with("</code></pre>"));
        assert!(!rendered.contains("```"));
        assert!(rendered.contains("common\n"));
        assert!(rendered.contains("border-left: 3px solid #d73a49"));
        assert!(rendered.contains("border-left: 3px solid #28a745"));
    }

    #[test]
    fn test_styled_pair_highlights_changed_span() {
        let rendered = render_large_diff(
            Some("port = 80"),
            Some("port = 443"),
            DiffFormat::Styled,
        );

        // The shared "port = " prefix must not sit inside a highlight span
        assert!(rendered.contains(&format!("background-color: {REMOVED_HIGHLIGHT_COLOR}")));
        assert!(rendered.contains(&format!("background-color: {ADDED_HIGHLIGHT_COLOR}")));
    }

    #[test]
    fn test_styled_fully_different_lines_have_no_span_highlight() {
        let rendered = render_large_diff(Some("aaa"), Some("zzz"), DiffFormat::Styled);

        assert!(!rendered.contains(&format!("background-color: {REMOVED_HIGHLIGHT_COLOR}")));
        assert!(!rendered.contains(&format!("background-color: {ADDED_HIGHLIGHT_COLOR}")));
    }

    #[test]
    fn test_changed_span_prefix_suffix() {
        // Pure insertion into the other line: nothing to highlight here
        assert_eq!(changed_span("port = 80", "port = 8080"), None);
        // Prefix is trimmed first, so the extra "80" anchors at the tail
        assert_eq!(changed_span("port = 8080", "port = 80"), Some((9, 11)));
        assert_eq!(changed_span("abc", "abc"), None);
        assert_eq!(changed_span("axc", "ayc"), Some((1, 2)));
        assert_eq!(changed_span("abc", "xyz"), None);
    }

    #[test]
    fn test_changed_span_multibyte_safe() {
        let span = changed_span("a→c", "a←c");

        assert_eq!(span, Some((1, 4)));
    }

    #[test]
    fn test_whitespace_only_sides_count_as_absent() {
        assert_eq!(render_large_diff(Some("   "), Some("  \n "), DiffFormat::Compact), "");
        let rendered = render_large_diff(Some("  "), Some("value\nhere"), DiffFormat::Compact);
        assert_eq!(rendered, "```\nvalue\nhere\n```");
    }
}
