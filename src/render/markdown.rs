//! Markdown escaping and whole-document normalization
//!
//! Generated values end up inside table cells and headings, where an
//! unescaped pipe or stray blank line breaks the surrounding structure.
//! Escaping happens per fragment; normalization runs once over the
//! assembled document.

/// Escape a value for use inside a Markdown table cell.
///
/// Backslash-escapes the characters that break tables or code spans,
/// entity-escapes `&`, and replaces newlines with `<br/>` so a cell can
/// never span rows.
pub fn escape_table_cell(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut value = input.replace('\\', "\\\\");
    value = value.replace('|', "\\|");
    value = value.replace('`', "\\`");
    value = value.replace('<', "\\<");
    value = value.replace('>', "\\>");
    value = value.replace('&', "&amp;");

    value = value.replace("\r\n", "<br/>");
    value = value.replace('\n', "<br/>");
    value = value.replace('\r', "<br/>");

    value
}

/// Escape text destined for a heading line.
///
/// Headings need the table-cell escapes plus the characters that carry
/// special meaning at heading level.
pub fn escape_heading(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut value = escape_table_cell(input);
    value = value.replace('#', "\\#");
    value = value.replace('[', "\\[");
    value = value.replace(']', "\\]");
    value = value.replace('*', "\\*");
    value = value.replace('_', "\\_");

    value
}

/// HTML-escape the characters that break inline HTML diff markup.
pub(crate) fn escape_html(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + value.len() / 10);

    for ch in value.chars() {
        match ch {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }

    result
}

/// Normalize an assembled Markdown document.
///
/// - collapses runs of 2+ blank lines to exactly one
/// - ensures exactly one blank line before and after each heading
/// - removes blank lines between consecutive table rows
/// - trims trailing blank lines and ends with exactly one newline
///
/// Fenced code block content passes through untouched. The pass is
/// idempotent: applying it to its own output changes nothing.
pub fn normalize_document(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;

    for line in &lines {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            result.push(line.to_string());
            continue;
        }

        if in_fence {
            result.push(line.to_string());
            continue;
        }

        if trimmed.is_empty() {
            // Collapse runs of blank lines
            if matches!(result.last(), Some(previous) if previous.trim().is_empty()) {
                continue;
            }
            result.push(String::new());
            continue;
        }

        if is_heading(trimmed) && !result.is_empty() {
            if let Some(previous) = result.last() {
                if !previous.trim().is_empty() {
                    result.push(String::new());
                }
            }
            result.push(line.to_string());
            continue;
        }

        // A heading must be followed by a blank line
        if let Some(previous) = result.last() {
            if is_heading(previous.trim()) {
                result.push(String::new());
            }
        }
        result.push(line.to_string());
    }

    let result = remove_blanks_between_table_rows(result);

    let mut document = result;
    while matches!(document.last(), Some(line) if line.trim().is_empty()) {
        document.pop();
    }

    let mut output = document.join("\n");
    output.push('\n');
    output
}

fn is_heading(trimmed: &str) -> bool {
    trimmed.starts_with('#')
}

fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// A blank line between two table rows splits the table in standard
/// Markdown renderers; drop any such line.
fn remove_blanks_between_table_rows(lines: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;

    for (index, line) in lines.iter().enumerate() {
        if line.trim().starts_with("```") {
            in_fence = !in_fence;
            result.push(line.clone());
            continue;
        }

        if !in_fence && line.trim().is_empty() {
            let previous_is_row = matches!(result.last(), Some(p) if is_table_row(p));
            let next_is_row = lines
                .iter()
                .skip(index + 1)
                .find(|next| !next.trim().is_empty())
                .is_some_and(|next| is_table_row(next));

            if previous_is_row && next_is_row {
                continue;
            }
        }

        result.push(line.clone());
    }

    result
}
