//! HTML-like node label construction.
//!
//! Each diagram node carries a small HTML table: the wrapped, escaped
//! title, a swatch row per non-structural label, an assignee line, and an
//! error banner when the resolver recorded unresolved references.

use crate::domain::Issue;

/// Width titles are wrapped at before escaping.
const TITLE_WRAP_COLUMNS: usize = 20;

/// Builds the HTML table for an issue's node label.
///
/// The configured epic label is structural (it drives node shape and
/// color) and is skipped in the swatch row.
pub(super) fn node_label(issue: &Issue, epic_label: &str) -> String {
    let title = format!("{}: {}", issue.node_name(), issue.title).replace('|', "-");
    let title = escape_html(&textwrap::fill(&title, TITLE_WRAP_COLUMNS)).replace('\n', "<br/>");

    let swatches: Vec<String> = issue
        .labels
        .iter()
        .filter(|label| label.name != epic_label)
        .map(|label| {
            format!(
                r##"<td bgcolor="#{}">{}</td>"##,
                label.color,
                escape_html(&label.name)
            )
        })
        .collect();
    let labels_row = if swatches.is_empty() {
        String::new()
    } else {
        format!(
            "<tr><td><table><tr>{}</tr></table></td></tr>",
            swatches.join("")
        )
    };

    let assignees_row = if issue.assignees.is_empty() {
        String::new()
    } else {
        let usernames: Vec<String> = issue
            .assignees
            .iter()
            .map(|person| escape_html(&person.username))
            .collect();
        format!(
            r#"<tr><td><font color="purple"><i>@{}</i></font></td></tr>"#,
            usernames.join(", @")
        )
    };

    let errors_row = if issue.errors.is_empty() {
        String::new()
    } else {
        let messages: Vec<String> = issue.errors.iter().map(|e| escape_html(e)).collect();
        format!(
            r#"<tr><td bgcolor="red">ERR: {}</td></tr>"#,
            messages.join("; ")
        )
    };

    format!("<table><tr><td>{title}</td></tr>{labels_row}{assignees_row}{errors_row}</table>")
}

/// Escapes text for embedding in an HTML-like label.
pub(super) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
