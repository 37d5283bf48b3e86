//! LaTeX escaping and list-to-markup helpers.
//!
//! Every field value that reaches a template goes through `escape_latex`, either
//! directly or via one of the list helpers below (which escape each element).

/// Escapes the ten LaTeX reserved characters, one character at a time.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '{' => escaped.push_str(r"\{"),
            '}' => escaped.push_str(r"\}"),
            '#' => escaped.push_str(r"\#"),
            '%' => escaped.push_str(r"\%"),
            '&' => escaped.push_str(r"\&"),
            '$' => escaped.push_str(r"\$"),
            '_' => escaped.push_str(r"\_"),
            '^' => escaped.push_str(r"\^{}"),
            '~' => escaped.push_str(r"\~{}"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `\begin{itemize}` block with one `\item` per non-empty entry; empty input renders nothing.
pub fn itemize<S: AsRef<str>>(items: &[S]) -> String {
    itemize_with(items, r"\begin{itemize}")
}

/// Same as `itemize` but with a compact left margin (enumitem option).
pub fn itemize_compact<S: AsRef<str>>(items: &[S]) -> String {
    itemize_with(items, r"\begin{itemize}[leftmargin=*]")
}

fn itemize_with<S: AsRef<str>>(items: &[S], opener: &str) -> String {
    let entries: Vec<String> = items
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.is_empty())
        .map(|s| format!("  \\item {}", escape_latex(s)))
        .collect();
    if entries.is_empty() {
        return String::new();
    }
    format!("{opener}\n{}\n\\end{{itemize}}", entries.join("\n"))
}

/// Comma-separated inline list.
pub fn join_inline<S: AsRef<str>>(items: &[S]) -> String {
    join_escaped(items, ", ")
}

/// Inline list separated by the template's `\tabitem` macro.
pub fn join_tabitems<S: AsRef<str>>(items: &[S]) -> String {
    join_escaped(items, r" \tabitem ")
}

fn join_escaped<S: AsRef<str>>(items: &[S], separator: &str) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.is_empty())
        .map(escape_latex)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Literal placeholder substitution. Each `(token, value)` pair replaces every occurrence.
pub fn fill_placeholders(template: &str, replacements: &[(&str, String)]) -> String {
    replacements
        .iter()
        .fold(template.to_string(), |tex, (token, value)| tex.replace(token, value))
}
