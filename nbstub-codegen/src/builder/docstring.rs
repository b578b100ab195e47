//! Docstring normalization.

/// Longest docstring kept on the same line as its quotes.
const INLINE_DOCSTRING_WIDTH: usize = 70;

/// Remove the whitespace prefix common to all non-blank lines.
///
/// Whitespace-only lines become empty and do not count towards the margin.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .reduce(|common, indent| {
            let len = common
                .char_indices()
                .zip(indent.chars())
                .take_while(|((_, a), b)| a == b)
                .last()
                .map_or(0, |((i, a), _)| i + a.len_utf8());
            &common[..len]
        })
        .unwrap_or("");

    let mut out = text
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Format a docstring as a triple-quoted literal followed by a newline.
///
/// Text containing `''` or a backslash becomes a raw string with every `''`
/// escaped, so that no unescaped triple quote can appear. Long or multi-line
/// text is wrapped in newlines.
pub fn format_docstring(doc: &str) -> String {
    let mut doc = dedent(doc).trim().to_string();
    let mut prefix = "";
    if doc.contains("''") || doc.contains('\\') {
        doc = doc.replace("''", "\\'\\'");
        prefix = "r";
    }
    if doc.chars().count() > INLINE_DOCSTRING_WIDTH || doc.contains('\n') {
        doc = format!("\n{doc}\n");
    }
    format!("{prefix}\"\"\"{doc}\"\"\"\n")
}
