//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from pattern file validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the pattern file.
    pub path: PathBuf,
    /// The rules it declares, in file order.
    pub rules: Vec<RuleInfo>,
}

/// One declared rule.
#[derive(Debug)]
pub struct RuleInfo {
    pub line: usize,
    pub query: String,
    /// Whether the rule deletes what it matches.
    pub deletion: bool,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("✓ {} is valid", self.path.display()));
        out.newline();

        let count = self.rules.len();
        out.section(&format!(
            "{} rule{}:",
            count,
            if count == 1 { "" } else { "s" }
        ));
        for rule in &self.rules {
            let action = if rule.deletion { "delete" } else { "replace" };
            out.list_item(&format!("line {}: {} ({})", rule.line, rule.query, action));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    #[test]
    fn test_render() {
        let report = CheckReport {
            path: PathBuf::from("rules.txt"),
            rules: vec![RuleInfo {
                line: 1,
                query: r"ext\._.*".to_string(),
                deletion: true,
            }],
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            [
                "✓ rules.txt is valid",
                "",
                "1 rule:",
                "  - line 1: ext\\._.* (delete)",
            ]
        );
    }
}
