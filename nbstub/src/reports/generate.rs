//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from generating one stub.
#[derive(Debug)]
pub struct GenerateReport {
    /// Fully qualified module name.
    pub module: String,
    /// Where the stub was written.
    pub output: PathBuf,
    /// Pattern rule usage, when a pattern file was given.
    pub patterns: Option<PatternSummary>,
}

/// How the pattern rules were used so far.
#[derive(Debug, Default)]
pub struct PatternSummary {
    /// Queries of rules that have not matched anything.
    pub unused: Vec<String>,
    /// Total number of matches across all rules.
    pub matches: usize,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        out.section(&format!("Module \"{}\" ..", self.module));

        if let Some(patterns) = &self.patterns {
            for query in &patterns.unused {
                out.warning(&format!("rule {query} did not match any elements."));
            }
            out.list_item(&format!("applied {} patterns.", patterns.matches));
        }

        out.list_item(&format!("writing stub \"{}\" ..", self.output.display()));
    }
}

/// Report data from loading a pattern file.
#[derive(Debug)]
pub struct PatternLoadReport {
    pub path: PathBuf,
    pub count: usize,
}

impl Report for PatternLoadReport {
    fn render(&self, out: &mut dyn Output) {
        out.section(&format!("Using pattern file \"{}\" ..", self.path.display()));
        out.list_item(&format!("loaded {} patterns.", self.count));
        out.newline();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    #[test]
    fn test_render_with_patterns() {
        let report = GenerateReport {
            module: "pkg.ext".to_string(),
            output: PathBuf::from("out/ext.pyi"),
            patterns: Some(PatternSummary {
                unused: vec![r"ext\.gone".to_string()],
                matches: 2,
            }),
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            [
                "Module \"pkg.ext\" ..",
                "  - warning: rule ext\\.gone did not match any elements.",
                "  - applied 2 patterns.",
                "  - writing stub \"out/ext.pyi\" ..",
            ]
        );
    }

    #[test]
    fn test_render_without_patterns() {
        let report = GenerateReport {
            module: "ext".to_string(),
            output: PathBuf::from("ext.pyi"),
            patterns: None,
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert_eq!(out.lines.len(), 2);
        assert!(!out.lines.iter().any(|l| l.contains("patterns")));
    }
}
