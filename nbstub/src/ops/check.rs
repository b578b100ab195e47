//! Check operation - pattern file validation.

use std::path::Path;

use nbstub_rules::RuleSet;

use crate::reports::{CheckReport, RuleInfo};

/// Describe the rules of an already loaded pattern file.
pub fn check(rules: &RuleSet, path: &Path) -> CheckReport {
    CheckReport {
        path: path.to_path_buf(),
        rules: rules
            .iter()
            .map(|rule| RuleInfo {
                line: rule.line(),
                query: rule.query().to_string(),
                deletion: rule.is_deletion(),
            })
            .collect(),
    }
}
