//! Compiled rules and match-time expansion.

use std::path::Path;

use regex::{Captures, Regex};
use tracing::debug;

use crate::{Error, Result, parse::parse_rules};

/// A single import requested by a `\from` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub module: String,
    pub name: String,
    pub alias: Option<String>,
}

/// One line of a rule template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLine {
    /// Text emitted at the current indentation after back-reference substitution.
    Text(String),
    /// `\doc`: the matched entity's docstring, indented one level.
    Doc,
    /// `\from M import ...`: import requests, no text.
    Import(Vec<ImportSpec>),
}

/// A compiled path-matching rule.
#[derive(Debug, Clone)]
pub struct Rule {
    query: String,
    regex: Regex,
    template: Vec<TemplateLine>,
    line: usize,
    matches: usize,
}

impl Rule {
    pub(crate) fn new(query: String, regex: Regex, template: Vec<TemplateLine>, line: usize) -> Self {
        Self {
            query,
            regex,
            template,
            line,
            matches: 0,
        }
    }

    /// The query text, without its trailing colon.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// 1-based line of the query in the rule file.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn template(&self) -> &[TemplateLine] {
        &self.template
    }

    /// A rule whose template is blank removes matched entities.
    pub fn is_deletion(&self) -> bool {
        self.template.is_empty()
    }

    /// How many entities this rule matched so far.
    pub fn matches(&self) -> usize {
        self.matches
    }

    fn expand(&self, caps: &Captures<'_>) -> Vec<TemplateLine> {
        self.template
            .iter()
            .map(|line| match line {
                TemplateLine::Text(text) => TemplateLine::Text(self.substitute(text, caps)),
                other => other.clone(),
            })
            .collect()
    }

    /// Replace `\N` (highest group first, so `\12` wins over `\1`) and `\name`.
    fn substitute(&self, text: &str, caps: &Captures<'_>) -> String {
        let mut out = text.to_string();
        for i in (1..caps.len()).rev() {
            let group = caps.get(i).map_or("", |m| m.as_str());
            out = out.replace(&format!("\\{i}"), group);
        }
        for name in self.regex.capture_names().flatten() {
            let group = caps.name(name).map_or("", |m| m.as_str());
            out = out.replace(&format!("\\{name}"), group);
        }
        out
    }
}

/// The substituted template of the rule that matched a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleExpansion {
    /// Index of the matching rule within its set.
    pub rule: usize,
    pub lines: Vec<TemplateLine>,
}

/// An ordered table of rules; the first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Parse a rule file from a string.
    pub fn parse(src: &str, filename: &str) -> Result<Self> {
        parse_rules(src, filename)
    }

    /// Load and parse a rule file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_rules(&content, &path.display().to_string())
    }

    /// Find the first rule whose query matches somewhere in `path`, bump its
    /// match counter, and return its template with captures substituted.
    pub fn find(&mut self, path: &str) -> Option<RuleExpansion> {
        self.rules.iter_mut().enumerate().find_map(|(index, rule)| {
            let caps = rule.regex.captures(path)?;
            rule.matches += 1;
            debug!(query = %rule.query, path, "pattern rule matched");
            Some(RuleExpansion {
                rule: index,
                lines: rule.expand(&caps),
            })
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Rules that did not match any entity.
    pub fn unused(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.matches == 0)
    }

    /// Sum of all match counters.
    pub fn total_matches(&self) -> usize {
        self.rules.iter().map(|r| r.matches).sum()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(src: &str) -> RuleSet {
        RuleSet::parse(src, "patterns.txt").expect("valid rule file")
    }

    #[test]
    fn test_first_match_wins() {
        let mut set = rules("ext\\.f:\n    def f() -> int: ...\next\\..*:\n    pass\n");
        let exp = set.find("ext.f").unwrap();
        assert_eq!(exp.rule, 0);
        assert_eq!(set.get(0).unwrap().matches(), 1);
        assert_eq!(set.get(1).unwrap().matches(), 0);

        let exp = set.find("ext.g").unwrap();
        assert_eq!(exp.rule, 1);
    }

    #[test]
    fn test_search_not_full_match() {
        let mut set = rules("Matrix:\n    pass\n");
        assert!(set.find("ext.Matrix.__init__").is_some());
        assert!(set.find("ext.Vector").is_none());
    }

    #[test]
    fn test_numeric_and_named_captures() {
        let mut set = rules(
            "ext\\.(?P<cls>\\w+)\\.get_(\\w+):\n    def get_\\2(self) -> \\cls: ...\n",
        );
        let exp = set.find("ext.Point.get_x").unwrap();
        assert_eq!(
            exp.lines,
            vec![
                TemplateLine::Text("def get_x(self) -> Point: ...".to_string()),
                TemplateLine::Text(String::new()),
            ]
        );
    }

    #[test]
    fn test_high_groups_replaced_first() {
        let query = (1..=12).map(|_| "(\\w)").collect::<String>();
        let src = format!("{query}:\n    \\12\\1\n");
        let mut set = rules(&src);
        let exp = set.find("abcdefghijkl").unwrap();
        assert_eq!(exp.lines[0], TemplateLine::Text("la".to_string()));
    }

    #[test]
    fn test_unused_rules() {
        let mut set = rules("a:\n    pass\nb:\n    pass\n");
        set.find("xa");
        let unused: Vec<_> = set.unused().map(Rule::query).collect();
        assert_eq!(unused, vec!["b"]);
        assert_eq!(set.total_matches(), 1);
    }
}
