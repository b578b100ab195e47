//! Rule file parsing.

use regex::Regex;
use tracing::debug;

use crate::{
    ImportSpec, Result, Rule, RuleSet, TemplateLine,
    error::SourceContext,
};

/// A query line and the template lines collected under it so far.
struct PendingRule {
    query: String,
    line: usize,
    span: (usize, usize),
    lines: Vec<(String, (usize, usize))>,
    dedent: Option<usize>,
}

impl PendingRule {
    fn push(&mut self, line: &str, span: (usize, usize)) {
        let text = match self.dedent {
            None if line.trim().is_empty() => String::new(),
            None => {
                let stripped = line.trim_start();
                self.dedent = Some(line.chars().count() - stripped.chars().count());
                stripped.to_string()
            }
            Some(n) => strip_indent(line, n).to_string(),
        };
        self.lines.push((text, span));
    }

    fn finish(mut self, ctx: &SourceContext) -> Result<Rule> {
        while self
            .lines
            .last()
            .is_some_and(|(l, _)| l.trim().is_empty())
        {
            self.lines.pop();
        }

        // Exactly one blank line closes a non-empty template; a template with
        // no visible text deletes whatever it matches.
        let template = if self.lines.is_empty() {
            Vec::new()
        } else {
            let mut template = self
                .lines
                .iter()
                .map(|(text, span)| classify(text, *span, ctx))
                .collect::<Result<Vec<_>>>()?;
            template.push(TemplateLine::Text(String::new()));
            template
        };

        let regex = Regex::new(&self.query)
            .map_err(|e| ctx.invalid_regex_error(&self.query, self.span, e))?;
        Ok(Rule::new(self.query, regex, template, self.line))
    }
}

/// Remove up to `n` leading whitespace characters.
fn strip_indent(line: &str, n: usize) -> &str {
    let mut rest = line;
    for _ in 0..n {
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if c.is_whitespace() => rest = chars.as_str(),
            _ => break,
        }
    }
    rest
}

fn classify(text: &str, span: (usize, usize), ctx: &SourceContext) -> Result<TemplateLine> {
    let trimmed = text.trim();
    if trimmed == "\\doc" {
        return Ok(TemplateLine::Doc);
    }
    if let Some(rest) = trimmed.strip_prefix("\\from ") {
        return parse_import(rest)
            .map(TemplateLine::Import)
            .ok_or_else(|| ctx.invalid_import_error(trimmed, span));
    }
    Ok(TemplateLine::Text(text.to_string()))
}

/// Parse `M import A [as B], C` (optionally parenthesized).
fn parse_import(rest: &str) -> Option<Vec<ImportSpec>> {
    let parts: Vec<&str> = rest.split(" import ").collect();
    let [module, names] = parts.as_slice() else {
        return None;
    };
    let module = module.trim();
    if module.is_empty() {
        return None;
    }

    let names = names.trim().trim_start_matches('(').trim_end_matches(')');
    names
        .split(',')
        .map(|item| {
            let mut parts = item.split(" as ");
            let name = parts.next()?.trim();
            let alias = parts.next().map(str::trim);
            if name.is_empty() || parts.next().is_some() || alias.is_some_and(str::is_empty) {
                return None;
            }
            Some(ImportSpec {
                module: module.to_string(),
                name: name.to_string(),
                alias: alias.map(str::to_string),
            })
        })
        .collect()
}

/// Parse rule file content.
pub(crate) fn parse_rules(src: &str, filename: &str) -> Result<RuleSet> {
    let ctx = SourceContext::new(src, filename);
    let mut rules: Vec<Rule> = Vec::new();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut pending: Option<PendingRule> = None;

    let mut offset = 0;
    for (index, raw) in src.split_inclusive('\n').enumerate() {
        let line = raw.trim_end();
        let span = (offset, line.len());
        offset += raw.len();

        if line.starts_with('#') {
            continue;
        }

        if line.is_empty() || line.starts_with(char::is_whitespace) {
            // Lines before the first query have nowhere to go.
            if let Some(p) = pending.as_mut() {
                p.push(line, span);
            }
            continue;
        }

        let Some(query) = line.strip_suffix(':') else {
            return Err(ctx.parse_error(index + 1, span));
        };

        if let Some(p) = pending.take() {
            push_rule(&ctx, &mut rules, &mut spans, p)?;
        }
        pending = Some(PendingRule {
            query: query.to_string(),
            line: index + 1,
            span,
            lines: Vec::new(),
            dedent: None,
        });
    }

    if let Some(p) = pending.take() {
        push_rule(&ctx, &mut rules, &mut spans, p)?;
    }

    debug!(file = filename, count = rules.len(), "loaded pattern rules");
    Ok(RuleSet::from_rules(rules))
}

fn push_rule(
    ctx: &SourceContext,
    rules: &mut Vec<Rule>,
    spans: &mut Vec<(usize, usize)>,
    pending: PendingRule,
) -> Result<()> {
    if let Some(first) = rules.iter().position(|r| r.query() == pending.query) {
        return Err(ctx.duplicate_query_error(&pending.query, spans[first], pending.span));
    }
    spans.push(pending.span);
    rules.push(pending.finish(ctx)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn texts(rule: &Rule) -> Vec<String> {
        rule.template()
            .iter()
            .map(|l| match l {
                TemplateLine::Text(t) => t.clone(),
                TemplateLine::Doc => "<doc>".to_string(),
                TemplateLine::Import(_) => "<import>".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_parse_blocks_and_comments() {
        let src = "\
# leading comment
ext\\.f:
    def f(x: int) -> int:
        \\doc

ext\\.g:
    def g() -> None: ...
";
        let set = parse_rules(src, "p.txt").unwrap();
        assert_eq!(set.len(), 2);

        let f = set.get(0).unwrap();
        assert_eq!(f.query(), "ext\\.f");
        assert_eq!(f.line(), 2);
        assert_eq!(texts(f), vec!["def f(x: int) -> int:", "<doc>", ""]);

        let g = set.get(1).unwrap();
        assert_eq!(texts(g), vec!["def g() -> None: ...", ""]);
    }

    #[test]
    fn test_dedent_keeps_relative_indentation() {
        let src = "q:\n\n        class A:\n            x: int\n      y\n";
        let set = parse_rules(src, "p.txt").unwrap();
        assert_eq!(
            texts(set.get(0).unwrap()),
            vec!["", "class A:", "    x: int", "y", ""]
        );
    }

    #[test]
    fn test_dedent_measured_from_first_visible_line() {
        let src = "q:\n\n\n        def f() -> None:\n            pass\n    x: int\n";
        let set = parse_rules(src, "p.txt").unwrap();
        assert_eq!(
            texts(set.get(0).unwrap()),
            vec!["", "", "def f() -> None:", "    pass", "x: int", ""]
        );
    }

    #[test]
    fn test_blank_template_is_deletion() {
        let set = parse_rules("ext\\._private:\n   \n\nnext:\n    pass\n", "p.txt").unwrap();
        assert!(set.get(0).unwrap().is_deletion());
        assert!(!set.get(1).unwrap().is_deletion());
    }

    #[test]
    fn test_unparseable_line() {
        let err = parse_rules("q:\n    pass\nnot a query\n", "p.txt").unwrap_err();
        assert!(matches!(*err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn test_duplicate_query() {
        let err = parse_rules("q:\n    a\nq:\n    b\n", "p.txt").unwrap_err();
        match *err {
            Error::DuplicateQuery { ref query, .. } => assert_eq!(query, "q"),
            ref other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_regex() {
        let err = parse_rules("ext\\.(unclosed:\n    pass\n", "p.txt").unwrap_err();
        assert!(matches!(*err, Error::InvalidRegex { .. }));
    }

    #[test]
    fn test_import_directive() {
        let set = parse_rules(
            "q:\n    \\from typing import (Any, Sequence as Seq)\n    x: Any\n",
            "p.txt",
        )
        .unwrap();
        let rule = set.get(0).unwrap();
        assert_eq!(
            rule.template()[0],
            TemplateLine::Import(vec![
                ImportSpec {
                    module: "typing".to_string(),
                    name: "Any".to_string(),
                    alias: None,
                },
                ImportSpec {
                    module: "typing".to_string(),
                    name: "Sequence".to_string(),
                    alias: Some("Seq".to_string()),
                },
            ])
        );
    }

    #[test]
    fn test_malformed_import_directive() {
        let err = parse_rules("q:\n    \\from typing Any\n", "p.txt").unwrap_err();
        assert!(matches!(*err, Error::InvalidImport { .. }));
    }

    #[test]
    fn test_strip_indent_never_eats_text() {
        assert_eq!(strip_indent("  x", 4), "x");
        assert_eq!(strip_indent("      x", 4), "  x");
        assert_eq!(strip_indent("\tx", 1), "x");
    }
}
