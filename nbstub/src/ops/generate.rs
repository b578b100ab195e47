//! Generate operation - stub synthesis from an exported module graph.

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use nbstub_codegen::{StubConfig, generate_stub};
use nbstub_model::ObjectGraph;
use nbstub_rules::RuleSet;
use tracing::info;

use crate::{
    file::write_file,
    reports::{GenerateReport, PatternSummary},
};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    pub config: StubConfig,
    /// Explicit stub path, overriding the derived one.
    pub output_file: Option<&'a Path>,
    /// Directory for derived stub paths, instead of next to the input.
    pub output_dir: Option<&'a Path>,
}

/// Execute the generate operation for one exported graph.
///
/// `rules` is shared across inputs, so its match counters accumulate over a
/// whole run.
pub fn generate(
    input: &Path,
    rules: &mut RuleSet,
    opts: &GenerateOptions<'_>,
) -> Result<GenerateReport> {
    let src = std::fs::read_to_string(input)
        .wrap_err_with(|| format!("Failed to read {}", input.display()))?;
    let graph = ObjectGraph::from_json(&src)
        .wrap_err_with(|| format!("Invalid module graph in {}", input.display()))?;

    let output = generate_stub(&graph, opts.config.clone(), Some(std::mem::take(rules)))
        .wrap_err_with(|| format!("Failed to generate stub for {}", input.display()))?;
    *rules = output.rules;

    let path = output_path(input, &output.module, opts);
    write_file(&path, &output.stub)?;
    info!(module = %output.module, path = %path.display(), "wrote stub");

    let patterns = (!rules.is_empty()).then(|| PatternSummary {
        unused: rules.unused().map(|r| r.query().to_string()).collect(),
        matches: rules.total_matches(),
    });

    Ok(GenerateReport {
        module: output.module,
        output: path,
        patterns,
    })
}

/// `<last module component>.pyi`, next to the input or in the output
/// directory, unless an explicit output file is given.
pub fn output_path(input: &Path, module: &str, opts: &GenerateOptions<'_>) -> PathBuf {
    if let Some(file) = opts.output_file {
        return file.to_path_buf();
    }
    let stem = module.rsplit('.').next().unwrap_or(module);
    let name = format!("{stem}.pyi");
    match opts.output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbstub_model::{Module, Object, Value, ValueData};

    fn export(dir: &Path, module: &str) -> PathBuf {
        let mut graph = ObjectGraph::new();
        let answer = graph.push(Object::Value(Value::builtin(ValueData::Int(42))));
        let legacy = graph.push(Object::Value(Value::builtin(ValueData::Int(0))));
        let root = graph.push(Object::Module(
            Module::new(module)
                .member("ANSWER", answer)
                .member("legacy", legacy),
        ));
        graph.set_root(root);

        let path = dir.join("export.json");
        std::fs::write(&path, serde_json::to_string(&graph).unwrap()).unwrap();
        path
    }

    fn options<'a>() -> GenerateOptions<'a> {
        GenerateOptions {
            config: StubConfig::default(),
            output_file: None,
            output_dir: None,
        }
    }

    #[test]
    fn test_writes_stub_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = export(dir.path(), "pkg.ext");
        let mut rules = RuleSet::new();

        let report = generate(&input, &mut rules, &options()).unwrap();

        assert_eq!(report.module, "pkg.ext");
        assert_eq!(report.output, dir.path().join("ext.pyi"));
        assert!(report.patterns.is_none());
        assert_eq!(
            std::fs::read_to_string(&report.output).unwrap(),
            "ANSWER: int = 42\n\nlegacy: int = 0\n"
        );
    }

    #[test]
    fn test_output_dir_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = export(dir.path(), "ext");
        let stubs = dir.path().join("stubs");

        let mut opts = options();
        opts.output_dir = Some(&stubs);
        assert_eq!(output_path(&input, "ext", &opts), stubs.join("ext.pyi"));

        let explicit = dir.path().join("custom.pyi");
        opts.output_file = Some(&explicit);
        assert_eq!(output_path(&input, "ext", &opts), explicit);
    }

    #[test]
    fn test_pattern_usage_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = export(dir.path(), "ext");
        let mut rules = RuleSet::parse("ext\\.legacy:\n\next\\.gone:\n", "rules.txt").unwrap();

        let report = generate(&input, &mut rules, &options()).unwrap();

        let patterns = report.patterns.unwrap();
        assert_eq!(patterns.matches, 1);
        assert_eq!(patterns.unused, [r"ext\.gone"]);
        assert_eq!(
            std::fs::read_to_string(&report.output).unwrap(),
            "ANSWER: int = 42\n"
        );
    }

    #[test]
    fn test_invalid_graph_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.json");
        std::fs::write(&input, "{\"objects\": []}").unwrap();

        let err = generate(&input, &mut RuleSet::new(), &options()).unwrap_err();
        assert!(err.to_string().contains("Invalid module graph"));
    }
}
