use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result, bail};
use nbstub_codegen::{PythonVersion, StubConfig};
use nbstub_rules::RuleSet;

use super::UnwrapOrExit;
use crate::{
    config::ProjectConfig,
    file::touch,
    ops::{self, GenerateOptions},
    reports::{Output, PatternLoadReport, QuietOutput, Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Exported module graphs (JSON)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write the stub to this file (single input only)
    #[arg(short = 'o', long)]
    pub output_file: Option<PathBuf>,

    /// Directory for the generated stubs (defaults to next to each input)
    #[arg(short = 'O', long)]
    pub output_dir: Option<PathBuf>,

    /// Pattern file with replacement rules
    #[arg(short = 'p', long)]
    pub pattern_file: Option<PathBuf>,

    /// Include private members (single leading or trailing underscore)
    #[arg(short = 'P', long)]
    pub include_private: bool,

    /// Omit docstrings from the stubs
    #[arg(short = 'D', long)]
    pub exclude_docstrings: bool,

    /// Create this file once every stub is written
    #[arg(short = 'M', long)]
    pub marker_file: Option<PathBuf>,

    /// Do not print progress messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to nbstub.toml (defaults to ./nbstub.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Longest inline literal before it is replaced by `...`
    #[arg(long)]
    pub max_expr_length: Option<usize>,

    /// Oldest Python version the stubs must support
    #[arg(long)]
    pub python_version: Option<PythonVersion>,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        if self.output_file.is_some() && self.inputs.len() > 1 {
            bail!("--output-file cannot be combined with multiple inputs");
        }

        let project = ProjectConfig::discover(self.config.as_deref())?;
        let config = self.stub_config(project.stubgen);

        let mut terminal = TerminalOutput::new();
        let mut quiet = QuietOutput;
        let out: &mut dyn Output = if self.quiet { &mut quiet } else { &mut terminal };

        let mut rules = match &self.pattern_file {
            Some(path) => {
                let rules = RuleSet::load(path).unwrap_or_exit();
                PatternLoadReport {
                    path: path.clone(),
                    count: rules.len(),
                }
                .render(out);
                rules
            }
            None => RuleSet::new(),
        };

        if let Some(dir) = &self.output_dir {
            std::fs::create_dir_all(dir)
                .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;
        }

        let opts = GenerateOptions {
            config,
            output_file: self.output_file.as_deref(),
            output_dir: self.output_dir.as_deref(),
        };
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                out.newline();
            }
            let report = ops::generate(input, &mut rules, &opts)?;
            report.render(out);
        }

        if let Some(marker) = &self.marker_file {
            out.list_item(&format!("writing marker file \"{}\" ..", marker.display()));
            touch(marker)?;
        }

        Ok(())
    }

    /// Command-line flags take precedence over `nbstub.toml`.
    fn stub_config(&self, mut config: StubConfig) -> StubConfig {
        if self.include_private {
            config.include_private = true;
        }
        if self.exclude_docstrings {
            config.include_docstrings = false;
        }
        if let Some(max) = self.max_expr_length {
            config.max_expr_length = max;
        }
        if let Some(version) = self.python_version {
            config.python_version = version;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        generate: GenerateCommand,
    }

    #[test]
    fn test_flags_override_config() {
        let cli = TestCli::parse_from([
            "nbstub",
            "export.json",
            "-P",
            "-D",
            "--max-expr-length",
            "20",
            "--python-version",
            "3.8",
        ]);
        let config = cli.generate.stub_config(StubConfig::default());

        assert!(config.include_private);
        assert!(!config.include_docstrings);
        assert_eq!(config.max_expr_length, 20);
        assert_eq!(config.python_version, PythonVersion::new(3, 8));
    }

    #[test]
    fn test_config_kept_without_flags() {
        let cli = TestCli::parse_from(["nbstub", "a.json", "b.json"]);
        let base = StubConfig {
            max_expr_length: 80,
            ..StubConfig::default()
        };

        assert_eq!(cli.generate.inputs.len(), 2);
        assert_eq!(cli.generate.stub_config(base.clone()), base);
    }

    #[test]
    fn test_writes_marker_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.json");
        std::fs::write(
            &input,
            r#"{"root": 0, "objects": [{"kind": "module", "name": "ext"}]}"#,
        )
        .unwrap();
        let marker = dir.path().join("stubs.done");
        let config = dir.path().join("nbstub.toml");
        std::fs::write(&config, "").unwrap();

        let args: Vec<OsString> = vec![
            "nbstub".into(),
            input.clone().into(),
            "-q".into(),
            "-c".into(),
            config.into(),
            "-M".into(),
            marker.clone().into(),
        ];
        let cli = TestCli::parse_from(args);
        cli.generate.run().unwrap();

        assert!(marker.exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("ext.pyi")).unwrap(),
            "\n"
        );
    }
}
