use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use nbstub_rules::RuleSet;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the pattern file
    pub pattern_file: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let rules = RuleSet::load(&self.pattern_file).unwrap_or_exit();
        let report = ops::check(&rules, &self.pattern_file);
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
