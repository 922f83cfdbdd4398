//! `relabel rules` command implementation.

use clap::Args;
use relabel_rewrite::Preset;

use crate::output::Output;

/// Arguments for the rules command.
#[derive(Args)]
pub(crate) struct RulesArgs {
    /// Preset to list: collapse or repair.
    #[arg(long, default_value_t = Preset::Collapse)]
    preset: Preset,
}

impl RulesArgs {
    /// List the passes of the selected preset in application order.
    pub(crate) fn execute(self) {
        let output = Output::new();
        for (index, rule) in self.preset.rules().iter().enumerate() {
            output.line(&format!(
                "{:>2}. {:<20} {:<12} {}",
                index + 1,
                rule.name(),
                rule.mode().as_str(),
                rule.description()
            ));
        }
    }
}
