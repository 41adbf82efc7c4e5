//! Command implementations.

pub mod build;
pub mod clean;
pub mod completions;
pub mod install;
pub mod run;
pub mod vet;

use std::io::Write;

use goforge::ExecOutcome;

/// Default package selector used when a command gets no packages.
pub(crate) fn packages_or_default(packages: Vec<String>) -> Vec<String> {
    if packages.is_empty() {
        vec![format!(".{}...", std::path::MAIN_SEPARATOR)]
    } else {
        packages
    }
}

/// Print the captured tool output for commands whose output the user came
/// for (test, vet, run).
pub(crate) fn print_tool_output(outcome: &ExecOutcome) {
    if !outcome.stdout.is_empty() {
        print!("{}", outcome.stdout);
        let _ = std::io::stdout().flush();
    }
}
