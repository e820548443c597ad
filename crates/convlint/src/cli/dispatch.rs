// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Write};

use crate::cli::{Cli, Command, FormatArg, RulesCommand};
use crate::commands::{
    run_lint_name, run_lint_script, run_rules_doctor, run_rules_explain, run_rules_list,
};

fn force_json_output(command: &mut Command) {
    match command {
        Command::LintName { format, .. } | Command::LintScript { format, .. } => {
            *format = FormatArg::Json;
        }
        Command::Rules { command } => match command {
            RulesCommand::List { format, .. }
            | RulesCommand::Explain { format, .. }
            | RulesCommand::Doctor { format, .. } => {
                *format = FormatArg::Json;
            }
        },
    }
}

fn command_label(command: &Command) -> &'static str {
    match command {
        Command::LintName { .. } => "lint-name",
        Command::LintScript { .. } => "lint-script",
        Command::Rules { command } => match command {
            RulesCommand::List { .. } => "rules list",
            RulesCommand::Explain { .. } => "rules explain",
            RulesCommand::Doctor { .. } => "rules doctor",
        },
    }
}

pub(crate) fn run_cli(cli: Cli) -> i32 {
    let mut command = cli.command;
    if cli.json {
        force_json_output(&mut command);
    }
    let label = command_label(&command);

    let result = match command {
        Command::LintName {
            name,
            kind,
            format,
            out,
        } => run_lint_name(&name, kind, format, out),
        Command::LintScript {
            outline,
            format,
            out,
        } => run_lint_script(&outline, format, out),
        Command::Rules { command } => match command {
            RulesCommand::List {
                domain,
                format,
                out,
            } => run_rules_list(domain, format, out),
            RulesCommand::Explain {
                rule_id,
                format,
                out,
            } => run_rules_explain(&rule_id, format, out),
            RulesCommand::Doctor { format, out } => run_rules_doctor(format, out),
        },
    };

    let exit = match result {
        Ok((rendered, code)) => {
            if !cli.quiet && !rendered.is_empty() {
                if code == 0 {
                    let _ = writeln!(io::stdout(), "{rendered}");
                } else {
                    let _ = writeln!(io::stderr(), "{rendered}");
                }
            }
            code
        }
        Err(err) => {
            let _ = writeln!(io::stderr(), "convlint {label} failed: {err}");
            2
        }
    };
    if cli.verbose {
        let _ = writeln!(io::stderr(), "exit={exit}");
    }
    exit
}
