// SPDX-License-Identifier: Apache-2.0
//! `cli` defines argument parsing and the command surface.
//!
//! Boundary: `cli` parses/normalizes user input and dispatches to command
//! handlers; rule evaluation belongs in `convlint-core`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod dispatch;

pub(crate) fn run() -> i32 {
    let cli = Cli::parse();
    dispatch::run_cli(cli)
}

#[derive(Parser, Debug)]
#[command(name = "convlint", version, disable_help_subcommand = true)]
#[command(about = "Repository and script convention linter")]
pub struct Cli {
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
    #[arg(long, default_value_t = false)]
    pub json: bool,
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a repository or guideline file name.
    LintName {
        name: String,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate a script structure outline read from a TOML file.
    LintScript {
        outline: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Inspect the builtin convention rule tables.
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    List {
        #[arg(long, value_enum)]
        domain: Option<DomainArg>,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Explain {
        rule_id: String,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Doctor {
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Repo,
    Guideline,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DomainArg {
    Repo,
    Guideline,
    Script,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
    Jsonl,
}
