mod cli;
mod execute;

use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use crate::cli::CLI;
use anyhow::Result;

fn main() -> Result<()> {
    let level = if std::env::var_os("JVM_DEBUG").is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let cli = CLI::parse();
    execute::execute(cli)
}
