use clap::{Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    #[command(subcommand)]
    pub(crate) command: JvmCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum JvmCommand {
    /// List installed JDK builds. The active build is marked with `*`
    #[clap(visible_alias = "ls")]
    List {
        /// Also show the installation path
        #[clap(short, long)]
        verbose: bool,
    },
    /// Switch the active JDK build (e.g. 17, 17.0, 17.0.2+8)
    #[clap(visible_alias = "u")]
    Use {
        version: String,
    },
    /// Download and install a JDK build into the versions directory
    #[clap(visible_alias = "i")]
    Install {
        version: String,
        /// JDK vendor: oracle (default) or temurin
        vendor: Option<String>,
    },
    /// Remove an installed JDK build
    #[clap(visible_alias = "rm")]
    Uninstall {
        version: String,
    },
    /// Show the currently active build
    Current,
    /// Add $JAVA_HOME/bin to the shell profile (or user PATH on Windows)
    PathSetup,
}
