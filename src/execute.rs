use anyhow::Result;
use colored::Colorize;
use jvm::activate::{self, EnvironmentEffect, ProfileUpdate};
use jvm::error::JvmError;
use jvm::installer::{self, InstallOutcome};
use jvm::registry::Registry;
use jvm::resolver;
use jvm::vendor::Vendor;
use crate::cli::{CLI, JvmCommand};

pub fn execute(cli: CLI) -> Result<()> {
    let registry = Registry::open_default()?;
    match cli.command {
        JvmCommand::List { verbose } => execute_list(&registry, verbose),
        JvmCommand::Use { version } => execute_use(&registry, &version),
        JvmCommand::Install { version, vendor } => execute_install(&registry, &version, vendor),
        JvmCommand::Uninstall { version } => execute_uninstall(&registry, &version),
        JvmCommand::Current => execute_current(&registry),
        JvmCommand::PathSetup => execute_path_setup(),
    }
}

pub fn execute_list(registry: &Registry, verbose: bool) -> Result<()> {
    let builds = registry.list_builds()?;
    if builds.is_empty() {
        println!("No versions installed yet.");
        return Ok(());
    }
    let active = registry.get_active()?;
    for build in builds {
        let is_active = active.as_deref() == Some(build.as_str());
        let marker = if is_active { "* ".green() } else { "  ".normal() };
        let mut line = format!("{marker}{build}");
        if verbose {
            line.push_str(&format!("  (path: {})", registry.build_path(&build).display()));
        }
        if is_active {
            line.push_str("  (active)");
        }
        println!("{line}");
    }
    Ok(())
}

pub fn execute_use(registry: &Registry, version: &str) -> Result<()> {
    let builds = registry.list_builds()?;
    if builds.is_empty() {
        return Err(JvmError::NoVersionsInstalled.into());
    }
    let target = resolver::resolve(&builds, version)
        .ok_or_else(|| JvmError::NotFound(version.to_string()))?;

    match activate::activate(registry, &target)? {
        EnvironmentEffect::Persisted { value } => {
            println!(
                "{} JAVA_HOME set to {} (machine-wide)",
                "✔".green(),
                value.display()
            );
        }
        EnvironmentEffect::Export { command } => {
            // Printed bare so the caller can eval the output directly.
            println!("{command}");
        }
    }
    Ok(())
}

pub fn execute_install(registry: &Registry, version: &str, vendor: Option<String>) -> Result<()> {
    let vendor = match vendor {
        Some(name) => name.parse::<Vendor>()?,
        None => Vendor::default(),
    };
    match installer::install(registry, vendor, version)? {
        InstallOutcome::Installed(path) => {
            println!(
                "{} {} installed at {}",
                "✔".green(),
                vendor.build_identifier(version),
                path.display()
            );
        }
        InstallOutcome::AlreadyInstalled => {
            println!("{version} is already installed.");
        }
    }
    Ok(())
}

pub fn execute_uninstall(registry: &Registry, version: &str) -> Result<()> {
    let builds = registry.list_builds()?;
    if builds.is_empty() {
        return Err(JvmError::NoVersionsInstalled.into());
    }
    let target = resolver::resolve_for_removal(&builds, version)
        .ok_or_else(|| JvmError::NotFound(version.to_string()))?;

    let was_active = registry.remove_build(&target)?;
    println!("{} {} uninstalled successfully.", "✔".green(), target);
    if was_active {
        println!("Current version unset.");
    }
    Ok(())
}

pub fn execute_current(registry: &Registry) -> Result<()> {
    match registry.get_active()? {
        Some(active) => println!("{active}"),
        None => println!("No active version."),
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn execute_path_setup() -> Result<()> {
    let base = directories::BaseDirs::new().ok_or(JvmError::NoHome)?;
    let shell = std::env::var("SHELL").unwrap_or_default();
    match activate::setup_unix_path(base.home_dir(), &shell)? {
        ProfileUpdate::Appended(profile) => {
            println!(
                "{} Appended '{}' to {}",
                "✔".green(),
                activate::PATH_EXPORT_LINE,
                profile.display()
            );
            println!("Restart your terminal or source your profile to apply the change.");
        }
        ProfileUpdate::AlreadyPresent(profile) => {
            println!(
                "$JAVA_HOME/bin is already exported in {}, skipping.",
                profile.display()
            );
        }
    }
    Ok(())
}

#[cfg(windows)]
pub fn execute_path_setup() -> Result<()> {
    match activate::setup_windows_path()? {
        ProfileUpdate::Appended(entry) => {
            println!("{} Added {} to your user PATH.", "✔".green(), entry.display());
            println!("You may need to restart your terminal for changes to apply.");
        }
        ProfileUpdate::AlreadyPresent(entry) => {
            println!("{} is already in your PATH, skipping.", entry.display());
        }
    }
    Ok(())
}
