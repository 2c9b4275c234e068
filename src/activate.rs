use std::path::{Path, PathBuf};
use crate::error::Result;
use crate::registry::Registry;

/// What switching the active build did to the environment.
#[derive(Debug)]
pub enum EnvironmentEffect {
    /// `JAVA_HOME` was persisted machine-wide through a privileged call.
    Persisted { value: PathBuf },
    /// The invoking shell's environment cannot be mutated from here; the
    /// user has to eval this command themselves.
    Export { command: String },
}

/// Repoints the active pointer at `identifier` and applies the platform's
/// environment effect.
///
/// On Windows this runs an elevated `setx /M JAVA_HOME`; a denied or failed
/// elevation is reported as [`crate::JvmError::Privileged`] with the pointer
/// already switched. Elsewhere the effect is the `export` command to eval.
pub fn activate(registry: &Registry, identifier: &str) -> Result<EnvironmentEffect> {
    let target = registry.set_active(identifier)?;
    environment_effect(registry, target)
}

#[cfg(windows)]
fn environment_effect(_registry: &Registry, target: PathBuf) -> Result<EnvironmentEffect> {
    persist_java_home(&target)?;
    Ok(EnvironmentEffect::Persisted { value: target })
}

#[cfg(not(windows))]
fn environment_effect(registry: &Registry, _target: PathBuf) -> Result<EnvironmentEffect> {
    Ok(EnvironmentEffect::Export {
        command: format!(
            "export JAVA_HOME=\"{}\"",
            registry.current_link().display()
        ),
    })
}

#[cfg(windows)]
fn persist_java_home(target: &Path) -> Result<()> {
    use crate::error::JvmError;
    use std::process::Command;

    let setx = format!("setx /M JAVA_HOME \"{}\"", target.display());
    let elevate = format!("Start-Process cmd -ArgumentList '/c {setx}' -Verb RunAs");
    let status = Command::new("powershell")
        .args(["-Command", &elevate])
        .status()
        .map_err(|err| JvmError::Privileged(err.to_string()))?;
    if !status.success() {
        return Err(JvmError::Privileged(format!(
            "setx exited with {status} (run as Administrator)"
        )));
    }
    Ok(())
}

/// Line appended to the shell profile so the active build's binaries are
/// found on the PATH.
pub const PATH_EXPORT_LINE: &str = "export PATH=\"$JAVA_HOME/bin:$PATH\"";

/// Result of a PATH setup edit.
#[derive(Debug, PartialEq, Eq)]
pub enum ProfileUpdate {
    Appended(PathBuf),
    AlreadyPresent(PathBuf),
}

/// Profile file for a given `$SHELL` value, relative to the home directory.
pub fn profile_file(shell: &str) -> &'static str {
    if shell.contains("zsh") {
        ".zshrc"
    } else if shell.contains("fish") {
        ".config/fish/config.fish"
    } else {
        ".bashrc"
    }
}

/// Appends the `$JAVA_HOME/bin` PATH export to the user's shell profile,
/// once. A profile that already exports it is left untouched.
pub fn setup_unix_path(home: &Path, shell: &str) -> Result<ProfileUpdate> {
    use std::io::Write;

    let profile = home.join(profile_file(shell));
    if let Some(parent) = profile.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let existing = match std::fs::read_to_string(&profile) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err.into()),
    };
    if existing.contains(PATH_EXPORT_LINE) {
        return Ok(ProfileUpdate::AlreadyPresent(profile));
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&profile)?;
    writeln!(file, "\n# added by jvm\n{PATH_EXPORT_LINE}")?;
    Ok(ProfileUpdate::Appended(profile))
}

/// Adds `%JAVA_HOME%\bin` to the user PATH via `setx`, skipping when the
/// entry is already present.
#[cfg(windows)]
pub fn setup_windows_path() -> Result<ProfileUpdate> {
    use crate::error::JvmError;
    use std::process::Command;

    let entry = r"%JAVA_HOME%\bin";
    let current = std::env::var("Path").unwrap_or_default();
    if current.to_lowercase().contains(&entry.to_lowercase()) {
        return Ok(ProfileUpdate::AlreadyPresent(PathBuf::from(entry)));
    }
    let status = Command::new("setx")
        .args(["Path", &format!("{current};{entry}")])
        .status()
        .map_err(|err| JvmError::Privileged(err.to_string()))?;
    if !status.success() {
        return Err(JvmError::Privileged(format!("setx exited with {status}")));
    }
    Ok(ProfileUpdate::Appended(PathBuf::from(entry)))
}
