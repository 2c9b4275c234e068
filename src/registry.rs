use std::path::{Path, PathBuf};
use directories::BaseDirs;
use crate::error::{JvmError, Result};

/// On-disk store of installed JDK builds.
///
/// Layout under the home directory (default `~/.jvm`, overridable through
/// the `JVM_HOME` environment variable):
///
/// - `versions/<identifier>` — one directory per installed build
/// - `current` — symlink to the active build's directory, or absent
/// - `tmp` — staging root for in-flight installs
///
/// The store performs no locking; one invocation of the tool is the single
/// writer. Reads and writes of the active pointer are last-writer-wins.
#[derive(Debug, Clone)]
pub struct Registry {
    home: PathBuf,
}

impl Registry {
    /// Opens the registry at the default home (`$JVM_HOME` or `~/.jvm`),
    /// creating the directory layout if missing.
    pub fn open_default() -> Result<Self> {
        let home = match std::env::var_os("JVM_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => {
                let base = BaseDirs::new().ok_or(JvmError::NoHome)?;
                base.home_dir().join(".jvm")
            }
        };
        Self::open(home)
    }

    /// Opens the registry rooted at an explicit home directory.
    pub fn open<P: AsRef<Path>>(home: P) -> Result<Self> {
        let registry = Registry { home: home.as_ref().to_path_buf() };
        std::fs::create_dir_all(registry.versions_dir())?;
        Ok(registry)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.home.join("versions")
    }

    pub fn current_link(&self) -> PathBuf {
        self.home.join("current")
    }

    /// Staging root for install operations. Lives under the home directory
    /// so publish renames stay on the same filesystem as `versions`.
    pub fn staging_root(&self) -> Result<PathBuf> {
        let dir = self.home.join("tmp");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Removes leftover staging entries from installs that were killed
    /// mid-operation. Best effort: failures are ignored.
    pub fn sweep_staging(&self) {
        let Ok(root) = self.staging_root() else { return };
        let Ok(entries) = std::fs::read_dir(&root) else { return };
        for entry in entries.flatten() {
            let path = entry.path();
            let _ = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
        }
    }

    pub fn build_path(&self, identifier: &str) -> PathBuf {
        self.versions_dir().join(identifier)
    }

    pub fn is_installed(&self, identifier: &str) -> bool {
        self.build_path(identifier).is_dir()
    }

    /// All installed build identifiers, lexically sorted.
    ///
    /// The sort makes range-match tie-breaks deterministic instead of
    /// depending on directory enumeration order.
    pub fn list_builds(&self) -> Result<Vec<String>> {
        let versions = self.versions_dir();
        if !versions.exists() {
            return Ok(Vec::new());
        }
        let mut builds = Vec::new();
        for entry in std::fs::read_dir(&versions)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                builds.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        builds.sort();
        Ok(builds)
    }

    /// Identifier of the active build, or `None` when no pointer exists
    /// (or it dangles).
    pub fn get_active(&self) -> Result<Option<String>> {
        let link = self.current_link();
        if !link.exists() {
            return Ok(None);
        }
        match std::fs::canonicalize(&link) {
            Ok(real) => Ok(real
                .file_name()
                .map(|name| name.to_string_lossy().to_string())),
            Err(_) => Ok(None),
        }
    }

    /// Repoints the active pointer at `identifier`'s directory and returns
    /// that directory.
    ///
    /// On Unix the replacement is a create-then-rename, so a concurrent
    /// reader never observes a missing pointer. On Windows the link is
    /// removed and recreated; a failure between the two steps surfaces as
    /// an error rather than silently leaving no active build.
    pub fn set_active(&self, identifier: &str) -> Result<PathBuf> {
        let target = self.build_path(identifier);
        let link = self.current_link();

        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink;
            let staged = self.home.join(".current.tmp");
            if staged.symlink_metadata().is_ok() {
                std::fs::remove_file(&staged)?;
            }
            symlink(&target, &staged)?;
            std::fs::rename(&staged, &link)?;
        }
        #[cfg(windows)]
        {
            use std::os::windows::fs::symlink_dir;
            if link.symlink_metadata().is_ok() {
                std::fs::remove_dir(&link)?;
            }
            symlink_dir(&target, &link)?;
        }

        Ok(target)
    }

    /// Removes the active pointer if present.
    pub fn clear_active(&self) -> Result<()> {
        let link = self.current_link();
        if link.symlink_metadata().is_ok() {
            #[cfg(unix)]
            std::fs::remove_file(&link)?;
            #[cfg(windows)]
            std::fs::remove_dir(&link)?;
        }
        Ok(())
    }

    /// Deletes an installed build. If the active pointer resolves to the
    /// removed build it is cleared in the same operation, so no dangling
    /// pointer is ever left behind. Returns whether the pointer was cleared.
    pub fn remove_build(&self, identifier: &str) -> Result<bool> {
        let was_active = self.get_active()?.as_deref() == Some(identifier);
        std::fs::remove_dir_all(self.build_path(identifier))?;
        if was_active {
            self.clear_active()?;
        }
        Ok(was_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn registry_with(builds: &[&str]) -> (tempfile::TempDir, Registry) {
        let dir = tempdir().unwrap();
        let registry = Registry::open(dir.path()).unwrap();
        for build in builds {
            std::fs::create_dir_all(registry.build_path(build)).unwrap();
        }
        (dir, registry)
    }

    #[test]
    fn test_list_builds_sorted() {
        let (_dir, registry) = registry_with(&["jdk-21.0.0", "jdk-17.0.1"]);
        assert_eq!(
            registry.list_builds().unwrap(),
            vec!["jdk-17.0.1".to_string(), "jdk-21.0.0".to_string()]
        );
    }

    #[test]
    fn test_list_builds_empty_home() {
        let dir = tempdir().unwrap();
        let registry = Registry::open(dir.path()).unwrap();
        assert!(registry.list_builds().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_set_and_get_active() {
        let (_dir, registry) = registry_with(&["jdk-17.0.1"]);
        assert_eq!(registry.get_active().unwrap(), None);
        registry.set_active("jdk-17.0.1").unwrap();
        assert_eq!(registry.get_active().unwrap(), Some("jdk-17.0.1".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_set_active_is_idempotent_and_replaces() {
        let (_dir, registry) = registry_with(&["jdk-17.0.1", "jdk-21.0.0"]);
        registry.set_active("jdk-17.0.1").unwrap();
        registry.set_active("jdk-17.0.1").unwrap();
        assert_eq!(registry.get_active().unwrap(), Some("jdk-17.0.1".to_string()));
        registry.set_active("jdk-21.0.0").unwrap();
        assert_eq!(registry.get_active().unwrap(), Some("jdk-21.0.0".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_active_build_clears_pointer() {
        let (_dir, registry) = registry_with(&["jdk-17.0.1"]);
        registry.set_active("jdk-17.0.1").unwrap();
        let cleared = registry.remove_build("jdk-17.0.1").unwrap();
        assert!(cleared);
        assert_eq!(registry.get_active().unwrap(), None);
        assert!(!registry.is_installed("jdk-17.0.1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_other_build_keeps_pointer() {
        let (_dir, registry) = registry_with(&["jdk-17.0.1", "jdk-21.0.0"]);
        registry.set_active("jdk-17.0.1").unwrap();
        let cleared = registry.remove_build("jdk-21.0.0").unwrap();
        assert!(!cleared);
        assert_eq!(registry.get_active().unwrap(), Some("jdk-17.0.1".to_string()));
    }

    #[test]
    fn test_sweep_staging_removes_leftovers() {
        let (_dir, registry) = registry_with(&[]);
        let root = registry.staging_root().unwrap();
        std::fs::create_dir_all(root.join("jvm-install-stale")).unwrap();
        std::fs::write(root.join("jdk-17_linux-x64_bin.tar.gz"), b"partial").unwrap();
        registry.sweep_staging();
        assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
    }
}
