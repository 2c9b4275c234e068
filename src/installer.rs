use std::fs::File;
use std::path::{Path, PathBuf};
use flate2::read::GzDecoder;
use crate::error::{JvmError, Result};
use crate::registry::Registry;
use crate::vendor::{ArchiveKind, ArtifactDescriptor, Vendor};

/// Result of one install operation.
#[derive(Debug)]
pub enum InstallOutcome {
    /// A new build was published at the contained path.
    Installed(PathBuf),
    /// The target identifier already existed; nothing was downloaded.
    AlreadyInstalled,
}

/// Resolves `version` against `vendor` and installs the resulting build.
///
/// Idempotent: when the target identifier already exists the operation
/// returns [`InstallOutcome::AlreadyInstalled`] before any network call.
pub fn install(registry: &Registry, vendor: Vendor, version: &str) -> Result<InstallOutcome> {
    let identifier = vendor.build_identifier(version);
    if registry.is_installed(&identifier) {
        return Ok(InstallOutcome::AlreadyInstalled);
    }
    registry.sweep_staging();
    let descriptor = vendor.describe(version)?;
    install_artifact(registry, &descriptor, &identifier)
}

/// Downloads, extracts and publishes one artifact under `identifier`.
///
/// All intermediate state lives in a staging directory under the registry
/// home; it is removed when this function returns, on success and on every
/// error path. The final target directory only appears once publishing
/// begins, and a failed publish removes it again, so a partial install is
/// never visible as a usable build.
pub fn install_artifact(
    registry: &Registry,
    descriptor: &ArtifactDescriptor,
    identifier: &str,
) -> Result<InstallOutcome> {
    if registry.is_installed(identifier) {
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    let staging = tempfile::Builder::new()
        .prefix("jvm-install-")
        .tempdir_in(registry.staging_root()?)?;

    let archive_path = staging.path().join(archive_file_name(descriptor));
    log::info!("downloading {}", descriptor.url);
    download(descriptor, &archive_path)?;

    let extract_dir = staging.path().join("extract");
    std::fs::create_dir_all(&extract_dir)?;
    extract(&archive_path, descriptor.kind, &extract_dir)?;

    let target = registry.build_path(identifier);
    publish(&extract_dir, &target)?;
    log::info!("published {identifier}");
    Ok(InstallOutcome::Installed(target))
}

fn archive_file_name(descriptor: &ArtifactDescriptor) -> String {
    descriptor
        .url
        .split('/')
        .next_back()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("jdk.{}", descriptor.kind.suffix()))
}

/// Streams the artifact into `dest`. The file is only complete once the
/// transfer has signalled completion; a connection dropped mid-body
/// surfaces as an error instead of a short file.
fn download(descriptor: &ArtifactDescriptor, dest: &Path) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let mut request = client.get(&descriptor.url);
    for (name, value) in &descriptor.headers {
        request = request.header(*name, value);
    }
    let mut response = request.send()?.error_for_status()?;
    let mut file = File::create(dest)?;
    response.copy_to(&mut file)?;
    Ok(())
}

fn extract(archive: &Path, kind: ArchiveKind, dest: &Path) -> Result<()> {
    match kind {
        ArchiveKind::Zip => {
            let file = File::open(archive)?;
            let mut zip = zip::ZipArchive::new(file)?;
            zip.extract(dest)?;
        }
        ArchiveKind::TarGz => {
            let file = File::open(archive)?;
            let mut tar = tar::Archive::new(GzDecoder::new(file));
            tar.unpack(dest)
                .map_err(|err| JvmError::Extraction(err.to_string()))?;
        }
    }
    Ok(())
}

/// Moves the extracted contents under the final target name.
///
/// Most vendor archives wrap everything in a single top-level directory
/// (e.g. `jdk-21.0.1/`); that wrapper is stripped so the build's `bin`,
/// `lib` etc. sit directly under the target. The wrapper case is a single
/// rename; the flat case renames entry by entry into a fresh target and
/// tears the target down again if any move fails.
fn publish(extract_root: &Path, target: &Path) -> Result<()> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(extract_root)? {
        entries.push(entry?.path());
    }

    if let [only] = entries.as_slice() {
        if only.is_dir() {
            std::fs::rename(only, target)?;
            return Ok(());
        }
    }

    std::fs::create_dir_all(target)?;
    for entry in &entries {
        let name = entry
            .file_name()
            .ok_or_else(|| JvmError::Extraction("unnamed archive entry".to_string()))?;
        if let Err(err) = std::fs::rename(entry, target.join(name)) {
            let _ = std::fs::remove_dir_all(target);
            return Err(err.into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::tempdir;

    fn tar_gz_with(paths: &[(&str, &[u8])], dest: &Path) {
        let file = File::create(dest).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, content) in paths {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, path, *content).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_and_publish_strips_wrapping_dir() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("jdk.tar.gz");
        tar_gz_with(
            &[
                ("jdk-21.0.1/bin/java", b"#!/bin/java"),
                ("jdk-21.0.1/lib/modules", b"modules"),
            ],
            &archive,
        );

        let extract_dir = dir.path().join("extract");
        std::fs::create_dir_all(&extract_dir).unwrap();
        extract(&archive, ArchiveKind::TarGz, &extract_dir).unwrap();

        let target = dir.path().join("jdk-21.0.1");
        publish(&extract_dir, &target).unwrap();
        assert!(target.join("bin/java").exists());
        assert!(target.join("lib/modules").exists());
        assert!(!target.join("jdk-21.0.1").exists());
    }

    #[test]
    fn test_publish_flat_archive_keeps_entries() {
        let dir = tempdir().unwrap();
        let extract_dir = dir.path().join("extract");
        std::fs::create_dir_all(extract_dir.join("bin")).unwrap();
        std::fs::write(extract_dir.join("bin/java"), b"java").unwrap();
        std::fs::write(extract_dir.join("release"), b"JAVA_VERSION=21").unwrap();

        let target = dir.path().join("jdk-21");
        publish(&extract_dir, &target).unwrap();
        assert!(target.join("bin/java").exists());
        assert!(target.join("release").exists());
    }

    #[test]
    fn test_publish_single_file_is_not_unwrapped() {
        let dir = tempdir().unwrap();
        let extract_dir = dir.path().join("extract");
        std::fs::create_dir_all(&extract_dir).unwrap();
        std::fs::write(extract_dir.join("release"), b"JAVA_VERSION=21").unwrap();

        let target = dir.path().join("jdk-21");
        publish(&extract_dir, &target).unwrap();
        assert!(target.join("release").exists());
    }

    #[test]
    fn test_failed_extraction_leaves_no_build_and_no_staging() {
        let dir = tempdir().unwrap();
        let registry = Registry::open(dir.path()).unwrap();
        let identifier = "jdk-21";

        {
            let staging = tempfile::Builder::new()
                .prefix("jvm-install-")
                .tempdir_in(registry.staging_root().unwrap())
                .unwrap();
            let archive = staging.path().join("jdk.tar.gz");
            let mut file = File::create(&archive).unwrap();
            file.write_all(b"this is not a gzip stream").unwrap();

            let extract_dir = staging.path().join("extract");
            std::fs::create_dir_all(&extract_dir).unwrap();
            let err = extract(&archive, ArchiveKind::TarGz, &extract_dir).unwrap_err();
            assert!(matches!(err, JvmError::Extraction(_)));
        }

        assert!(!registry.is_installed(identifier));
        assert!(registry.list_builds().unwrap().is_empty());
        let staged: Vec<_> = std::fs::read_dir(registry.staging_root().unwrap())
            .unwrap()
            .collect();
        assert!(staged.is_empty());
    }

    #[test]
    fn test_install_is_idempotent_for_existing_target() {
        let dir = tempdir().unwrap();
        let registry = Registry::open(dir.path()).unwrap();
        std::fs::create_dir_all(registry.build_path("jdk-17")).unwrap();

        // Unreachable URL: the pre-check must short-circuit before any
        // network activity.
        let descriptor = ArtifactDescriptor {
            url: "http://127.0.0.1:9/jdk-17.tar.gz".to_string(),
            kind: ArchiveKind::TarGz,
            headers: Vec::new(),
        };
        let outcome = install_artifact(&registry, &descriptor, "jdk-17").unwrap();
        assert!(matches!(outcome, InstallOutcome::AlreadyInstalled));
    }

    #[test]
    fn test_archive_file_name_from_url() {
        let descriptor = ArtifactDescriptor {
            url: "https://download.oracle.com/java/21/latest/jdk-21_linux-x64_bin.tar.gz"
                .to_string(),
            kind: ArchiveKind::TarGz,
            headers: Vec::new(),
        };
        assert_eq!(archive_file_name(&descriptor), "jdk-21_linux-x64_bin.tar.gz");
    }
}
