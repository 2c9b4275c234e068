use std::str::FromStr;
use serde::Deserialize;
use crate::error::{JvmError, Result};

/// Cookie Oracle requires on every probe and download to acknowledge the
/// license terms.
pub const ORACLE_LICENSE_COOKIE: &str = "oraclelicense=accept-securebackup-cookie";

const USER_AGENT: &str = concat!("jvm/", env!("CARGO_PKG_VERSION"));

/// Archive formats the installer knows how to unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    pub fn suffix(self) -> &'static str {
        match self {
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::Zip => "zip",
        }
    }

    /// Archive kind vendors publish for the current host OS.
    pub fn for_host() -> Self {
        if cfg!(windows) { ArchiveKind::Zip } else { ArchiveKind::TarGz }
    }
}

/// Resolved download location for one vendor+version pair. Consumed by a
/// single install operation.
#[derive(Debug, Clone)]
pub struct ArtifactDescriptor {
    pub url: String,
    pub kind: ArchiveKind,
    /// Extra request headers (name, value) required by the vendor, applied
    /// to every request for this artifact.
    pub headers: Vec<(&'static str, String)>,
}

/// Upstream JDK vendors. Each variant maps a version string to a concrete
/// downloadable artifact; adding a vendor means adding a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vendor {
    #[default]
    Oracle,
    Temurin,
}

impl FromStr for Vendor {
    type Err = JvmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "oracle" => Ok(Vendor::Oracle),
            "temurin" | "adoptium" => Ok(Vendor::Temurin),
            other => Err(JvmError::UnsupportedVendor(other.to_string())),
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vendor::Oracle => write!(f, "oracle"),
            Vendor::Temurin => write!(f, "temurin"),
        }
    }
}

impl Vendor {
    /// Build identifier published for this vendor+version. Oracle is the
    /// default vendor and keeps the bare `jdk-<version>` name; other
    /// vendors are disambiguated with a `(<vendor>)` suffix.
    pub fn build_identifier(&self, version: &str) -> String {
        match self {
            Vendor::Oracle => format!("jdk-{version}"),
            other => format!("jdk-{version}({other})"),
        }
    }

    /// Resolves a version to a downloadable artifact. Network-only: the
    /// resolver never touches the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor catalog cannot be reached or no
    /// artifact exists for this version on the current host platform.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use jvm::vendor::Vendor;
    ///
    /// let artifact = Vendor::Oracle.describe("21").unwrap();
    /// assert!(artifact.url.ends_with(".tar.gz") || artifact.url.ends_with(".zip"));
    /// ```
    pub fn describe(&self, version: &str) -> Result<ArtifactDescriptor> {
        match self {
            Vendor::Oracle => describe_oracle(version),
            Vendor::Temurin => describe_temurin(version),
        }
    }
}

/// OS → Oracle platform tag. Architecture is fixed at x64, matching the
/// upstream download matrix this tool supports.
pub fn host_platform() -> &'static str {
    if cfg!(windows) {
        "windows-x64"
    } else if cfg!(target_os = "macos") {
        "macos-x64"
    } else {
        "linux-x64"
    }
}

/// Keyword vendors embed in asset names for the current host OS.
fn host_os_keyword() -> &'static str {
    if cfg!(windows) {
        "windows"
    } else if cfg!(target_os = "macos") {
        "mac"
    } else {
        "linux"
    }
}

pub fn oracle_latest_url(version: &str) -> String {
    format!(
        "https://download.oracle.com/java/{version}/latest/jdk-{version}_{}_bin.{}",
        host_platform(),
        ArchiveKind::for_host().suffix()
    )
}

pub fn oracle_archive_url(version: &str) -> String {
    format!(
        "https://download.oracle.com/java/{version}/archive/jdk-{version}_{}_bin.{}",
        host_platform(),
        ArchiveKind::for_host().suffix()
    )
}

/// Oracle publishes deterministic URLs. The `latest` location only exists
/// for the newest release of a line; a failed HEAD probe means the version
/// moved to the `archive` location, which is a normal outcome, not an error.
fn describe_oracle(version: &str) -> Result<ArtifactDescriptor> {
    let latest = oracle_latest_url(version);
    let client = reqwest::blocking::Client::new();

    let probe = client
        .head(&latest)
        .header(reqwest::header::COOKIE, ORACLE_LICENSE_COOKIE)
        .send();

    let url = match probe {
        Ok(response) if response.status().is_success() => latest,
        _ => {
            let archive = oracle_archive_url(version);
            log::warn!("latest not found; using 'archive' instead: {archive}");
            archive
        }
    };

    Ok(ArtifactDescriptor {
        url,
        kind: ArchiveKind::for_host(),
        headers: vec![("Cookie", ORACLE_LICENSE_COOKIE.to_string())],
    })
}

#[derive(Debug, Deserialize)]
struct TemurinRelease {
    assets: Vec<TemurinAsset>,
}

#[derive(Debug, Deserialize)]
struct TemurinAsset {
    name: String,
    browser_download_url: String,
}

/// Adoptium ships Temurin builds as GitHub release assets, one repository
/// per major version.
fn describe_temurin(version: &str) -> Result<ArtifactDescriptor> {
    let major = version.split('.').next().unwrap_or(version);
    let url = format!(
        "https://api.github.com/repos/adoptium/temurin{major}-binaries/releases/latest"
    );

    let client = reqwest::blocking::Client::new();
    let release: TemurinRelease = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()?
        .error_for_status()?
        .json()?;

    let kind = ArchiveKind::for_host();
    let asset = select_asset(&release.assets, host_os_keyword(), kind.suffix())
        .ok_or_else(|| JvmError::AssetNotFound {
            version: version.to_string(),
            platform: host_platform().to_string(),
        })?;

    log::info!("selected Temurin asset {}", asset.name);
    Ok(ArtifactDescriptor {
        url: asset.browser_download_url.clone(),
        kind,
        headers: vec![("User-Agent", USER_AGENT.to_string())],
    })
}

/// First asset matching the host OS keyword and archive suffix.
fn select_asset<'a>(
    assets: &'a [TemurinAsset],
    os_keyword: &str,
    suffix: &str,
) -> Option<&'a TemurinAsset> {
    assets
        .iter()
        .find(|asset| asset.name.contains(os_keyword) && asset.name.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_from_str() {
        assert_eq!(Vendor::from_str("oracle").unwrap(), Vendor::Oracle);
        assert_eq!(Vendor::from_str("Temurin").unwrap(), Vendor::Temurin);
        assert_eq!(Vendor::from_str("adoptium").unwrap(), Vendor::Temurin);
        assert!(Vendor::from_str("zulu").is_err());
    }

    #[test]
    fn test_build_identifier() {
        assert_eq!(Vendor::Oracle.build_identifier("17"), "jdk-17");
        assert_eq!(Vendor::Temurin.build_identifier("21"), "jdk-21(temurin)");
    }

    #[test]
    fn test_oracle_urls() {
        let latest = oracle_latest_url("21");
        let archive = oracle_archive_url("21");
        assert!(latest.starts_with("https://download.oracle.com/java/21/latest/jdk-21_"));
        assert!(archive.starts_with("https://download.oracle.com/java/21/archive/jdk-21_"));
        assert!(latest.ends_with(ArchiveKind::for_host().suffix()));
    }

    #[test]
    fn test_select_asset_first_matching() {
        let assets = vec![
            TemurinAsset {
                name: "OpenJDK21U-debugimage_x64_linux_hotspot_21.0.5.tar.gz.json".into(),
                browser_download_url: "https://example.com/a.json".into(),
            },
            TemurinAsset {
                name: "OpenJDK21U-jdk_x64_linux_hotspot_21.0.5.tar.gz".into(),
                browser_download_url: "https://example.com/jdk-linux.tar.gz".into(),
            },
            TemurinAsset {
                name: "OpenJDK21U-jdk_x64_windows_hotspot_21.0.5.zip".into(),
                browser_download_url: "https://example.com/jdk-windows.zip".into(),
            },
        ];
        let selected = select_asset(&assets, "linux", "tar.gz").unwrap();
        assert_eq!(selected.browser_download_url, "https://example.com/jdk-linux.tar.gz");
        let selected = select_asset(&assets, "windows", "zip").unwrap();
        assert_eq!(selected.browser_download_url, "https://example.com/jdk-windows.zip");
    }

    #[test]
    fn test_select_asset_none_matching() {
        let assets = vec![TemurinAsset {
            name: "OpenJDK21U-sources_21.0.5.tar.gz".into(),
            browser_download_url: "https://example.com/src.tar.gz".into(),
        }];
        assert!(select_asset(&assets, "linux", "tar.gz").is_none());
    }
}
