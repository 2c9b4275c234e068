use thiserror::Error;

/// Errors produced by the jvm core library.
///
/// Every variant is recovered at the command boundary in the binary and
/// turned into a human-readable message plus a non-zero exit, except
/// [`JvmError::AlreadyInstalled`], which is a friendly no-op.
#[derive(Error, Debug)]
pub enum JvmError {
    #[error("Version not found: {0}")]
    NotFound(String),

    #[error("{0} is already installed.")]
    AlreadyInstalled(String),

    #[error("No versions installed yet.")]
    NoVersionsInstalled,

    #[error("Unknown vendor: {0} (expected 'oracle' or 'temurin')")]
    UnsupportedVendor(String),

    #[error("No matching asset for JDK {version} on {platform}")]
    AssetNotFound { version: String, platform: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to extract archive: {0}")]
    Extraction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Privileged environment update failed: {0}")]
    Privileged(String),

    #[error("Could not determine the home directory")]
    NoHome,
}

impl From<zip::result::ZipError> for JvmError {
    fn from(err: zip::result::ZipError) -> Self {
        JvmError::Extraction(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JvmError>;
