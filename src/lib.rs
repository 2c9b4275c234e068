//! # jvm Core Library
//!
//! This crate contains the core logic and building blocks of the `jvm` tool – a simple
//! version manager for JDK builds installed under `~/.jvm`.
//!
//! `jvm` keeps one directory per installed build in `~/.jvm/versions`, switches the
//! active build through the `~/.jvm/current` symlink plus `JAVA_HOME`, and installs
//! new builds by downloading and unpacking vendor archives (Oracle, Temurin).
//!
//! This library is built for the `jvm` CLI, but you can also reuse it as a backend in other tools.
//!
//! ## Modules Overview
//! - [`registry`] – The on-disk store of installed builds and the active pointer
//! - [`resolver`] – Matching a version specifier (exact, prefix, semver range) to a build
//! - [`vendor`] – Resolving a vendor+version pair to a downloadable artifact
//! - [`installer`] – Downloading, extracting and publishing builds
//! - [`activate`] – Switching the active build and the `JAVA_HOME`/PATH effects
//! - [`error`] – Shared error type ([`JvmError`])

pub mod error;
pub mod registry;
pub mod resolver;
pub mod vendor;
pub mod installer;
pub mod activate;

pub use error::*;
pub use registry::*;
pub use resolver::*;
pub use vendor::*;
pub use installer::*;
pub use activate::*;
