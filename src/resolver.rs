use semver::{Version, VersionReq};

/// Pure version matching over installed build identifiers.
///
/// Resolution order (first rule that yields exactly one candidate wins):
///
/// 1. exact identifier match
/// 2. unique `jdk-<input>` prefix match; an ambiguous prefix falls through
/// 3. semver range match over the version portion of each identifier,
///    pre-releases included, maximum version wins
///
/// Identifiers are compared in lexical order, so a version tie between
/// vendors resolves to the lexically smallest identifier.
pub fn resolve(installed: &[String], input: &str) -> Option<String> {
    resolve_with_prefix(installed, input, &format!("jdk-{input}"))
}

/// Resolution variant used by uninstall: the prefix rule also accepts an
/// input that already carries the `jdk-` family prefix.
pub fn resolve_for_removal(installed: &[String], input: &str) -> Option<String> {
    let prefix = if input.starts_with("jdk-") {
        input.to_string()
    } else {
        format!("jdk-{input}")
    };
    resolve_with_prefix(installed, input, &prefix)
}

fn resolve_with_prefix(installed: &[String], input: &str, prefix: &str) -> Option<String> {
    if installed.iter().any(|id| id == input) {
        return Some(input.to_string());
    }

    let prefix_matches: Vec<&String> =
        installed.iter().filter(|id| id.starts_with(prefix)).collect();
    if prefix_matches.len() == 1 {
        return Some(prefix_matches[0].clone());
    }

    max_satisfying(installed, input)
}

/// Maximum installed version satisfying `input` as a semver range.
/// Identifiers whose version portion is not valid semver are skipped.
fn max_satisfying(installed: &[String], input: &str) -> Option<String> {
    let req = VersionReq::parse(input).ok()?;

    let mut candidates: Vec<(&String, Version)> = installed
        .iter()
        .filter_map(|id| version_portion(id).map(|v| (id, v)))
        .filter(|(_, v)| matches_with_prerelease(&req, v))
        .collect();
    candidates.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut best: Option<(&String, Version)> = None;
    for (id, version) in candidates {
        match &best {
            Some((_, max)) if version <= *max => {}
            _ => best = Some((id, version)),
        }
    }
    best.map(|(id, _)| id.clone())
}

/// Extracts the semver portion of an identifier: the `jdk-` family prefix
/// and any trailing `(vendor)` suffix are stripped.
fn version_portion(identifier: &str) -> Option<Version> {
    let stripped = identifier.strip_prefix("jdk-").unwrap_or(identifier);
    let stripped = match stripped.find('(') {
        Some(at) => stripped[..at].trim_end(),
        None => stripped,
    };
    Version::parse(stripped).ok()
}

/// Range matching with pre-release versions in the candidate set, the way
/// `maxSatisfying(…, { includePrerelease: true })` behaves.
fn matches_with_prerelease(req: &VersionReq, version: &Version) -> bool {
    if req.matches(version) {
        return true;
    }
    if version.pre.is_empty() {
        return false;
    }
    let released = Version::new(version.major, version.minor, version.patch);
    req.matches(&released)
}
