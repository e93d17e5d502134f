//! Where the metadata resource is looked up.
//!
//! Resolution order:
//! 1. an explicit path from the hosting code
//! 2. `JVPY_VERSION_PROPERTIES`
//! 3. `version.properties` next to the running executable

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{VersionError, VersionResult};

/// Fixed logical name of the resource generated by the build.
pub const RESOURCE_NAME: &str = "version.properties";

/// Environment override for the resource path.
pub const PATH_ENV: &str = "JVPY_VERSION_PROPERTIES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub path: PathBuf,
    pub source: &'static str, // "param" | "env" | "default"
}

/// Resolve against the live process environment.
pub fn resolve_location(explicit: Option<&Path>) -> VersionResult<ResolvedLocation> {
    resolve_with(explicit, env::var(PATH_ENV).ok(), env::current_exe())
}

pub(crate) fn resolve_with(
    explicit: Option<&Path>,
    env_value: Option<String>,
    current_exe: io::Result<PathBuf>,
) -> VersionResult<ResolvedLocation> {
    if let Some(path) = explicit {
        return Ok(ResolvedLocation {
            path: path.to_path_buf(),
            source: "param",
        });
    }

    if let Some(raw) = env_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Ok(ResolvedLocation {
                path: PathBuf::from(trimmed),
                source: "env",
            });
        }
    }

    let exe = current_exe.map_err(|err| VersionError::MetadataUnavailable {
        path: PathBuf::from(RESOURCE_NAME),
        source: err,
    })?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(ResolvedLocation {
        path: dir.join(RESOURCE_NAME),
        source: "default",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let resolved = resolve_with(
            Some(Path::new("/etc/jvpy/version.properties")),
            Some("/tmp/other.properties".into()),
            Ok(PathBuf::from("/usr/bin/jvpy")),
        )
        .unwrap();
        assert_eq!(resolved.path, PathBuf::from("/etc/jvpy/version.properties"));
        assert_eq!(resolved.source, "param");
    }

    #[test]
    fn env_before_default() {
        let resolved = resolve_with(
            None,
            Some(" /tmp/other.properties ".into()),
            Ok(PathBuf::from("/usr/bin/jvpy")),
        )
        .unwrap();
        assert_eq!(resolved.path, PathBuf::from("/tmp/other.properties"));
        assert_eq!(resolved.source, "env");
    }

    #[test]
    fn blank_env_falls_back_to_exe_dir() {
        let resolved =
            resolve_with(None, Some("   ".into()), Ok(PathBuf::from("/usr/bin/jvpy"))).unwrap();
        assert_eq!(resolved.path, PathBuf::from("/usr/bin/version.properties"));
        assert_eq!(resolved.source, "default");
    }

    #[test]
    fn unknown_exe_is_unavailable() {
        let err = resolve_with(
            None,
            None,
            Err(io::Error::new(io::ErrorKind::NotFound, "no exe")),
        )
        .unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains(RESOURCE_NAME));
    }
}
