//! Runtime identity of jvpy: version, build timestamp and source-control
//! position, loaded once per process from `version.properties`.
//!
//! The hosting entry point calls [`initialize`] (or [`initialize_from`])
//! at startup; everything else reads through [`current`].

pub mod config;
pub mod error;
pub mod host;
pub mod properties;
pub mod source;

use std::fmt;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::debug;

pub use error::{MalformedReason, VersionError, VersionResult};
pub use host::{HostEnvironment, ProcessEnvironment};
pub use properties::Properties;
pub use source::{FileSource, MetadataHandle, MetadataSource};

pub mod keys {
    pub const VERSION: &str = "jvm.python.version";
    pub const MAJOR_VERSION: &str = "jvm.python.major_version";
    pub const MINOR_VERSION: &str = "jvm.python.minor_version";
    pub const MICRO_VERSION: &str = "jvm.python.micro_version";
    pub const RELEASE_LEVEL: &str = "jvm.python.release_level";
    pub const RELEASE_SERIAL: &str = "jvm.python.release_serial";
    pub const BUILD_DATE: &str = "jvm.python.build.date";
    pub const BUILD_TIME: &str = "jvm.python.build.time";
    pub const SCM_BRANCH: &str = "jvm.python.build.hg_branch";
    pub const SCM_TAG: &str = "jvm.python.build.hg_tag";
    pub const SCM_REVISION_ID: &str = "jvm.python.build.hg_version";
}

/// Tag value meaning "no tag assigned".
pub const UNTAGGED: &str = "tip";

const MAX_BUILD_DATE: usize = 20;
const MAX_BUILD_TIME: usize = 9;
const MAX_SUMMARY_PART: usize = 80;

static STATE: OnceCell<VersionInfo> = OnceCell::new();

/// Release level codes as stored in `release_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseLevel {
    Alpha,
    Beta,
    Candidate,
    Final,
}

impl ReleaseLevel {
    /// Level for a stored code; `None` for unknown codes.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0xA => Some(ReleaseLevel::Alpha),
            0xB => Some(ReleaseLevel::Beta),
            0xC => Some(ReleaseLevel::Candidate),
            0xF => Some(ReleaseLevel::Final),
            _ => None,
        }
    }

    /// Inverse of [`ReleaseLevel::from_code`].
    pub fn code(self) -> i32 {
        match self {
            ReleaseLevel::Alpha => 0xA,
            ReleaseLevel::Beta => 0xB,
            ReleaseLevel::Candidate => 0xC,
            ReleaseLevel::Final => 0xF,
        }
    }

    /// Lowercase name, e.g. `"candidate"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseLevel::Alpha => "alpha",
            ReleaseLevel::Beta => "beta",
            ReleaseLevel::Candidate => "candidate",
            ReleaseLevel::Final => "final",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            ReleaseLevel::Alpha => "a",
            ReleaseLevel::Beta => "b",
            ReleaseLevel::Candidate => "rc",
            ReleaseLevel::Final => "",
        }
    }
}

/// `(major, minor, micro, level, serial)` view of the version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionTuple {
    pub major: i32,
    pub minor: i32,
    pub micro: i32,
    pub release_level: Option<ReleaseLevel>,
    pub serial: i32,
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        match self.release_level {
            Some(level) if level != ReleaseLevel::Final => {
                write!(f, "{}{}", level.suffix(), self.serial)
            }
            _ => Ok(()),
        }
    }
}

/// Version and build fields parsed from the metadata resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    version: String,
    major_version: i32,
    minor_version: i32,
    micro_version: i32,
    release_level: i32,
    release_serial: i32,
    build_date: String,
    build_time: String,
    scm_branch: String,
    scm_tag: String,
    scm_revision_id: String,
}

impl VersionInfo {
    /// Read and parse `source`. The handle is closed on every path.
    pub fn load(source: &dyn MetadataSource) -> VersionResult<Self> {
        let path = source.location().to_path_buf();
        let bytes = crate::source::with_resource(source, |handle| {
            handle
                .read_all()
                .map_err(|err| VersionError::MetadataUnavailable {
                    path: path.clone(),
                    source: err,
                })
        })?;

        Properties::from_bytes(&bytes)
            .and_then(|props| Self::from_properties(&props))
            .map_err(|reason| VersionError::MetadataMalformed { path, reason })
    }

    /// Build from already-parsed properties; every key is required.
    pub fn from_properties(props: &Properties) -> Result<Self, MalformedReason> {
        Ok(Self {
            version: required(props, keys::VERSION)?.to_string(),
            major_version: integer(props, keys::MAJOR_VERSION)?,
            minor_version: integer(props, keys::MINOR_VERSION)?,
            micro_version: integer(props, keys::MICRO_VERSION)?,
            release_level: integer(props, keys::RELEASE_LEVEL)?,
            release_serial: integer(props, keys::RELEASE_SERIAL)?,
            build_date: required(props, keys::BUILD_DATE)?.to_string(),
            build_time: required(props, keys::BUILD_TIME)?.to_string(),
            scm_branch: required(props, keys::SCM_BRANCH)?.to_string(),
            scm_tag: required(props, keys::SCM_TAG)?.to_string(),
            scm_revision_id: required(props, keys::SCM_REVISION_ID)?.to_string(),
        })
    }

    /// Dotted version string, e.g. `3.9.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Major component of the version.
    pub fn major_version(&self) -> i32 {
        self.major_version
    }

    /// Minor component of the version.
    pub fn minor_version(&self) -> i32 {
        self.minor_version
    }

    /// Micro component of the version.
    pub fn micro_version(&self) -> i32 {
        self.micro_version
    }

    /// Raw release level code (see [`ReleaseLevel`]).
    pub fn release_level(&self) -> i32 {
        self.release_level
    }

    /// Serial number within the release level.
    pub fn release_serial(&self) -> i32 {
        self.release_serial
    }

    /// Build date as written by the build.
    pub fn build_date(&self) -> &str {
        &self.build_date
    }

    /// Build time as written by the build.
    pub fn build_time(&self) -> &str {
        &self.build_time
    }

    /// Branch the build was made from.
    pub fn scm_branch(&self) -> &str {
        &self.scm_branch
    }

    /// Tag at build time; may be empty or [`UNTAGGED`].
    pub fn scm_tag(&self) -> &str {
        &self.scm_tag
    }

    /// Global revision id; empty when the build could not determine it.
    pub fn scm_revision_id(&self) -> &str {
        &self.scm_revision_id
    }

    /// Decoded `release_level`, `None` for codes outside alpha/beta/candidate/final.
    pub fn release_level_kind(&self) -> Option<ReleaseLevel> {
        ReleaseLevel::from_code(self.release_level)
    }

    /// Version as a [`VersionTuple`], e.g. `3.10.0b2`.
    pub fn version_info(&self) -> VersionTuple {
        VersionTuple {
            major: self.major_version,
            minor: self.minor_version,
            micro: self.micro_version,
            release_level: self.release_level_kind(),
            serial: self.release_serial,
        }
    }

    /// Packed `major.minor.micro.level.serial`, e.g. `0x030900f0` for 3.9.0 final.
    pub fn hex_version(&self) -> u32 {
        (((self.major_version & 0xff) as u32) << 24)
            | (((self.minor_version & 0xff) as u32) << 16)
            | (((self.micro_version & 0xff) as u32) << 8)
            | (((self.release_level & 0xf) as u32) << 4)
            | ((self.release_serial & 0xf) as u32)
    }

    /// The tag, unless it is empty or [`UNTAGGED`]; the branch otherwise.
    pub fn scm_identifier(&self) -> &str {
        if self.scm_tag.is_empty() || self.scm_tag == UNTAGGED {
            &self.scm_branch
        } else {
            &self.scm_tag
        }
    }

    /// `<identifier>[:<revision>], <date:20>, <time:9>`
    pub fn build_descriptor(&self) -> String {
        let revision = self.scm_revision_id();
        let separator = if revision.is_empty() { "" } else { ":" };
        format!(
            "{}{}{}, {:.date$}, {:.time$}",
            self.scm_identifier(),
            separator,
            revision,
            self.build_date,
            self.build_time,
            date = MAX_BUILD_DATE,
            time = MAX_BUILD_TIME,
        )
    }

    /// Hosting runtime, read from the live process environment.
    pub fn host_descriptor(&self) -> String {
        host::describe(&ProcessEnvironment)
    }

    /// `<version> (<build descriptor>)` and the host descriptor on a second line.
    pub fn full_version_string(&self) -> String {
        self.full_version_string_with(&ProcessEnvironment)
    }

    /// Each of the three parts is cut to 80 characters on its own.
    pub fn full_version_string_with(&self, host: &dyn HostEnvironment) -> String {
        format!(
            "{:.max$} ({:.max$})\n{:.max$}",
            self.version,
            self.build_descriptor(),
            host::describe(host),
            max = MAX_SUMMARY_PART,
        )
    }
}

fn required<'a>(props: &'a Properties, key: &'static str) -> Result<&'a str, MalformedReason> {
    props.get(key).ok_or(MalformedReason::MissingKey(key))
}

fn integer(props: &Properties, key: &'static str) -> Result<i32, MalformedReason> {
    let raw = required(props, key)?;
    raw.parse::<i32>()
        .map_err(|source| MalformedReason::InvalidInteger {
            key,
            value: raw.to_string(),
            source,
        })
}

/// Load from the default location (see [`config`]) unless already loaded.
pub fn initialize() -> VersionResult<&'static VersionInfo> {
    STATE.get_or_try_init(|| {
        let location = config::resolve_location(None)?;
        load_logged(&FileSource::new(location.path), location.source)
    })
}

/// Load from `path` unless already loaded. Once a load has succeeded,
/// later calls return that state whatever path they name.
pub fn initialize_from(path: impl AsRef<Path>) -> VersionResult<&'static VersionInfo> {
    let path = path.as_ref();
    STATE.get_or_try_init(|| {
        let location = config::resolve_location(Some(path))?;
        load_logged(&FileSource::new(location.path), location.source)
    })
}

/// Load from an arbitrary source unless already loaded.
pub fn initialize_with(source: &dyn MetadataSource) -> VersionResult<&'static VersionInfo> {
    STATE.get_or_try_init(|| load_logged(source, "param"))
}

/// The loaded state, or [`VersionError::NotInitialized`].
pub fn current() -> VersionResult<&'static VersionInfo> {
    STATE.get().ok_or(VersionError::NotInitialized)
}

/// Whether a load has succeeded in this process.
pub fn is_initialized() -> bool {
    STATE.get().is_some()
}

fn load_logged(source: &dyn MetadataSource, origin: &str) -> VersionResult<VersionInfo> {
    debug!(
        "loading version metadata from {} ({})",
        source.location().display(),
        origin
    );
    let info = VersionInfo::load(source)?;
    debug!(
        "version metadata ready: {} ({})",
        info.version(),
        info.build_descriptor()
    );
    Ok(info)
}
