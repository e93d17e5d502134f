//! Scoped access to the metadata resource.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{VersionError, VersionResult};

/// An opened metadata resource.
pub trait MetadataHandle {
    fn read_all(&mut self) -> io::Result<Vec<u8>>;

    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Something that can hand out a [`MetadataHandle`] for a known location.
pub trait MetadataSource {
    fn location(&self) -> &Path;

    fn open(&self) -> io::Result<Box<dyn MetadataHandle>>;
}

/// The on-disk resource.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetadataSource for FileSource {
    fn location(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> io::Result<Box<dyn MetadataHandle>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(FileHandle { file }))
    }
}

struct FileHandle {
    file: File,
}

impl MetadataHandle for FileHandle {
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        drop(self.file);
        Ok(())
    }
}

/// Open `source`, run `f` on the handle and close it again, whatever `f`
/// returned. The result of `f` is passed through untouched.
pub fn with_resource<T, F>(source: &dyn MetadataSource, f: F) -> VersionResult<T>
where
    F: FnOnce(&mut dyn MetadataHandle) -> VersionResult<T>,
{
    let path = source.location();
    let mut handle = source
        .open()
        .map_err(|err| VersionError::MetadataUnavailable {
            path: path.to_path_buf(),
            source: err,
        })?;
    debug!("opened metadata resource {}", path.display());

    let result = f(handle.as_mut());

    if let Err(err) = handle.close() {
        release_failed(path, &err);
    }
    result
}

/// Close failures are reported and otherwise ignored.
pub fn release_failed(path: &Path, err: &io::Error) {
    warn!(
        "failed to release metadata resource {}: {} (ignored)",
        path.display(),
        err
    );
}
