use std::io;
use std::path::{Path, PathBuf};

/// Custom error enum to handle multiple error types in the walk
#[derive(Debug)]
pub enum WalkError {
    /// The starting path contained an interior NUL byte
    NulByte(std::ffi::NulError),
    /// The starting path could not be statted or opened, always fatal
    Root {
        /// The root path as given
        path: PathBuf,
        /// The underlying OS error
        source: io::Error,
    },
    /// A directory below the root failed to open, read or stat while the
    /// walk was in strict mode
    Entry {
        /// Full path of the entry that failed
        path: PathBuf,
        /// The underlying OS error
        source: io::Error,
    },
}

#[allow(clippy::pattern_type_mismatch)]
impl WalkError {
    /// The raw OS error code behind this error, if there is one.
    #[must_use]
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::NulByte(_) => None,
            Self::Root { source, .. } | Self::Entry { source, .. } => source.raw_os_error(),
        }
    }

    /// The path the walk was looking at when it failed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NulByte(_) => None,
            Self::Root { path, .. } | Self::Entry { path, .. } => Some(path),
        }
    }
}

#[allow(clippy::pattern_type_mismatch)]
impl core::fmt::Display for WalkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NulByte(e) => write!(f, "Starting path contains a NUL byte: {e}"),
            Self::Root { path, source } => {
                write!(f, "Cannot walk {}: {source}", path.display())
            }
            Self::Entry { path, source } => {
                write!(f, "Traversal failed at {}: {source}", path.display())
            }
        }
    }
}

#[allow(clippy::pattern_type_mismatch)]
impl std::error::Error for WalkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NulByte(e) => Some(e),
            Self::Root { source, .. } | Self::Entry { source, .. } => Some(source),
        }
    }
}

impl From<std::ffi::NulError> for WalkError {
    fn from(error: std::ffi::NulError) -> Self {
        Self::NulByte(error)
    }
}
