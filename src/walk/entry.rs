use crate::fs::{FileType, Metadata};
use crate::util;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt as _;
use std::path::Path;

/// A single visited entry, lent to the callback for the duration of one call.
///
/// The borrow is deliberate: the path buffer behind it is recycled for the
/// very next entry, so nothing here can be retained. Copy out whatever needs
/// to outlive the callback ([`Self::as_path`] + `to_path_buf` is the usual
/// route).
pub struct WalkEntry<'a> {
    pub(crate) path: &'a [u8],
    pub(crate) base: usize,
    pub(crate) depth: usize,
    pub(crate) file_type: FileType,
    pub(crate) metadata: Option<&'a Metadata>,
    pub(crate) errno: Option<i32>,
}

impl WalkEntry<'_> {
    /// Full path of the entry as raw bytes, no trailing slash.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        self.path
    }

    /// Full path as an `OsStr` (no allocation, unix paths are bytes).
    #[inline]
    #[must_use]
    pub fn as_os_str(&self) -> &OsStr {
        OsStr::from_bytes(self.path)
    }

    /// Full path as a borrowed `Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_os_str())
    }

    /// Offset where the final component starts within [`Self::as_bytes`].
    #[inline]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// The final path component, equal to `as_bytes()[base()..]`.
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &[u8] {
        // base is always a component boundary within path
        self.path.get(self.base..).unwrap_or_default()
    }

    /// The parent portion of the path, `.` or `/` at the boundaries.
    #[inline]
    #[must_use]
    pub fn dirname(&self) -> &[u8] {
        util::dirname(self.path)
    }

    /// Depth below the walk root, the root itself is 0.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The entry's classification.
    #[inline]
    #[must_use]
    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Stat metadata, present when metadata fetching was requested or the
    /// classifier statted anyway: the root (always classified with `lstat`)
    /// and entries whose type hint needed resolving.
    #[inline]
    #[must_use]
    pub const fn metadata(&self) -> Option<&Metadata> {
        self.metadata
    }

    /// The captured OS error code, set only when `file_type()` is
    /// [`FileType::Error`].
    #[inline]
    #[must_use]
    pub const fn errno(&self) -> Option<i32> {
        self.errno
    }

    /// Returns `true` if the file name starts with a dot.
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.file_name().first() == Some(&b'.')
    }

    /// Lossy UTF-8 rendition of the full path.
    #[inline]
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.path)
    }
}

impl core::fmt::Debug for WalkEntry<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WalkEntry")
            .field("path", &self.to_string_lossy())
            .field("base", &self.base)
            .field("depth", &self.depth)
            .field("file_type", &self.file_type)
            .field("errno", &self.errno)
            .finish_non_exhaustive()
    }
}

impl core::fmt::Display for WalkEntry<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}
