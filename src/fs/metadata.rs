use crate::fs::FileType;
use chrono::{DateTime, Utc};

/// A snapshot of `lstat`-style metadata for a single entry.
///
/// Symlinks are never followed, so for a symlink this describes the link
/// itself rather than its target.
#[derive(Clone, Copy)]
pub struct Metadata(pub(crate) libc::stat);

impl Metadata {
    /// The inode number.
    #[inline]
    #[must_use]
    pub const fn ino(&self) -> u64 {
        access_stat!(self.0, st_ino)
    }

    /// The device id of the filesystem holding the entry.
    #[inline]
    #[must_use]
    pub const fn dev(&self) -> u64 {
        access_stat!(self.0, st_dev)
    }

    /// The full `st_mode`, permission bits included.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.0.st_mode as u32
    }

    /// Number of hard links.
    #[inline]
    #[must_use]
    pub const fn nlink(&self) -> u64 {
        access_stat!(self.0, st_nlink)
    }

    /// Size in bytes.
    #[expect(clippy::cast_sign_loss, reason = "file sizes are never negative")]
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.0.st_size as u64
    }

    /// Returns `true` if the entry has zero length.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.st_size == 0
    }

    /// The entry's type, derived from `st_mode`.
    #[inline]
    #[must_use]
    pub const fn file_type(&self) -> FileType {
        FileType::from_mode(self.0.st_mode)
    }

    /// Last modification time, `None` if the timestamp is out of chrono's range.
    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(
            access_stat!(self.0, st_mtime),
            access_stat!(self.0, st_mtimensec),
        )
    }

    /// Last access time, `None` if the timestamp is out of chrono's range.
    #[must_use]
    pub fn accessed(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(
            access_stat!(self.0, st_atime),
            access_stat!(self.0, st_atimensec),
        )
    }
}

impl core::fmt::Debug for Metadata {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Metadata")
            .field("file_type", &self.file_type())
            .field("len", &self.len())
            .field("ino", &self.ino())
            .field("dev", &self.dev())
            .finish_non_exhaustive()
    }
}
