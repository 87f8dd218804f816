use core::fmt;
use libc::{
    DT_BLK, DT_CHR, DT_DIR, DT_FIFO, DT_LNK, DT_REG, DT_SOCK, S_IFBLK, S_IFCHR, S_IFDIR, S_IFIFO,
    S_IFLNK, S_IFMT, S_IFREG, S_IFSOCK, mode_t,
};

/// Classification of a visited filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Block device
    BlockDevice,
    /// Character device
    CharDevice,
    /// Directory
    Directory,
    /// Named pipe (FIFO)
    Fifo,
    /// Symbolic link, never followed by the walker
    Symlink,
    /// Regular file
    RegularFile,
    /// Unix domain socket
    Socket,
    /// The type could not be determined cheaply
    Unknown,
    /// An I/O failure occurred while processing this path; the entry carries
    /// the captured errno instead of metadata
    Error,
}

impl FileType {
    /// Classifies from the `d_type` hint of a directory entry.
    ///
    /// Filesystems that don't fill `d_type` in (and a few whole platforms)
    /// report `DT_UNKNOWN`, which maps to [`FileType::Unknown`].
    #[inline]
    #[must_use]
    pub const fn from_dtype(d_type: u8) -> Self {
        match d_type {
            DT_BLK => Self::BlockDevice,
            DT_CHR => Self::CharDevice,
            DT_DIR => Self::Directory,
            DT_FIFO => Self::Fifo,
            DT_LNK => Self::Symlink,
            DT_REG => Self::RegularFile,
            DT_SOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }

    /// Classifies from the `st_mode` field of a stat structure.
    #[inline]
    #[must_use]
    pub const fn from_mode(mode: mode_t) -> Self {
        match mode & S_IFMT {
            S_IFBLK => Self::BlockDevice,
            S_IFCHR => Self::CharDevice,
            S_IFDIR => Self::Directory,
            S_IFIFO => Self::Fifo,
            S_IFLNK => Self::Symlink,
            S_IFREG => Self::RegularFile,
            S_IFSOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }

    /// Returns `true` if this is a directory.
    #[inline]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a regular file.
    #[inline]
    #[must_use]
    pub const fn is_regular_file(&self) -> bool {
        matches!(self, Self::RegularFile)
    }

    /// Returns `true` if this is a symlink.
    #[inline]
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }

    /// Returns `true` if this is a block device.
    #[inline]
    #[must_use]
    pub const fn is_block_device(&self) -> bool {
        matches!(self, Self::BlockDevice)
    }

    /// Returns `true` if this is a character device.
    #[inline]
    #[must_use]
    pub const fn is_char_device(&self) -> bool {
        matches!(self, Self::CharDevice)
    }

    /// Returns `true` if this is a named pipe.
    #[inline]
    #[must_use]
    pub const fn is_pipe(&self) -> bool {
        matches!(self, Self::Fifo)
    }

    /// Returns `true` if this is a unix socket.
    #[inline]
    #[must_use]
    pub const fn is_socket(&self) -> bool {
        matches!(self, Self::Socket)
    }

    /// Returns `true` if the type could not be determined.
    #[inline]
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns `true` if this entry reports an I/O failure.
    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for FileType {
    #[allow(clippy::pattern_type_mismatch)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BlockDevice => "block device",
            Self::CharDevice => "char device",
            Self::Directory => "directory",
            Self::Fifo => "pipe",
            Self::Symlink => "symlink",
            Self::RegularFile => "regular file",
            Self::Socket => "socket",
            Self::Unknown => "unknown",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}
