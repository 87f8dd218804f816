//! Thin wrappers over the raw filesystem syscalls the walker is built on.

mod dir_fd;
mod file_type;
mod metadata;
mod read_dir;

pub(crate) use dir_fd::DirFd;
pub use file_type::FileType;
pub use metadata::Metadata;
pub(crate) use read_dir::DirReader;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) use libc::dirent64;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) use libc::dirent as dirent64;

/// Getdents buffer size, chosen after benchmarking sizes between 4k-10MB
#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    not(debug_assertions)
))]
pub(crate) const DENT_BUF_SIZE: usize = 4096 * 8;

// Miri runs out of patience with big uninitialised buffers
#[cfg(all(any(target_os = "linux", target_os = "android"), debug_assertions))]
pub(crate) const DENT_BUF_SIZE: usize = 4096;
