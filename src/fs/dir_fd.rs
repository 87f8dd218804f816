use core::ffi::CStr;
use std::io;

/// An owned directory file descriptor.
///
/// The descriptor is closed in `Drop`, so every successful open is matched
/// by exactly one close no matter which error path unwinds the walk.
#[derive(Debug)]
#[repr(transparent)]
pub(crate) struct DirFd(i32);

impl DirFd {
    // O_NONBLOCK protects against a named pipe sitting where a directory
    // used to be, the open itself never blocks
    const OPEN_FLAGS: i32 = libc::O_CLOEXEC | libc::O_DIRECTORY | libc::O_NONBLOCK;

    /// Opens the directory at `path` by its textual path.
    pub(crate) fn open(path: &CStr) -> io::Result<Self> {
        // SAFETY: the pointer is convertible to a C string (null terminated)
        let fd = unsafe { libc::open(path.as_ptr(), Self::OPEN_FLAGS) };
        if fd < 0 {
            return_os_error!()
        }
        Ok(Self(fd))
    }

    /// Opens `name` relative to this descriptor.
    ///
    /// This is the race-free open: the result is a child of this directory
    /// even if an ancestor is renamed or swapped out mid-walk.
    pub(crate) fn openat(&self, name: &CStr) -> io::Result<Self> {
        // SAFETY: the fd is owned and open, the name is null terminated
        let fd = unsafe { libc::openat(self.0, name.as_ptr(), Self::OPEN_FLAGS) };
        if fd < 0 {
            return_os_error!()
        }
        Ok(Self(fd))
    }

    #[inline]
    pub(crate) const fn raw(&self) -> i32 {
        self.0
    }
}

impl Drop for DirFd {
    fn drop(&mut self) {
        // SAFETY: we own the descriptor and this is the only close
        unsafe { libc::close(self.0) };
    }
}
