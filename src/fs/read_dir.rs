#[cfg(any(target_os = "linux", target_os = "android"))]
use crate::fs::DENT_BUF_SIZE;
use crate::fs::{DirFd, dirent64};
use std::io;

/// One raw entry as read from its parent directory, borrowed from the
/// reader's buffer.
///
/// `name` excludes the null terminator but is always immediately followed by
/// one in the underlying record, so [`Self::name_ptr`] can be handed straight
/// to `fstatat`/`openat`.
pub(crate) struct RawDirent<'a> {
    pub(crate) name: &'a [u8],
    pub(crate) d_type: u8,
}

impl RawDirent<'_> {
    #[inline]
    pub(crate) const fn name_ptr(&self) -> *const libc::c_char {
        self.name.as_ptr().cast()
    }
}

/// Over-aligned getdents buffer, the kernel writes dirent64 records which
/// need 8 byte alignment.
#[cfg(any(target_os = "linux", target_os = "android"))]
#[repr(C, align(8))]
struct DentBuf {
    bytes: core::mem::MaybeUninit<[u8; DENT_BUF_SIZE]>,
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl DentBuf {
    const fn new() -> Self {
        Self {
            bytes: core::mem::MaybeUninit::uninit(),
        }
    }

    const fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr().cast()
    }

    const fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr().cast()
    }
}

/// Streams the entries of one open directory via raw `getdents64` calls,
/// skipping `.` and `..`.
///
/// Borrows the descriptor for its whole lifetime, the fd must stay open
/// while a read is in flight.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) struct DirReader<'fd> {
    fd: &'fd DirFd,
    buf: DentBuf,
    offset: usize,
    filled: usize,
    end_of_stream: bool,
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl<'fd> DirReader<'fd> {
    pub(crate) fn new(fd: &'fd DirFd) -> io::Result<Self> {
        Ok(Self {
            fd,
            buf: DentBuf::new(),
            offset: 0,
            filled: 0,
            end_of_stream: false,
        })
    }

    /// The next child entry, `Ok(None)` once the directory is exhausted.
    #[allow(clippy::cast_sign_loss)]
    pub(crate) fn next_entry(&mut self) -> io::Result<Option<RawDirent<'_>>> {
        loop {
            if self.offset < self.filled {
                // SAFETY: offset always lands on a record boundary inside
                // the filled region, the kernel guarantees whole records
                let entry: *const dirent64 = unsafe { self.buf.as_ptr().add(self.offset).cast() };
                // SAFETY: entry points at a complete record (checked above)
                self.offset += unsafe { access_dirent!(entry, d_reclen) };
                // SAFETY: as above
                let d_type: u8 = unsafe { access_dirent!(entry, d_type) };
                // SAFETY: d_name is null terminated within the record
                let name_ptr: *const u8 = unsafe { access_dirent!(entry, d_name) };
                // SAFETY: strlen stops at the record's terminator
                let name_len = unsafe { libc::strlen(name_ptr.cast()) };
                // SAFETY: name_len bytes are initialised and outlive the borrow
                let name = unsafe { core::slice::from_raw_parts(name_ptr, name_len) };
                if name == b"." || name == b".." {
                    continue;
                }
                return Ok(Some(RawDirent { name, d_type }));
            }
            if self.end_of_stream {
                return Ok(None);
            }
            // SAFETY: the fd is open and the buffer is valid for
            // DENT_BUF_SIZE bytes of writes
            let read = unsafe {
                libc::syscall(
                    libc::SYS_getdents64,
                    self.fd.raw(),
                    self.buf.as_mut_ptr(),
                    DENT_BUF_SIZE,
                )
            };
            if read < 0 {
                return Err(io::Error::last_os_error());
            }
            if read == 0 {
                self.end_of_stream = true;
            } else {
                self.filled = read as usize;
                self.offset = 0;
            }
        }
    }
}

/// Portable fallback reader built on `fdopendir`/`readdir`.
///
/// The descriptor is duplicated first so `closedir` tears down its own fd
/// and the caller's handle stays usable for relative opens afterwards. The
/// duplicate means a read transiently holds two descriptors for the same
/// directory, so on these targets the walk can peak one descriptor above
/// its configured budget while a directory is being read.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) struct DirReader<'fd> {
    dir: core::ptr::NonNull<libc::DIR>,
    _fd: core::marker::PhantomData<&'fd DirFd>,
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl<'fd> DirReader<'fd> {
    pub(crate) fn new(fd: &'fd DirFd) -> io::Result<Self> {
        // SAFETY: the fd is open, F_DUPFD_CLOEXEC has no memory preconditions
        let dup = unsafe { libc::fcntl(fd.raw(), libc::F_DUPFD_CLOEXEC, 0) };
        if dup < 0 {
            return_os_error!()
        }
        // SAFETY: dup is a valid directory descriptor, fdopendir takes
        // ownership of it on success
        let dir = unsafe { libc::fdopendir(dup) };
        if dir.is_null() {
            let error = io::Error::last_os_error();
            // SAFETY: fdopendir failed so we still own the duplicate
            unsafe { libc::close(dup) };
            return Err(error);
        }
        // The duplicate shares the original's read offset, start from zero
        // SAFETY: dir is a live stream, checked non-null above
        unsafe { libc::rewinddir(dir) };
        Ok(Self {
            // SAFETY: checked non-null above
            dir: unsafe { core::ptr::NonNull::new_unchecked(dir) },
            _fd: core::marker::PhantomData,
        })
    }

    /// The next child entry, `Ok(None)` once the directory is exhausted.
    ///
    /// `readdir` folds read errors into end-of-stream, matching the classic
    /// libc behaviour.
    pub(crate) fn next_entry(&mut self) -> io::Result<Option<RawDirent<'_>>> {
        loop {
            // SAFETY: the stream pointer stays valid until Drop
            let entry: *const dirent64 = unsafe { libc::readdir(self.dir.as_ptr()) };
            if entry.is_null() {
                return Ok(None);
            }
            // SAFETY: readdir returned a complete record
            let d_type: u8 = unsafe { access_dirent!(entry, d_type) };
            // SAFETY: d_name is null terminated within the record
            let name_ptr: *const u8 = unsafe { access_dirent!(entry, d_name) };
            // SAFETY: strlen stops at the record's terminator
            let name_len = unsafe { libc::strlen(name_ptr.cast()) };
            // SAFETY: name_len bytes are initialised, the record lives until
            // the next readdir call on this stream
            let name = unsafe { core::slice::from_raw_parts(name_ptr, name_len) };
            if name == b"." || name == b".." {
                continue;
            }
            return Ok(Some(RawDirent { name, d_type }));
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl Drop for DirReader<'_> {
    fn drop(&mut self) {
        // SAFETY: we own the stream and this is the only closedir
        unsafe { libc::closedir(self.dir.as_ptr()) };
    }
}
