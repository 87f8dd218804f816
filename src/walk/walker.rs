//! The traversal engine: level loop, budgeted opens, classification and
//! callback dispatch.

use crate::WalkError;
use crate::fs::{DirFd, DirReader, FileType, Metadata};
use crate::util;
use crate::walk::frontier::{DirArena, PendingDir};
use crate::walk::{Action, WalkEntry, Walker};
use core::mem;
use libc::{AT_SYMLINK_NOFOLLOW, fstatat, lstat};
use std::ffi::{CString, OsStr};
use std::io;
use std::os::unix::ffi::OsStrExt as _;
use std::path::{Path, PathBuf};

impl Walker {
    /// Runs the walk, invoking `callback` once per entry.
    ///
    /// Entries are produced strictly level by level: everything at depth N
    /// is dispatched before anything at depth N+1. Within one directory the
    /// raw read order is kept, no sorting happens anywhere.
    ///
    /// # Errors
    /// Fails if the root cannot be statted or opened, or (in strict mode)
    /// if any directory below it fails to open, read or stat.
    pub fn run<F>(&self, callback: F) -> crate::Result<()>
    where
        F: FnMut(&WalkEntry<'_>) -> Action,
    {
        Traversal::new(self, callback).run()
    }
}

fn error_path(bytes: &[u8]) -> PathBuf {
    Path::new(OsStr::from_bytes(bytes)).to_path_buf()
}

enum Outcome {
    /// Carry on with the next pending directory.
    Continue,
    /// The callback asked for termination, unwind the level loop.
    Stop,
}

/// One in-flight walk. Owns the callback, the reusable path buffer and the
/// descriptor arena; dropped wholesale on any exit so every open descriptor
/// is closed by `DirFd::drop` no matter how the walk ends.
struct Traversal<'w, F> {
    walker: &'w Walker,
    cb: F,
    arena: DirArena,
    /// Directories discovered at the current level, read at the next one.
    next: Vec<PendingDir>,
    /// Scratch buffer holding the full path of the entry being dispatched.
    path_buf: Vec<u8>,
}

impl<'w, F: FnMut(&WalkEntry<'_>) -> Action> Traversal<'w, F> {
    fn new(walker: &'w Walker, cb: F) -> Self {
        Self {
            walker,
            cb,
            arena: DirArena::new(),
            next: Vec::new(),
            path_buf: Vec::with_capacity(256),
        }
    }

    fn run(mut self) -> crate::Result<()> {
        let root = CString::new(&self.walker.root[..]).map_err(WalkError::NulByte)?;
        // the root is classified with lstat, a symlink root is reported as
        // such and never followed
        let stat = stat_syscall!(lstat, root.as_ptr()).map_err(|source| WalkError::Root {
            path: error_path(&self.walker.root),
            source,
        })?;
        let metadata = Metadata(stat);
        let file_type = metadata.file_type();
        let base = util::file_name_index(&self.walker.root);

        self.path_buf.extend_from_slice(&self.walker.root);
        // the classifier statted the root either way, so the snapshot is
        // always attached here
        match self.dispatch(base, 0, file_type, Some(&metadata), None) {
            Action::Stop | Action::SkipSubtree => return Ok(()),
            Action::Continue | Action::SkipSiblings => {}
        }
        if !file_type.is_dir() {
            // a non-directory root is a complete, one entry walk
            return Ok(());
        }

        self.next.push(PendingDir {
            path: root,
            base,
            depth: 0,
            parent: None,
        });

        while !self.next.is_empty() {
            let level = mem::take(&mut self.next);
            for pending in level {
                if let Outcome::Stop = self.process_dir(pending)? {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Opens one pending directory, reads it and queues its subdirectories.
    fn process_dir(&mut self, pending: PendingDir) -> crate::Result<Outcome> {
        let chaining = self.walker.open_limit > 0;
        if chaining && self.arena.open_fds() >= self.walker.open_limit {
            self.arena.evict_one(pending.parent);
        }
        // single open strategy switch: relative to the parent handle when it
        // is still parked, by full path otherwise
        let opened = match pending.parent.and_then(|id| self.arena.parked_fd(id)) {
            Some(parent_fd) => parent_fd.openat(pending.name_cstr()),
            None => DirFd::open(&pending.path),
        };
        if let Some(parent) = pending.parent {
            self.arena.consume_child(parent);
        }
        let fd = match opened {
            Ok(fd) => fd,
            Err(source) => return self.dir_failure(&pending, source),
        };

        let slot = if chaining {
            Some(self.arena.reserve())
        } else {
            None
        };
        self.path_buf.clear();
        self.path_buf.extend_from_slice(pending.path.as_bytes());
        if !self.path_buf.ends_with(b"/") {
            self.path_buf.push(b'/');
        }
        let base = self.path_buf.len();

        let outcome = self.read_children(&pending, &fd, slot, base);
        match slot {
            Some(id) => self.arena.park(id, fd),
            None => drop(fd),
        }
        outcome
    }

    /// Streams the children of one open directory through the callback.
    fn read_children(
        &mut self,
        pending: &PendingDir,
        fd: &DirFd,
        slot: Option<usize>,
        base: usize,
    ) -> crate::Result<Outcome> {
        let mut reader = match DirReader::new(fd) {
            Ok(reader) => reader,
            Err(source) => return self.dir_failure(pending, source),
        };
        let depth = pending.depth + 1;
        loop {
            let raw = match reader.next_entry() {
                Ok(Some(raw)) => raw,
                Ok(None) => return Ok(Outcome::Continue),
                Err(source) => return self.dir_failure(pending, source),
            };
            self.path_buf.truncate(base);
            self.path_buf.extend_from_slice(raw.name);

            let hint = FileType::from_dtype(raw.d_type);
            let mut file_type = hint;
            let mut metadata: Option<Metadata> = None;
            if hint.is_unknown() || self.walker.fetch_metadata {
                // stat relative to the parent fd so the lookup shares the
                // race-free anchor with the eventual openat
                match stat_syscall!(fstatat, fd.raw(), raw.name_ptr(), AT_SYMLINK_NOFOLLOW) {
                    Ok(stat) => {
                        let snapshot = Metadata(stat);
                        if hint.is_unknown() {
                            file_type = snapshot.file_type();
                        }
                        metadata = Some(snapshot);
                    }
                    Err(source) if self.walker.fetch_metadata => {
                        // the caller demanded metadata, this failure goes
                        // through the error policy
                        if !self.walker.recover {
                            return Err(WalkError::Entry {
                                path: error_path(&self.path_buf),
                                source,
                            });
                        }
                        let errno = source.raw_os_error();
                        match self.dispatch(base, depth, FileType::Error, None, errno) {
                            Action::Stop => return Ok(Outcome::Stop),
                            Action::SkipSiblings => return Ok(Outcome::Continue),
                            Action::SkipSubtree | Action::Continue => continue,
                        }
                    }
                    // the hint resolution was best-effort, the entry is
                    // reported as Unknown
                    Err(_) => {}
                }
            }

            let action = self.dispatch(base, depth, file_type, metadata.as_ref(), None);
            let descend =
                matches!(action, Action::Continue | Action::SkipSiblings) && file_type.is_dir();
            if descend {
                // SAFETY: kernel-supplied names never contain interior nulls
                let path = unsafe { CString::from_vec_unchecked(self.path_buf.clone()) };
                if let Some(id) = slot {
                    self.arena.add_pending(id);
                }
                self.next.push(PendingDir {
                    path,
                    base,
                    depth,
                    parent: slot,
                });
            }
            match action {
                Action::Stop => return Ok(Outcome::Stop),
                Action::SkipSiblings => return Ok(Outcome::Continue),
                Action::SkipSubtree | Action::Continue => {}
            }
        }
    }

    /// A directory failed to open, read or stat. Fatal in strict mode,
    /// reported as a single `Error` entry otherwise. The root is special:
    /// failing it is fatal in both modes.
    fn dir_failure(&mut self, pending: &PendingDir, source: io::Error) -> crate::Result<Outcome> {
        if pending.depth == 0 {
            return Err(WalkError::Root {
                path: error_path(pending.path.as_bytes()),
                source,
            });
        }
        if !self.walker.recover {
            return Err(WalkError::Entry {
                path: error_path(pending.path.as_bytes()),
                source,
            });
        }
        self.path_buf.clear();
        self.path_buf.extend_from_slice(pending.path.as_bytes());
        let errno = source.raw_os_error();
        match self.dispatch(pending.base, pending.depth, FileType::Error, None, errno) {
            Action::Stop => Ok(Outcome::Stop),
            // this entry's read batch was fully dispatched long ago and
            // already-queued siblings stay untouched, so there is nothing
            // left for SkipSiblings or SkipSubtree to act on
            Action::SkipSiblings | Action::SkipSubtree | Action::Continue => {
                Ok(Outcome::Continue)
            }
        }
    }

    /// Builds the borrowed entry view over the scratch buffer and hands it
    /// to the callback.
    fn dispatch(
        &mut self,
        base: usize,
        depth: usize,
        file_type: FileType,
        metadata: Option<&Metadata>,
        errno: Option<i32>,
    ) -> Action {
        let entry = WalkEntry {
            path: &self.path_buf,
            base,
            depth,
            file_type,
            metadata,
            errno,
        };
        (self.cb)(&entry)
    }
}
