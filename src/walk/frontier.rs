//! The frontier queue and the arena of chained directory handles.

use crate::fs::DirFd;
use core::ffi::CStr;
use std::collections::VecDeque;
use std::ffi::CString;

/// A directory discovered at depth N, waiting to be read when its level
/// comes up.
pub(crate) struct PendingDir {
    /// Full path, null terminated so both open strategies can use it as-is.
    pub(crate) path: CString,
    /// Offset of the final component within the path.
    pub(crate) base: usize,
    pub(crate) depth: usize,
    /// Arena id of the parent's handle, `None` when the parent was read
    /// without chaining.
    pub(crate) parent: Option<usize>,
}

impl PendingDir {
    /// The final component as a `CStr`, sliced out of the stored path.
    pub(crate) fn name_cstr(&self) -> &CStr {
        let bytes = self.path.as_bytes_with_nul();
        debug_assert!(self.base < bytes.len(), "base must sit inside the path");
        // SAFETY: base points inside the buffer, the terminator is retained
        // and kernel-supplied names have no interior nulls
        unsafe { CStr::from_bytes_with_nul_unchecked(bytes.get_unchecked(self.base..)) }
    }
}

struct Slot {
    /// The parked descriptor. `None` while the directory is being read and
    /// after the handle has been evicted to free up budget.
    fd: Option<DirFd>,
    /// Children still queued that refer back to this slot.
    pending: usize,
    /// Set between reserve and park, the descriptor lives on the stack of
    /// the reader during that window but still counts against the budget.
    reading: bool,
    live: bool,
}

/// Slab of directory handles addressed by integer id, so pending children
/// can refer to their parent without borrowing into the arena.
///
/// Tracks every open descriptor it has reserved; `open_fds` never exceeds
/// the walk's budget because the traversal evicts before opening.
pub(crate) struct DirArena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    /// Parked handle ids, oldest first. Eviction victims come from the front.
    open_order: VecDeque<usize>,
    open_fds: usize,
}

impl DirArena {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            open_order: VecDeque::new(),
            open_fds: 0,
        }
    }

    /// Descriptors currently charged against the budget, parked and in-read.
    #[inline]
    pub(crate) const fn open_fds(&self) -> usize {
        self.open_fds
    }

    /// Claims a slot for a directory whose descriptor is about to be read.
    /// The fd itself stays with the reader until [`Self::park`].
    pub(crate) fn reserve(&mut self) -> usize {
        self.open_fds += 1;
        let slot = Slot {
            fd: None,
            pending: 0,
            reading: true,
            live: true,
        };
        if let Some(id) = self.free.pop() {
            self.slots[id] = slot;
            id
        } else {
            self.slots.push(slot);
            self.slots.len() - 1
        }
    }

    /// Records one more queued child referring back to `id`.
    pub(crate) fn add_pending(&mut self, id: usize) {
        self.slots[id].pending += 1;
    }

    /// The parked descriptor for `id`, `None` if it was evicted.
    pub(crate) fn parked_fd(&self, id: usize) -> Option<&DirFd> {
        self.slots[id].fd.as_ref()
    }

    /// A queued child of `id` has been opened (or failed to), drop its
    /// reference and release the slot once nothing else needs it.
    pub(crate) fn consume_child(&mut self, id: usize) {
        debug_assert!(self.slots[id].pending > 0, "pending count underflow");
        self.slots[id].pending -= 1;
        self.maybe_free(id);
    }

    /// Hands the descriptor back after reading. Parked if children are
    /// queued behind it, closed immediately otherwise.
    pub(crate) fn park(&mut self, id: usize, fd: DirFd) {
        let slot = &mut self.slots[id];
        debug_assert!(slot.reading, "park without a matching reserve");
        slot.reading = false;
        if slot.pending > 0 {
            slot.fd = Some(fd);
            self.open_order.push_back(id);
            return;
        }
        slot.live = false;
        // nothing queued behind this handle, close it now
        drop(fd);
        self.open_fds -= 1;
        self.free.push(id);
    }

    /// Closes the oldest parked handle to make budget headroom, preferring
    /// not to touch `keep` since it is about to serve a relative open.
    ///
    /// The children still queued behind the victim fall back to path opens.
    pub(crate) fn evict_one(&mut self, keep: Option<usize>) {
        let position = self
            .open_order
            .iter()
            .position(|&id| Some(id) != keep)
            .or_else(|| if self.open_order.is_empty() { None } else { Some(0) });
        let Some(position) = position else { return };
        let Some(id) = self.open_order.remove(position) else {
            return;
        };
        if self.slots[id].fd.take().is_some() {
            self.open_fds -= 1;
        }
    }

    fn maybe_free(&mut self, id: usize) {
        let slot = &mut self.slots[id];
        if !slot.live || slot.reading || slot.pending > 0 {
            return;
        }
        let had_fd = slot.fd.take().is_some();
        slot.live = false;
        if had_fd {
            self.open_fds -= 1;
            self.open_order.retain(|&parked| parked != id);
        }
        self.free.push(id);
    }
}
