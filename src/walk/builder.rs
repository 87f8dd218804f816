use crate::util;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt as _;

const_from_env!(
    /// Default directory descriptor budget, overridable at compile time.
    DEFAULT_OPEN_LIMIT: usize = "BFWALK_OPEN_LIMIT",
    256
);

/// A configured breadth-first walk, ready to [`run`](Walker::run).
///
/// Construction goes through [`Walker::init`]. The walker borrows nothing
/// and can be run any number of times.
#[derive(Debug, Clone)]
pub struct Walker {
    pub(crate) root: Box<[u8]>,
    pub(crate) open_limit: usize,
    pub(crate) fetch_metadata: bool,
    pub(crate) recover: bool,
}

impl Walker {
    /// Starts building a walk rooted at `root`.
    #[inline]
    #[must_use]
    pub fn init<P: AsRef<OsStr>>(root: P) -> WalkBuilder {
        WalkBuilder::new(root)
    }

    /// The normalised root path (trailing slashes stripped).
    #[inline]
    #[must_use]
    pub fn root_dir(&self) -> &OsStr {
        OsStr::from_bytes(&self.root)
    }

    /// The configured descriptor budget.
    #[inline]
    #[must_use]
    pub const fn open_limit(&self) -> usize {
        self.open_limit
    }
}

/// Builder for [`Walker`].
///
/// ```no_run
/// use bfwalk::{Action, Walker};
///
/// Walker::init("/etc")
///     .open_limit(64)
///     .fetch_metadata(true)
///     .recover(true)
///     .build()
///     .run(|entry| {
///         if let Some(meta) = entry.metadata() {
///             println!("{}\t{}", meta.len(), entry.to_string_lossy());
///         }
///         Action::Continue
///     })?;
/// # Ok::<(), bfwalk::WalkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WalkBuilder {
    root: Box<[u8]>,
    open_limit: usize,
    fetch_metadata: bool,
    recover: bool,
}

impl WalkBuilder {
    /// Creates a builder with the default budget, no metadata fetching and
    /// strict error handling.
    #[must_use]
    pub fn new<P: AsRef<OsStr>>(root: P) -> Self {
        Self {
            root: root.as_ref().as_bytes().into(),
            open_limit: DEFAULT_OPEN_LIMIT,
            fetch_metadata: false,
            recover: false,
        }
    }

    /// Caps how many directory descriptors the walk may hold open at once.
    ///
    /// A limit of 0 disables descriptor chaining entirely: every directory
    /// is opened by path and closed as soon as it has been read, so exactly
    /// one descriptor exists at a time.
    #[must_use]
    pub const fn open_limit(mut self, limit: usize) -> Self {
        self.open_limit = limit;
        self
    }

    /// Fetches full stat metadata for every entry, not just the ones whose
    /// type hint needs resolving.
    #[must_use]
    pub const fn fetch_metadata(mut self, fetch: bool) -> Self {
        self.fetch_metadata = fetch;
        self
    }

    /// Reports per-directory failures as [`FileType::Error`](crate::FileType::Error)
    /// entries and carries on, instead of aborting the walk.
    ///
    /// A failure on the root itself stays fatal either way.
    #[must_use]
    pub const fn recover(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    /// Finalises the configuration.
    #[must_use]
    pub fn build(self) -> Walker {
        Walker {
            root: util::normalize_root(&self.root).into(),
            open_limit: self.open_limit,
            fetch_metadata: self.fetch_metadata,
            recover: self.recover,
        }
    }
}
