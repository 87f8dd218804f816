//! The breadth-first traversal engine and its public surface.

mod builder;
mod entry;
mod frontier;
mod walker;

pub use builder::{DEFAULT_OPEN_LIMIT, WalkBuilder, Walker};
pub use entry::WalkEntry;

/// What the callback tells the walker to do after an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Keep walking.
    #[default]
    Continue,
    /// Do not visit the remaining unvisited entries of the directory the
    /// current entry was read from. Already-queued subdirectories from
    /// earlier siblings are unaffected, and the current entry itself is
    /// still descended into if it is a directory.
    SkipSiblings,
    /// If the current entry is a directory, do not descend into it.
    SkipSubtree,
    /// Terminate the walk immediately. The walk still returns `Ok`.
    Stop,
}

/// Walks `root` breadth-first with the default settings.
///
/// Shorthand for [`Walker::init`]`(root).build().run(callback)`.
///
/// ```no_run
/// use bfwalk::{Action, walk};
///
/// walk("/var/log", |entry| {
///     println!("{} {}", entry.depth(), entry.as_path().display());
///     Action::Continue
/// })?;
/// # Ok::<(), bfwalk::WalkError>(())
/// ```
pub fn walk<P, F>(root: P, callback: F) -> crate::Result<()>
where
    P: AsRef<std::ffi::OsStr>,
    F: FnMut(&WalkEntry<'_>) -> Action,
{
    Walker::init(root).build().run(callback)
}
