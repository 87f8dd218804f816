/*!
 A breadth-first directory walker with a bounded file-descriptor budget.

 Unlike `ftw(3)`/`nftw(3)` style walkers (and the depth-first order a naive
 recursive walk produces), this crate visits every entry at depth N before any
 entry at depth N+1. The caller supplies a callback which is invoked once per
 entry and steers the walk through the returned [`Action`]: keep going, prune
 siblings, prune a subtree, or stop outright.

 The walker keeps at most `open_limit` directory descriptors open at once.
 While there is headroom, children are opened with `openat` relative to their
 parent's handle, which is immune to path-substitution races on the ancestors;
 once the budget is exhausted the oldest handle is recycled and the affected
 directories are reopened by their textual path instead.

 # Examples
 ```
 use bfwalk::{walk, Action};

 let tmp = std::env::temp_dir().join("bfwalk_doc_lib");
 let _ = std::fs::remove_dir_all(&tmp);
 std::fs::create_dir_all(tmp.join("sub")).unwrap();
 std::fs::write(tmp.join("sub/file.txt"), "hi").unwrap();

 let mut seen = Vec::new();
 walk(&tmp, |entry| {
     seen.push((entry.depth(), entry.as_path().to_path_buf()));
     Action::Continue
 })
 .unwrap();

 assert_eq!(seen.len(), 3); // the root, sub and sub/file.txt
 // level order: depths never decrease
 assert!(seen.windows(2).all(|pair| pair[0].0 <= pair[1].0));
 std::fs::remove_dir_all(&tmp).unwrap();
 ```
*/

#[macro_use]
mod macros;

mod error;
pub mod fs;
pub mod util;
pub mod walk;

pub use error::WalkError;
pub use fs::{FileType, Metadata};
pub use walk::{Action, WalkBuilder, WalkEntry, Walker, walk};

/// Generic result type for walk operations
pub type Result<T> = core::result::Result<T, WalkError>;

//this allocator is more efficient than jemalloc through my testing
#[cfg(all(
    feature = "mimalloc",
    any(target_os = "linux", target_os = "macos", target_os = "android")
))]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(test)]
mod tests;
