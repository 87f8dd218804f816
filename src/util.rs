//! Byte-level path helpers with POSIX `basename(3)`/`dirname(3)` semantics.

/// Returns the final component of `path`, ignoring trailing slashes.
///
/// Matches POSIX `basename(3)`: the empty path yields `.`, an all-slash
/// path yields `/`.
///
/// ```
/// use bfwalk::util::basename;
///
/// assert_eq!(basename(b"/usr/lib"), b"lib");
/// assert_eq!(basename(b"usr/"), b"usr");
/// assert_eq!(basename(b"///"), b"/");
/// assert_eq!(basename(b""), b".");
/// ```
#[must_use]
#[allow(clippy::indexing_slicing)]
pub fn basename(path: &[u8]) -> &[u8] {
    if path.is_empty() {
        return b".";
    }
    let mut end = path.len();
    while end > 0 && path[end - 1] == b'/' {
        end -= 1;
    }
    if end == 0 {
        // nothing but slashes
        return b"/";
    }
    let start = path[..end]
        .iter()
        .rposition(|&byte| byte == b'/')
        .map_or(0, |pos| pos + 1);
    &path[start..end]
}

/// Returns everything up to the final component of `path`.
///
/// Matches POSIX `dirname(3)`: no slash yields `.`, an all-slash path
/// yields `/`. Interior runs of slashes are preserved as-is, only the
/// separator run in front of the final component is stripped.
///
/// ```
/// use bfwalk::util::dirname;
///
/// assert_eq!(dirname(b"/usr/lib"), b"/usr");
/// assert_eq!(dirname(b"usr"), b".");
/// assert_eq!(dirname(b"/usr/"), b"/");
/// assert_eq!(dirname(b"//usr//lib//"), b"//usr");
/// ```
#[must_use]
#[allow(clippy::indexing_slicing)]
pub fn dirname(path: &[u8]) -> &[u8] {
    if path.is_empty() {
        return b".";
    }
    let mut end = path.len();
    // trailing slashes
    while end > 0 && path[end - 1] == b'/' {
        end -= 1;
    }
    if end == 0 {
        return b"/";
    }
    // the final component
    while end > 0 && path[end - 1] != b'/' {
        end -= 1;
    }
    if end == 0 {
        return b".";
    }
    // the separator run in front of it
    while end > 0 && path[end - 1] == b'/' {
        end -= 1;
    }
    if end == 0 {
        return b"/";
    }
    &path[..end]
}

/// Offset where the final component of `path` starts.
///
/// `path` must already be normalised (no trailing slash unless it is `/`
/// itself, for which the offset is 0 so the whole path is the name).
pub(crate) fn file_name_index(path: &[u8]) -> usize {
    if path == b"/" {
        return 0;
    }
    path.iter()
        .rposition(|&byte| byte == b'/')
        .map_or(0, |pos| pos + 1)
}

/// Strips trailing slashes so `a/b/` and `a/b` walk identically.
/// An all-slash path collapses to `/`, the empty path stays empty.
#[allow(clippy::indexing_slicing)]
pub(crate) fn normalize_root(path: &[u8]) -> &[u8] {
    let mut end = path.len();
    while end > 0 && path[end - 1] == b'/' {
        end -= 1;
    }
    if end == 0 && !path.is_empty() {
        return b"/";
    }
    &path[..end]
}
