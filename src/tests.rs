use crate::util::{basename, dirname};
use crate::{Action, FileType, WalkError, Walker, walk};
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

// each test gets its own uniquely named playground under the system temp dir
fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

fn touch(path: &Path) {
    File::create(path).unwrap();
}

fn collect_paths(root: &Path) -> Vec<(usize, PathBuf, FileType)> {
    let mut seen = Vec::new();
    walk(root, |entry| {
        seen.push((entry.depth(), entry.as_path().to_path_buf(), entry.file_type()));
        Action::Continue
    })
    .unwrap();
    seen
}

#[test]
fn breadth_first_order() {
    let root = test_dir("bfwalk_test_bfs_order");
    touch(&root.join("f0"));
    fs::create_dir(root.join("a")).unwrap();
    fs::create_dir(root.join("b")).unwrap();
    touch(&root.join("a/f1"));
    fs::create_dir(root.join("a/c")).unwrap();
    touch(&root.join("b/f2"));
    touch(&root.join("a/c/f3"));

    let seen = collect_paths(&root);
    assert_eq!(seen.len(), 8, "root + 3 + 3 + 1 entries expected");
    // depths never decrease, every level is exhausted before the next
    assert!(
        seen.windows(2).all(|pair| pair[0].0 <= pair[1].0),
        "entries out of level order: {seen:?}"
    );
    assert_eq!(seen[0].1, root);
    assert_eq!(seen[0].2, FileType::Directory);
    assert_eq!(seen.last().unwrap().1, root.join("a/c/f3"));

    cleanup(&root);
}

#[test]
fn tiny_budget_still_complete() {
    let root = test_dir("bfwalk_test_budget_one");
    let mut dir = root.clone();
    for level in 0..8 {
        dir = dir.join(format!("d{level}"));
        fs::create_dir(&dir).unwrap();
        touch(&dir.join("file"));
    }

    let mut count = 0_usize;
    Walker::init(&root)
        .open_limit(1)
        .build()
        .run(|_| {
            count += 1;
            Action::Continue
        })
        .unwrap();
    // root + 8 dirs + 8 files
    assert_eq!(count, 17);

    cleanup(&root);
}

#[test]
fn zero_budget_disables_chaining() {
    let root = test_dir("bfwalk_test_budget_zero");
    fs::create_dir_all(root.join("a/b/c")).unwrap();
    touch(&root.join("a/b/c/leaf"));

    let mut count = 0_usize;
    Walker::init(&root)
        .open_limit(0)
        .build()
        .run(|_| {
            count += 1;
            Action::Continue
        })
        .unwrap();
    assert_eq!(count, 5);

    cleanup(&root);
}

#[cfg(any(target_os = "linux", target_os = "android"))]
#[test]
fn descriptor_budget_is_respected() {
    fn open_fd_count() -> usize {
        fs::read_dir("/proc/self/fd").unwrap().count()
    }

    let root = test_dir("bfwalk_test_fd_budget");
    for a in 0..3 {
        for b in 0..3 {
            let dir = root.join(format!("d{a}")).join(format!("d{b}"));
            fs::create_dir_all(&dir).unwrap();
            touch(&dir.join("leaf"));
        }
    }

    const LIMIT: usize = 2;
    let baseline = open_fd_count();
    let mut worst = 0_usize;
    Walker::init(&root)
        .open_limit(LIMIT)
        .build()
        .run(|_| {
            worst = worst.max(open_fd_count());
            Action::Continue
        })
        .unwrap();
    // both counts include the read_dir iterator's own fd, the difference is
    // exactly what the walker holds open
    assert!(
        worst - baseline <= LIMIT,
        "walker held {} fds over a budget of {LIMIT}",
        worst - baseline
    );

    cleanup(&root);
}

#[test]
fn base_offset_marks_the_file_name() {
    let root = test_dir("bfwalk_test_base_offset");
    fs::create_dir(root.join("nested")).unwrap();
    touch(&root.join("nested/inner.txt"));
    touch(&root.join("top.txt"));

    walk(&root, |entry| {
        assert_eq!(
            entry.file_name(),
            basename(entry.as_bytes()),
            "base offset disagrees with basename for {entry}"
        );
        assert_eq!(entry.as_bytes().get(entry.base()..), Some(entry.file_name()));
        Action::Continue
    })
    .unwrap();

    cleanup(&root);
}

#[test]
fn skip_subtree_prunes_descendants() {
    let root = test_dir("bfwalk_test_skip_subtree");
    fs::create_dir(root.join("keep")).unwrap();
    touch(&root.join("keep/y.txt"));
    fs::create_dir_all(root.join("prune/deep")).unwrap();
    touch(&root.join("prune/x.txt"));

    let mut seen = Vec::new();
    walk(&root, |entry| {
        seen.push(entry.as_path().to_path_buf());
        if entry.file_name() == b"prune" {
            Action::SkipSubtree
        } else {
            Action::Continue
        }
    })
    .unwrap();

    assert!(seen.contains(&root.join("prune")), "the pruned dir itself is still visited");
    assert!(seen.contains(&root.join("keep/y.txt")));
    assert!(
        !seen.iter().any(|p| p.starts_with(root.join("prune")) && *p != root.join("prune")),
        "descendants of the pruned dir leaked through: {seen:?}"
    );

    cleanup(&root);
}

#[test]
fn skip_siblings_ends_the_directory_early() {
    let root = test_dir("bfwalk_test_skip_siblings");
    for n in 0..5 {
        touch(&root.join(format!("f{n}")));
    }

    let mut depth_one = 0_usize;
    walk(&root, |entry| {
        if entry.depth() == 1 {
            depth_one += 1;
            return Action::SkipSiblings;
        }
        Action::Continue
    })
    .unwrap();
    assert_eq!(depth_one, 1, "only the first child should have been visited");

    cleanup(&root);
}

#[test]
fn stop_terminates_immediately() {
    let root = test_dir("bfwalk_test_stop");
    for n in 0..10 {
        touch(&root.join(format!("f{n}")));
    }

    let mut visited = 0_usize;
    walk(&root, |_| {
        visited += 1;
        if visited == 3 { Action::Stop } else { Action::Continue }
    })
    .unwrap();
    assert_eq!(visited, 3);

    cleanup(&root);
}

#[test]
fn recover_reports_one_error_entry() {
    let root = test_dir("bfwalk_test_recover");
    fs::create_dir(root.join("gone")).unwrap();
    touch(&root.join("gone/inner.txt"));

    let mut seen: Vec<(PathBuf, FileType, Option<i32>)> = Vec::new();
    Walker::init(&root)
        .recover(true)
        .build()
        .run(|entry| {
            seen.push((entry.as_path().to_path_buf(), entry.file_type(), entry.errno()));
            // yank the directory out from under the walker before its level
            // comes up, forcing a deterministic open failure
            if entry.file_name() == b"gone" && entry.file_type().is_dir() {
                fs::remove_dir_all(entry.as_path()).unwrap();
            }
            Action::Continue
        })
        .unwrap();

    let errors: Vec<_> = seen.iter().filter(|(_, t, _)| t.is_error()).collect();
    assert_eq!(errors.len(), 1, "exactly one error entry expected: {seen:?}");
    assert_eq!(errors[0].0, root.join("gone"));
    assert_eq!(errors[0].2, Some(libc::ENOENT));
    // the directory was visited normally first, then reported as an error
    assert!(seen.contains(&(root.join("gone"), FileType::Directory, None)));
    assert!(!seen.iter().any(|(p, _, _)| p.ends_with("inner.txt")));

    cleanup(&root);
}

#[test]
fn strict_mode_aborts_on_failure() {
    let root = test_dir("bfwalk_test_strict");
    fs::create_dir(root.join("gone")).unwrap();

    let err = Walker::init(&root)
        .build()
        .run(|entry| {
            if entry.file_name() == b"gone" && entry.file_type().is_dir() {
                fs::remove_dir_all(entry.as_path()).unwrap();
            }
            Action::Continue
        })
        .unwrap_err();

    assert!(matches!(err, WalkError::Entry { .. }), "got {err:?}");
    assert_eq!(err.errno(), Some(libc::ENOENT));
    assert_eq!(err.path(), Some(root.join("gone").as_path()));

    cleanup(&root);
}

#[test]
fn skip_siblings_on_error_entry_leaves_queued_dirs_alone() {
    let root = test_dir("bfwalk_test_error_skip_siblings");
    for name in ["a", "b", "c"] {
        fs::create_dir(root.join(name)).unwrap();
        touch(&root.join(name).join("leaf"));
    }

    let mut removed = false;
    let mut errors = 0_usize;
    let mut leaves = 0_usize;
    Walker::init(&root)
        .recover(true)
        .build()
        .run(|entry| {
            if entry.file_type().is_error() {
                errors += 1;
                return Action::SkipSiblings;
            }
            if entry.depth() == 1 && entry.file_type().is_dir() && !removed {
                removed = true;
                fs::remove_dir_all(entry.as_path()).unwrap();
            }
            if entry.depth() == 2 {
                leaves += 1;
            }
            Action::Continue
        })
        .unwrap();

    assert_eq!(errors, 1);
    // the surviving directories were queued before the failure and
    // SkipSiblings on the deferred error entry must not touch them
    assert_eq!(leaves, 2, "both surviving directories must yield their leaf");

    cleanup(&root);
}

#[test]
fn recover_reports_stat_failure_on_a_child() {
    let root = test_dir("bfwalk_test_stat_recover");
    touch(&root.join("one"));
    touch(&root.join("two"));

    let mut seen: Vec<(PathBuf, FileType, Option<i32>)> = Vec::new();
    Walker::init(&root)
        .fetch_metadata(true)
        .recover(true)
        .build()
        .run(|entry| {
            seen.push((entry.as_path().to_path_buf(), entry.file_type(), entry.errno()));
            if entry.depth() == 1 && !entry.file_type().is_error() {
                // delete the sibling after it was read but before it is
                // statted, whichever of the two came out of the buffer first
                let other = if entry.file_name() == b"one" { "two" } else { "one" };
                let _ = fs::remove_file(root.join(other));
            }
            Action::Continue
        })
        .unwrap();

    let errors: Vec<_> = seen.iter().filter(|(_, t, _)| t.is_error()).collect();
    assert_eq!(errors.len(), 1, "one stat failure expected: {seen:?}");
    assert_eq!(errors[0].2, Some(libc::ENOENT));
    assert_eq!(seen.len(), 3, "the root, the survivor and the error entry");

    cleanup(&root);
}

#[test]
fn strict_mode_aborts_on_stat_failure() {
    let root = test_dir("bfwalk_test_stat_strict");
    touch(&root.join("one"));
    touch(&root.join("two"));

    let err = Walker::init(&root)
        .fetch_metadata(true)
        .build()
        .run(|entry| {
            if entry.depth() == 1 {
                let other = if entry.file_name() == b"one" { "two" } else { "one" };
                let _ = fs::remove_file(root.join(other));
            }
            Action::Continue
        })
        .unwrap_err();

    assert!(matches!(err, WalkError::Entry { .. }), "got {err:?}");
    assert_eq!(err.errno(), Some(libc::ENOENT));
    assert_eq!(err.path().and_then(Path::parent), Some(root.as_path()));

    cleanup(&root);
}

#[test]
fn root_metadata_is_always_attached() {
    let root = test_dir("bfwalk_test_root_metadata");
    touch(&root.join("plain"));

    walk(&root, |entry| {
        if entry.depth() == 0 {
            // the root is classified with lstat, so its snapshot is there
            // even though no metadata was requested
            let meta = entry.metadata().expect("root metadata");
            assert!(meta.file_type().is_dir());
        } else {
            assert!(entry.metadata().is_none(), "no stat was requested for {entry}");
        }
        Action::Continue
    })
    .unwrap();

    cleanup(&root);
}

#[test]
fn stop_on_error_entry_still_succeeds() {
    let root = test_dir("bfwalk_test_stop_on_error");
    fs::create_dir(root.join("gone")).unwrap();
    touch(&root.join("after.txt"));

    let mut after_error = 0_usize;
    let mut saw_error = false;
    Walker::init(&root)
        .recover(true)
        .build()
        .run(|entry| {
            if saw_error {
                after_error += 1;
            }
            if entry.file_type().is_error() {
                saw_error = true;
                return Action::Stop;
            }
            if entry.file_name() == b"gone" && entry.file_type().is_dir() {
                fs::remove_dir_all(entry.as_path()).unwrap();
            }
            Action::Continue
        })
        .unwrap();
    assert!(saw_error);
    assert_eq!(after_error, 0, "nothing may follow a Stop");

    cleanup(&root);
}

#[test]
fn fetch_metadata_populates_stat() {
    let root = test_dir("bfwalk_test_metadata");
    let mut file = File::create(root.join("hello.txt")).unwrap();
    file.write_all(b"hello").unwrap();
    drop(file);

    let mut checked = false;
    Walker::init(&root)
        .fetch_metadata(true)
        .build()
        .run(|entry| {
            let meta = entry.metadata().expect("metadata was requested");
            assert_eq!(meta.file_type(), entry.file_type());
            if entry.file_name() == b"hello.txt" {
                assert_eq!(meta.len(), 5);
                assert!(!meta.is_empty());
                assert!(meta.modified().is_some());
                checked = true;
            }
            Action::Continue
        })
        .unwrap();
    assert!(checked);

    cleanup(&root);
}

#[test]
fn missing_root_is_fatal_even_in_recover_mode() {
    let ghost = std::env::temp_dir().join("bfwalk_test_no_such_root");
    let _ = fs::remove_dir_all(&ghost);

    let err = Walker::init(&ghost)
        .recover(true)
        .build()
        .run(|_| Action::Continue)
        .unwrap_err();
    assert!(matches!(err, WalkError::Root { .. }), "got {err:?}");
    assert_eq!(err.errno(), Some(libc::ENOENT));
}

#[test]
fn regular_file_root_is_a_single_entry_walk() {
    let root = test_dir("bfwalk_test_file_root");
    touch(&root.join("only.txt"));

    let mut seen = Vec::new();
    walk(root.join("only.txt"), |entry| {
        seen.push((entry.depth(), entry.file_type(), entry.file_name().to_vec()));
        Action::Continue
    })
    .unwrap();
    assert_eq!(seen, vec![(0, FileType::RegularFile, b"only.txt".to_vec())]);

    cleanup(&root);
}

#[test]
fn trailing_slashes_on_the_root_are_normalised() {
    let root = test_dir("bfwalk_test_trailing_slash");
    touch(&root.join("f"));

    let mut slashed = root.as_os_str().to_os_string();
    slashed.push("///");
    let mut seen = Vec::new();
    walk(&slashed, |entry| {
        seen.push(entry.as_path().to_path_buf());
        Action::Continue
    })
    .unwrap();
    assert_eq!(seen, vec![root.clone(), root.join("f")]);

    cleanup(&root);
}

#[test]
fn symlinks_are_reported_not_followed() {
    let root = test_dir("bfwalk_test_symlink");
    fs::create_dir(root.join("target_dir")).unwrap();
    touch(&root.join("target_dir/t.txt"));
    std::os::unix::fs::symlink(root.join("target_dir"), root.join("link")).unwrap();

    let seen = collect_paths(&root);
    let link = seen.iter().find(|(_, p, _)| p == &root.join("link")).unwrap();
    assert_eq!(link.2, FileType::Symlink);
    assert!(!seen.iter().any(|(_, p, _)| p == &root.join("link/t.txt")));
    assert_eq!(
        seen.iter().filter(|(_, p, _)| p.ends_with("t.txt")).count(),
        1
    );

    cleanup(&root);
}

#[test]
fn walker_is_reusable() {
    let root = test_dir("bfwalk_test_reusable");
    fs::create_dir(root.join("d")).unwrap();
    touch(&root.join("d/f"));

    let walker = Walker::init(&root).build();
    for _ in 0..2 {
        let mut count = 0_usize;
        walker
            .run(|_| {
                count += 1;
                Action::Continue
            })
            .unwrap();
        assert_eq!(count, 3);
    }

    cleanup(&root);
}

#[test]
fn basename_matches_posix() {
    let cases: &[(&[u8], &[u8])] = &[
        (b"usr", b"usr"),
        (b"usr/", b"usr"),
        (b"", b"."),
        (b"/", b"/"),
        (b"///", b"/"),
        (b"//usr//lib//", b"lib"),
        (b"/usr/", b"usr"),
        (b"/usr/lib", b"lib"),
        (b"/home//dwc//test", b"test"),
    ];
    for &(input, expected) in cases {
        assert_eq!(
            basename(input),
            expected,
            "basename({:?})",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn dirname_matches_posix() {
    let cases: &[(&[u8], &[u8])] = &[
        (b"usr", b"."),
        (b"usr/", b"."),
        (b"", b"."),
        (b"/", b"/"),
        (b"///", b"/"),
        (b"//usr//lib//", b"//usr"),
        (b"/usr/", b"/"),
        (b"/usr/lib", b"/usr"),
        (b"/home//dwc//test", b"/home//dwc"),
    ];
    for &(input, expected) in cases {
        assert_eq!(
            dirname(input),
            expected,
            "dirname({:?})",
            String::from_utf8_lossy(input)
        );
    }
}
