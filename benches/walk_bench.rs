use bfwalk::{Action, Walker};
use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng as _;
use std::fs;
use std::hint::black_box;
use std::path::PathBuf;

// 16 directories x 64 files, built once and reused across runs
fn build_tree() -> PathBuf {
    let root = std::env::temp_dir().join("bfwalk_bench_tree");
    if root.exists() {
        return root;
    }
    let mut rng = rand::rng();
    for d in 0..16 {
        let dir = root.join(format!("dir_{d:02}"));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..64 {
            let noise: u32 = rng.random();
            fs::write(dir.join(format!("file_{f:02}_{noise:08x}")), b"x").unwrap();
        }
    }
    root
}

fn count_entries(root: &PathBuf, open_limit: usize) -> usize {
    let mut count = 0_usize;
    Walker::init(root)
        .open_limit(open_limit)
        .build()
        .run(|entry| {
            black_box(entry.depth());
            count += 1;
            Action::Continue
        })
        .unwrap();
    count
}

fn bench_walk(c: &mut Criterion) {
    let root = build_tree();

    c.bench_function("walk_default_budget", |b| {
        b.iter(|| black_box(count_entries(&root, 256)));
    });

    c.bench_function("walk_budget_4", |b| {
        b.iter(|| black_box(count_entries(&root, 4)));
    });

    c.bench_function("walk_no_chaining", |b| {
        b.iter(|| black_box(count_entries(&root, 0)));
    });

    c.bench_function("walk_with_metadata", |b| {
        b.iter(|| {
            let mut bytes = 0_u64;
            Walker::init(&root)
                .fetch_metadata(true)
                .build()
                .run(|entry| {
                    if let Some(meta) = entry.metadata() {
                        bytes += meta.len();
                    }
                    Action::Continue
                })
                .unwrap();
            black_box(bytes)
        });
    });
}

criterion_group!(benches, bench_walk);
criterion_main!(benches);
