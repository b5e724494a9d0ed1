mod common;

use common::{Node, options, roots, snapshot, write_file};
use merge_move::merge;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A tree with overlap at several depths.
fn populate(src: &std::path::Path, dst: &std::path::Path) {
    for d in 0..4 {
        for f in 0..5 {
            write_file(&src.join(format!("d{d}/sub{f}/file{f}.txt")), &format!("src {d}/{f}"));
            write_file(&src.join(format!("d{d}/top{f}.bin")), &"x".repeat(f + d));
        }
    }
    write_file(&dst.join("d0/top0.bin"), "kept");
    write_file(&dst.join("d1/sub2/file2.txt"), "kept too");
    write_file(&dst.join("d1/sub2/only_dst.txt"), "dst only");
    write_file(&dst.join("d3/unrelated/x"), "x");
}

#[test]
fn rerun_is_idempotent() {
    let (_td, src, dst) = roots();
    populate(&src, &dst);

    merge(&src, &dst, &options(4, 8)).unwrap();
    let after_first = (snapshot(&src), snapshot(&dst));

    let second = merge(&src, &dst, &options(4, 8)).unwrap();
    assert_eq!(second.stats.moved(), 0);
    assert_eq!((snapshot(&src), snapshot(&dst)), after_first);
}

#[test]
fn files_are_conserved_and_target_never_clobbered() {
    let (_td, src, dst) = roots();
    populate(&src, &dst);
    let src_before = snapshot(&src);
    let dst_before = snapshot(&dst);

    let report = merge(&src, &dst, &options(3, 4)).unwrap();
    assert!(report.is_success());
    let dst_after = snapshot(&dst);
    let src_after = snapshot(&src);

    // Every pre-existing target entry is unchanged.
    for (path, node) in &dst_before {
        assert_eq!(dst_after.get(path), Some(node), "clobbered {}", path.display());
    }

    // Every source-only file now lives in the target with the same bytes.
    for (path, node) in &src_before {
        if let Node::File(_) = node
            && !dst_before.contains_key(path)
        {
            assert_eq!(dst_after.get(path), Some(node), "lost {}", path.display());
            assert!(!src_after.contains_key(path), "still in source: {}", path.display());
        }
    }

    // Nothing new appeared in the target that was not in either tree.
    let union: BTreeMap<&PathBuf, ()> = src_before
        .keys()
        .chain(dst_before.keys())
        .map(|k| (k, ()))
        .collect();
    assert!(dst_after.keys().all(|k| union.contains_key(k)));
}

#[cfg(unix)]
#[test]
fn symlinks_at_any_depth_are_excluded() {
    use std::os::unix::fs::symlink;

    let (td, src, dst) = roots();
    let outside = td.path().join("outside");
    write_file(&outside.join("secret.txt"), "s");
    write_file(&src.join("keep/a.txt"), "a");
    write_file(&dst.join("keep/.marker"), "");
    symlink(&outside, src.join("keep/dir_link")).unwrap();
    symlink(outside.join("secret.txt"), src.join("keep/file_link")).unwrap();
    symlink(td.path().join("nowhere"), src.join("dangling")).unwrap();

    let report = merge(&src, &dst, &options(2, 16)).unwrap();
    assert_eq!(report.stats.symlinks_skipped, 3);
    for rel in ["keep/dir_link", "keep/file_link", "dangling"] {
        assert!(std::fs::symlink_metadata(src.join(rel)).unwrap().file_type().is_symlink());
        assert!(std::fs::symlink_metadata(dst.join(rel)).is_err(), "{rel} leaked into target");
    }
    // The link target itself is never touched.
    assert!(outside.join("secret.txt").exists());
}

#[test]
fn dry_run_changes_nothing_but_counts_the_same() {
    let (_td, src, dst) = roots();
    populate(&src, &dst);
    let before = (snapshot(&src), snapshot(&dst));

    let mut dry = options(4, 8);
    dry.dry_run = true;
    let planned = merge(&src, &dst, &dry).unwrap();
    assert_eq!((snapshot(&src), snapshot(&dst)), before);

    let real = merge(&src, &dst, &options(4, 8)).unwrap();
    assert_eq!(planned.stats, real.stats);
    assert!(real.stats.moved() > 0);
}

#[test]
fn derived_counters_add_up() {
    let (_td, src, dst) = roots();
    populate(&src, &dst);

    let s = merge(&src, &dst, &options(4, 8)).unwrap().stats;
    assert_eq!(s.files_moved + s.files_skipped, s.files_checked);
    assert_eq!(s.dirs_moved + s.dirs_skipped, s.dirs_checked);
}
