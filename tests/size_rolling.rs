//! Tests for size-based rotation.

use regex::Regex;
use rotalog::SizeRollingWriter;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn backups(dir: &Path) -> Vec<String> {
    let re = Regex::new(r"^app-\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}\.\d{3}\.log(\.gz)?$").unwrap();
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok()?.file_name().into_string().ok())
        .filter(|name| re.is_match(name))
        .collect();
    names.sort();
    names
}

#[test]
fn rotates_when_file_would_exceed_limit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let mut writer = SizeRollingWriter::new(&path)
        .unwrap()
        .max_size_bytes(50)
        .compress(false);

    for _ in 0..5 {
        writer.write_all(&[b'x'; 20]).unwrap();
    }

    // 20+20 fit, the third 20 rotates: two full backups and 20 bytes active.
    assert_eq!(fs::metadata(&path).unwrap().len(), 20);
    let names = backups(dir.path());
    assert_eq!(names.len(), 2);
    for name in &names {
        assert_eq!(fs::metadata(dir.path().join(name)).unwrap().len(), 40);
    }
}

#[test]
fn backups_are_gzipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let mut writer = SizeRollingWriter::new(&path).unwrap().max_size_bytes(30);

    for _ in 0..4 {
        writer.write_all(b"0123456789abcdef\n").unwrap();
    }

    let names = backups(dir.path());
    assert!(!names.is_empty());
    assert!(names.iter().all(|n| n.ends_with(".log.gz")));
}

#[test]
fn keeps_at_most_max_backups() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let mut writer = SizeRollingWriter::new(&path)
        .unwrap()
        .max_size_bytes(10)
        .max_backups(2)
        .compress(false);

    for _ in 0..8 {
        writer.write_all(b"123456789\n").unwrap();
    }

    assert_eq!(backups(dir.path()).len(), 2);
}

#[test]
fn removes_backups_older_than_max_age() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let stale = dir.path().join("app-2000-01-01T00-00-00.000.log.gz");
    fs::write(&stale, b"old").unwrap();

    let mut writer = SizeRollingWriter::new(&path).unwrap().max_age_days(1);
    writer.open().unwrap();

    assert!(!stale.exists());
    assert!(path.exists());
}

#[test]
fn rejects_writes_larger_than_the_limit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let mut writer = SizeRollingWriter::new(&path).unwrap().max_size_bytes(8);

    let err = writer.write(&[0; 16]).unwrap_err();
    let inner = err
        .get_ref()
        .and_then(|e| e.downcast_ref::<rotalog::Error>())
        .expect("rotalog error inside io::Error");
    assert!(matches!(inner, rotalog::Error::WriteTooLarge { len: 16, max: 8, .. }));
}

#[test]
fn forced_rotation_starts_an_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let mut writer = SizeRollingWriter::new(&path).unwrap().compress(false);

    writer.write_all(b"before\n").unwrap();
    writer.rotate().unwrap();
    writer.write_all(b"after\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
    let names = backups(dir.path());
    assert_eq!(names.len(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join(&names[0])).unwrap(),
        "before\n"
    );
}

#[test]
fn creates_missing_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("app.log");
    let mut writer = SizeRollingWriter::new(&path).unwrap();

    writer.write_all(b"line\n").unwrap();

    assert!(path.exists());
}
