use rotalog::output::LevelFormat;
use rotalog::{EncoderConfig, Encoding, Level, Logger, SizeRollingWriter};
use std::fs;
use tempfile::TempDir;

fn file_logger(path: &std::path::Path, encoder: EncoderConfig) -> Logger {
    let writer = SizeRollingWriter::new(path).unwrap();
    Logger::builder()
        .level(Level::Debug)
        .file(writer)
        .encoder(encoder)
        .done()
        .build()
}

#[test]
fn file_output_writes_tab_separated_lines() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("app.log");

    let logger = file_logger(&path, EncoderConfig::production().caller(false));
    logger.info("hello world");
    logger.error("5");

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<Vec<&str>> = content.lines().map(|l| l.split('\t').collect()).collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0][1], "INFO");
    assert_eq!(lines[0][2], "hello world");
    assert_eq!(lines[1][1], "ERROR");
    assert_eq!(lines[1][2], "5");
}

#[test]
fn file_output_includes_caller_column() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("caller.log");

    let logger = file_logger(&path, EncoderConfig::production());
    logger.warn("with caller");

    let content = fs::read_to_string(&path).unwrap();
    let cols: Vec<&str> = content.trim_end().split('\t').collect();
    assert_eq!(cols.len(), 4);
    assert!(cols[2].starts_with("tests/file_output.rs:"));
}

#[test]
fn file_output_uses_time_format() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("time.log");

    let logger = file_logger(
        &path,
        EncoderConfig::production()
            .time_format("%Y")
            .caller(false)
            .level_format(LevelFormat::Lowercase),
    );
    logger.debug("x");

    let content = fs::read_to_string(&path).unwrap();
    let year = chrono::Local::now().format("%Y").to_string();
    assert_eq!(content, format!("{year}\tdebug\tx\n"));
}

#[test]
fn file_output_writes_json_lines() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("app.jsonl");

    let logger = file_logger(&path, EncoderConfig::production().encoding(Encoding::Json));
    logger.info("one");
    logger.info("two \"quoted\"");

    let content = fs::read_to_string(&path).unwrap();
    let msgs: Vec<String> = content
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["msg"].to_string())
        .collect();
    assert_eq!(msgs, vec!["\"one\"", "\"two \\\"quoted\\\"\""]);
}

#[test]
fn file_output_appends_to_existing_file() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("existing.log");
    fs::write(&path, "previous run\n").unwrap();

    let logger = file_logger(&path, EncoderConfig::production().caller(false));
    logger.info("this run");

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("previous run\n"));
    assert!(content.trim_end().ends_with("this run"));
}
