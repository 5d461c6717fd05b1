//! Tests for the logger module

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::*;
use crate::logger::writer::LogFileWriter;

fn file_config(path: PathBuf, append: bool) -> FileConfig {
    FileConfig {
        enabled: true,
        path,
        append,
        format: LogFormat::Json,
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = LoggerConfig::default();
        assert!(config.console.enabled);
        assert!(config.console.colored);
        assert!(!config.file.enabled);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_config_validation_requires_an_output() {
        let mut config = LoggerConfig::default();
        assert!(config.validate().is_ok());

        config.console.enabled = false;
        config.file.enabled = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        let config = LoggerConfig::default().with_level("DEBUG");
        assert_eq!(config.parse_level().unwrap(), tracing::Level::DEBUG);

        let config = LoggerConfig::default().with_level("loud");
        assert!(config.parse_level().is_err());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::default(), LogFormat::Full);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_file_config_empty_path_rejected_when_enabled() {
        assert!(FileConfig::new(true, PathBuf::new(), true, LogFormat::Full).is_err());
        assert!(FileConfig::new(false, PathBuf::new(), true, LogFormat::Full).is_ok());
    }
}

mod writer_tests {
    use super::*;

    #[test]
    fn test_writer_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/logs/run.log");

        let writer = LogFileWriter::new(&file_config(path.clone(), true)).unwrap();
        writer.make_writer().write_all(b"hello\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_writer_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "first\n").unwrap();

        let writer = LogFileWriter::new(&file_config(path.clone(), true)).unwrap();
        writer.make_writer().write_all(b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_writer_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "stale\n").unwrap();

        let writer = LogFileWriter::new(&file_config(path.clone(), false)).unwrap();
        writer.make_writer().write_all(b"fresh\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_json_events_reach_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        let writer = LogFileWriter::new(&file_config(path.clone(), true)).unwrap();

        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(writer)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(outcome = "sent", position = 1, "delivery finished");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let line: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(line["fields"]["outcome"], "sent");
        assert_eq!(line["fields"]["message"], "delivery finished");
    }
}
