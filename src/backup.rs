//! Backup management for ledger files.
//!
//! Every time a ledger file is about to be replaced, the current file is copied into the backups
//! directory first. Only the newest `backup_copies` copies per ledger are kept.

use crate::{utils, Config};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
        }
    }

    /// Copies the file at `source` to the backups directory.
    ///
    /// The filename format is `{prefix}.YYYY-MM-DD-NNN.{extension}` where NNN is a sequence
    /// number. Automatically rotates old backups, keeping only `backup_copies` files.
    ///
    /// Returns the path to the created backup file.
    pub async fn copy_file(&self, source: &Path, prefix: &str, extension: &str) -> Result<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(prefix, &date, extension).await?;
        let filename = format!("{prefix}.{date}-{seq:03}.{extension}");
        let path = self.backups_dir.join(&filename);

        utils::copy(source, &path).await?;

        self.rotate(prefix, extension).await?;

        Ok(path)
    }

    /// Lists the backups with the given prefix, oldest first.
    pub async fn list(&self, prefix: &str, extension: &str) -> Result<Vec<PathBuf>> {
        let mut files: Vec<(PathBuf, String)> = Vec::new();

        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy().to_string();

            if is_backup_file(&name, prefix, extension) {
                files.push((entry.path(), name));
            }
        }

        // Sort by filename (which sorts by date and sequence number due to format)
        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files.into_iter().map(|(path, _)| path).collect())
    }

    /// Scans the backups directory for existing files with the given prefix and date,
    /// and returns the next sequence number.
    async fn next_sequence_number(&self, prefix: &str, date: &str, extension: &str) -> Result<u32> {
        let pattern_start = format!("{prefix}.{date}-");
        let mut max_seq: u32 = 0;

        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            if name.starts_with(&pattern_start) {
                if let Some(seq) = parse_sequence_number(&name, prefix, date, extension) {
                    max_seq = max_seq.max(seq);
                }
            }
        }

        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only `backup_copies` files with the given prefix.
    async fn rotate(&self, prefix: &str, extension: &str) -> Result<()> {
        let files = self.list(prefix, extension).await?;

        // Delete oldest files if we have more than backup_copies
        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for path in files.into_iter().take(to_delete) {
            utils::remove(&path).await?;
        }

        Ok(())
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a backup filename.
/// Returns None if the filename doesn't match the expected pattern.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str, extension: &str) -> Option<u32> {
    // Pattern: {prefix}.{date}-{NNN}.{ext}
    let expected_start = format!("{prefix}.{date}-");
    let remainder = filename.strip_prefix(&expected_start)?;
    let seq_str = remainder.strip_suffix(&format!(".{extension}"))?;
    seq_str.parse().ok()
}

/// Checks if a filename is a backup file with the given prefix and extension.
fn is_backup_file(filename: &str, prefix: &str, extension: &str) -> bool {
    let Some(rest) = filename.strip_prefix(&format!("{prefix}.")) else {
        return false;
    };
    let Some(stamp) = rest.strip_suffix(&format!(".{extension}")) else {
        return false;
    };
    // YYYY-MM-DD-NNN
    stamp.len() >= 14 && stamp.chars().all(|c| c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number(
                "expenses_alice.2025-12-14-001.csv",
                "expenses_alice",
                "2025-12-14",
                "csv"
            ),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number(
                "expenses_alice.2025-12-14-042.csv",
                "expenses_alice",
                "2025-12-14",
                "csv"
            ),
            Some(42)
        );
        // Wrong prefix
        assert_eq!(
            parse_sequence_number(
                "expenses_bob.2025-12-14-001.csv",
                "expenses_alice",
                "2025-12-14",
                "csv"
            ),
            None
        );
        // Wrong date
        assert_eq!(
            parse_sequence_number(
                "expenses_alice.2025-12-13-001.csv",
                "expenses_alice",
                "2025-12-14",
                "csv"
            ),
            None
        );
    }

    #[test]
    fn test_is_backup_file() {
        assert!(is_backup_file(
            "expenses_alice.2025-12-14-001.csv",
            "expenses_alice",
            "csv"
        ));
        assert!(!is_backup_file(
            "expenses_alice.2025-12-14-001.csv",
            "expenses_al",
            "csv"
        ));
        // A user whose name extends another user's name with a dot is not mixed up.
        assert!(!is_backup_file(
            "expenses_alice.b.2025-12-14-001.csv",
            "expenses_alice",
            "csv"
        ));
        assert!(!is_backup_file(
            "expenses_alice.2025-12-14-001.json",
            "expenses_alice",
            "csv"
        ));
    }

    #[tokio::test]
    async fn test_copy_file_rotates() {
        let env = TestEnv::new().await;
        let config = env.config();
        let source = config.root().join("source.csv");
        let backup = config.backup();

        for i in 0..7 {
            utils::write(&source, format!("version {i}")).await.unwrap();
            backup.copy_file(&source, "expenses_alice", "csv").await.unwrap();
        }

        let files = backup.list("expenses_alice", "csv").await.unwrap();
        assert_eq!(files.len(), config.backup_copies() as usize);

        // The newest copy survives rotation.
        let newest = files.last().unwrap();
        assert_eq!(utils::read(newest).await.unwrap(), "version 6");
        assert!(newest.to_string_lossy().ends_with("-007.csv"));
    }
}
