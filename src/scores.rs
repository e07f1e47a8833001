//! Flat-file high scores: one `name: score` record per line.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

pub const LEADERBOARD_SIZE: usize = 10;
const SEPARATOR: &str = ": ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: usize,
}

impl ScoreEntry {
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split(SEPARATOR);
        let (name, score) = (parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        let score = score.trim().parse().ok()?;
        Some(ScoreEntry { name: name.to_string(), score })
    }
}

pub struct ScoreBoard {
    path: PathBuf,
}

impl ScoreBoard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ScoreBoard { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a record, creating the file if needed.
    pub fn record(&self, name: &str, score: usize) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("empty player name");
        }
        if name.contains('\n') || name.contains(SEPARATOR) {
            bail!("player name may not contain a newline or \"{}\"", SEPARATOR);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open score file {}", self.path.display()))?;

        writeln!(file, "{}{}{}", name, SEPARATOR, score)
            .with_context(|| format!("Failed to write score file {}", self.path.display()))
    }

    /// Every well-formed record, in file order. A missing file reads as empty.
    pub fn load(&self) -> Result<Vec<ScoreEntry>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read score file {}", self.path.display()))
            }
        };

        Ok(content.lines().filter_map(ScoreEntry::parse).collect())
    }

    /// Highest first; ties keep file order.
    pub fn top(&self, n: usize) -> Result<Vec<ScoreEntry>> {
        let mut entries = self.load()?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(n);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_well_formed_lines() {
        assert_eq!(
            ScoreEntry::parse("ada: 12"),
            Some(ScoreEntry { name: "ada".to_string(), score: 12 })
        );
        assert_eq!(ScoreEntry::parse("ada 12"), None);
        assert_eq!(ScoreEntry::parse("ada: twelve"), None);
        assert_eq!(ScoreEntry::parse("a: b: 3"), None);
        assert_eq!(ScoreEntry::parse(""), None);
    }

    #[test]
    fn rejects_blank_names() {
        let board = ScoreBoard::new(std::env::temp_dir().join("never_written_scores.txt"));
        assert!(board.record("   ", 3).is_err());
        assert!(board.record("a: b", 3).is_err());
    }
}
