//! Common test utilities for ccusage integration tests
//!
//! Builds throwaway Claude data directories laid out the way Claude Code
//! writes them: `<root>/projects/<project...>/<session>/<file>.jsonl`.

#![allow(dead_code)]

use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for one usage log line
pub struct UsageLineBuilder {
    timestamp: String,
    cost_usd: f64,
    input_tokens: u64,
    output_tokens: u64,
    cache_creation_tokens: Option<u64>,
    cache_read_tokens: Option<u64>,
}

impl UsageLineBuilder {
    pub fn new(timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            cost_usd: 0.01,
            input_tokens: 100,
            output_tokens: 50,
            cache_creation_tokens: None,
            cache_read_tokens: None,
        }
    }

    pub fn cost(mut self, cost_usd: f64) -> Self {
        self.cost_usd = cost_usd;
        self
    }

    pub fn tokens(mut self, input: u64, output: u64) -> Self {
        self.input_tokens = input;
        self.output_tokens = output;
        self
    }

    pub fn cache(mut self, creation: u64, read: u64) -> Self {
        self.cache_creation_tokens = Some(creation);
        self.cache_read_tokens = Some(read);
        self
    }

    pub fn build(self) -> String {
        let mut usage = json!({
            "input_tokens": self.input_tokens,
            "output_tokens": self.output_tokens,
        });
        if let Some(creation) = self.cache_creation_tokens {
            usage["cache_creation_input_tokens"] = json!(creation);
        }
        if let Some(read) = self.cache_read_tokens {
            usage["cache_read_input_tokens"] = json!(read);
        }

        json!({
            "type": "assistant",
            "timestamp": self.timestamp,
            "costUSD": self.cost_usd,
            "message": {
                "model": "claude-sonnet-4-20250514",
                "usage": usage,
            },
        })
        .to_string()
    }
}

/// A temporary Claude data directory
pub struct ClaudeDir {
    temp_dir: TempDir,
}

impl ClaudeDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// The data directory itself (what `--path` points at)
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `lines` to `projects/<project>/<session>/<file>`
    pub fn write_log(&self, project: &str, session: &str, file: &str, lines: &[String]) -> PathBuf {
        let dir = self.path().join("projects").join(project).join(session);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file);
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();
        path
    }

    /// Write a file at an arbitrary path below `projects/`
    pub fn write_raw(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join("projects").join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }
}

/// The three-record fixture whose totals are 300/150/75/30 and $0.03
pub fn write_standard_fixture(dir: &ClaudeDir) {
    dir.write_log(
        "project-alpha",
        "session-1",
        "conversation.jsonl",
        &[
            UsageLineBuilder::new("2024-01-01T10:00:00Z")
                .tokens(100, 50)
                .cache(25, 10)
                .cost(0.01)
                .build(),
            UsageLineBuilder::new("2024-01-02T10:00:00Z")
                .tokens(100, 50)
                .cache(25, 10)
                .cost(0.01)
                .build(),
        ],
    );
    dir.write_log(
        "project-beta",
        "session-2",
        "conversation.jsonl",
        &[UsageLineBuilder::new("2024-01-03T10:00:00Z")
            .tokens(100, 50)
            .cache(25, 10)
            .cost(0.01)
            .build()],
    );
}
