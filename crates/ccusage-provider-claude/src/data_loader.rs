//! Data loader module for discovering and parsing JSONL files
//!
//! The loader resolves the Claude data directory, walks its `projects`
//! subtree for `.jsonl` logs, and streams every valid line as a
//! [`UsageEntry`] tagged with the session its file belongs to. Invalid lines
//! are skipped; an unreadable file or directory ends the stream with an
//! error.
//!
//! # Examples
//!
//! ```no_run
//! use ccusage_core::filters::DateFilter;
//! use ccusage_core::timezone::TimezoneConfig;
//! use ccusage_provider_claude::data_loader::{LoadOptions, load_daily_usage};
//!
//! # async fn example() -> ccusage_core::Result<()> {
//! let options = LoadOptions::new().with_filter(DateFilter::new().with_since("20240101"));
//! let daily = load_daily_usage(&options, &TimezoneConfig::default()).await?;
//! for day in &daily {
//!     println!("{}: ${:.2}", day.date, day.total_cost);
//! }
//! # Ok(())
//! # }
//! ```

use crate::discovery::{PathStyle, find_log_files};
use crate::parser::parse_line;
use crate::paths::{EnvSource, ProcessEnv, projects_dir, resolve_claude_path};
use ccusage_core::aggregation::{Aggregator, sort_daily, sort_sessions};
use ccusage_core::aggregation_types::{DailyUsage, SessionUsage};
use ccusage_core::error::{CcusageError, Result};
use ccusage_core::filters::DateFilter;
use ccusage_core::timezone::TimezoneConfig;
use ccusage_core::types::{ParseResult, SessionKey, UsageEntry};
use futures::stream::Stream;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

/// Options shared by the daily and session loads
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Inclusive date bounds applied after aggregation
    pub filter: DateFilter,
    /// Claude data directory; `<home>/.claude` when absent
    pub claude_path: Option<PathBuf>,
}

impl LoadOptions {
    /// Options with no bounds and the default data directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date bounds
    pub fn with_filter(mut self, filter: DateFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the data directory
    pub fn with_claude_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.claude_path = Some(path.into());
        self
    }
}

/// Data loader for discovering and streaming JSONL files
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Claude data directory
    claude_path: PathBuf,
    /// Zone used for offset-less timestamps and date bucketing
    timezone_config: TimezoneConfig,
}

impl DataLoader {
    /// Create a loader for an explicit data directory
    pub fn new(claude_path: impl Into<PathBuf>, timezone_config: TimezoneConfig) -> Self {
        Self {
            claude_path: claude_path.into(),
            timezone_config,
        }
    }

    /// Create a loader from load options, resolving the default data
    /// directory through `env`
    pub fn from_options<E: EnvSource + ?Sized>(
        options: &LoadOptions,
        env: &E,
        timezone_config: TimezoneConfig,
    ) -> Self {
        let claude_path = resolve_claude_path(options.claude_path.as_deref(), env);
        debug!("Using Claude data directory {}", claude_path.display());
        Self::new(claude_path, timezone_config)
    }

    /// The Claude data directory
    pub fn claude_path(&self) -> &Path {
        &self.claude_path
    }

    /// Root of the log tree
    pub fn projects_dir(&self) -> PathBuf {
        projects_dir(&self.claude_path)
    }

    /// Find all log files under the projects directory, sorted by path
    pub async fn find_usage_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = find_log_files(&self.projects_dir(), PathStyle::Rooted).await?;
        files.sort();
        Ok(files)
    }

    /// Session key for a log file found under the projects directory
    pub fn session_key_for(&self, file: &Path) -> SessionKey {
        let projects = self.projects_dir();
        let relative = file.strip_prefix(&projects).unwrap_or(file);
        let segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        SessionKey::from_segments(&segments, std::path::MAIN_SEPARATOR_STR)
    }

    /// Stream every valid usage entry from every log file
    ///
    /// Files are read whole and decoded lossily. Blank and invalid lines are
    /// skipped. A discovery or read failure is yielded as the final item.
    pub fn load_usage_entries(&self) -> impl Stream<Item = Result<UsageEntry>> + '_ {
        async_stream::stream! {
            let files = match self.find_usage_files().await {
                Ok(files) => files,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let tz = self.timezone_config.tz;
            for file in files {
                let session = self.session_key_for(&file);
                let bytes = match tokio::fs::read(&file).await {
                    Ok(bytes) => bytes,
                    Err(source) => {
                        yield Err(CcusageError::ReadFile { path: file, source });
                        return;
                    }
                };

                let content = String::from_utf8_lossy(&bytes);
                let mut skipped = 0usize;
                for (index, line) in content.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_line(line, &tz) {
                        ParseResult::Valid(record) => {
                            yield Ok(UsageEntry { session: session.clone(), record });
                        }
                        ParseResult::Invalid(reason) => {
                            skipped += 1;
                            trace!(
                                "Skipping line {} in {}: {}",
                                index + 1,
                                file.display(),
                                reason
                            );
                        }
                    }
                }

                if skipped > 0 {
                    debug!("Skipped {} invalid lines in {}", skipped, file.display());
                }
            }
        }
    }

    /// Daily summaries within `filter`, newest first
    pub async fn daily_usage(&self, filter: &DateFilter) -> Result<Vec<DailyUsage>> {
        let aggregator = Aggregator::new(self.timezone_config.clone());
        let daily = aggregator.aggregate_daily(self.load_usage_entries()).await?;
        let mut daily = filter.apply(daily);
        sort_daily(&mut daily);
        Ok(daily)
    }

    /// Session summaries whose last activity is within `filter`, costliest
    /// first
    pub async fn session_usage(&self, filter: &DateFilter) -> Result<Vec<SessionUsage>> {
        let aggregator = Aggregator::new(self.timezone_config.clone());
        let sessions = aggregator
            .aggregate_sessions(self.load_usage_entries())
            .await?;
        let mut sessions = filter.apply(sessions);
        sort_sessions(&mut sessions);
        Ok(sessions)
    }
}

/// Load, aggregate, filter, and sort daily usage from the process environment
pub async fn load_daily_usage(
    options: &LoadOptions,
    timezone_config: &TimezoneConfig,
) -> Result<Vec<DailyUsage>> {
    DataLoader::from_options(options, &ProcessEnv, timezone_config.clone())
        .daily_usage(&options.filter)
        .await
}

/// Load, aggregate, filter, and sort session usage from the process
/// environment
pub async fn load_session_usage(
    options: &LoadOptions,
    timezone_config: &TimezoneConfig,
) -> Result<Vec<SessionUsage>> {
    DataLoader::from_options(options, &ProcessEnv, timezone_config.clone())
        .session_usage(&options.filter)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn usage_line(timestamp: &str, input: u64, output: u64, cost: f64) -> String {
        format!(
            r#"{{"timestamp":"{timestamp}","costUSD":{cost},"message":{{"usage":{{"input_tokens":{input},"output_tokens":{output}}}}}}}"#
        )
    }

    fn write_log(root: &Path, relative: &str, lines: &[String]) {
        let path = root.join("projects").join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, lines.join("\n")).unwrap();
    }

    fn loader(root: &Path) -> DataLoader {
        DataLoader::new(root, TimezoneConfig::fixed(chrono_tz::UTC))
    }

    #[tokio::test]
    async fn test_stream_skips_invalid_and_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        write_log(
            temp_dir.path(),
            "proj/sess/log.jsonl",
            &[
                usage_line("2024-01-01T10:00:00Z", 100, 50, 0.01),
                String::new(),
                "   ".to_string(),
                "{broken".to_string(),
                r#"{"type":"user","timestamp":"2024-01-01T10:00:00Z"}"#.to_string(),
                usage_line("2024-01-01T11:00:00Z", 200, 100, 0.02),
            ],
        );

        let loader = loader(temp_dir.path());
        let entries: Vec<UsageEntry> = loader
            .load_usage_entries()
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.session == SessionKey::new("proj", "sess")));
        assert_eq!(entries[1].record.tokens.input_tokens, 200);
    }

    #[test]
    fn test_session_key_for_nested_paths() {
        let temp_dir = TempDir::new().unwrap();
        let loader = loader(temp_dir.path());
        let projects = loader.projects_dir();
        let sep = std::path::MAIN_SEPARATOR_STR;

        let key = loader.session_key_for(&projects.join("a").join("b").join("s1").join("x.jsonl"));
        assert_eq!(key.project_path, format!("a{sep}b"));
        assert_eq!(key.session_id, "s1");

        let key = loader.session_key_for(&projects.join("s1").join("x.jsonl"));
        assert_eq!(key, SessionKey::new("Unknown Project", "s1"));

        let key = loader.session_key_for(&projects.join("x.jsonl"));
        assert_eq!(key, SessionKey::new("Unknown Project", "unknown"));
    }

    #[tokio::test]
    async fn test_missing_data_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loader = loader(&temp_dir.path().join("nowhere"));

        assert!(loader.daily_usage(&DateFilter::new()).await.unwrap().is_empty());
        assert!(loader.session_usage(&DateFilter::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_daily_usage_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        write_log(
            temp_dir.path(),
            "proj/s1/a.jsonl",
            &[
                usage_line("2024-01-01T10:00:00Z", 100, 50, 0.01),
                usage_line("2024-01-03T10:00:00Z", 100, 50, 0.01),
            ],
        );
        write_log(
            temp_dir.path(),
            "proj/s2/b.jsonl",
            &[
                usage_line("2024-01-02T10:00:00Z", 100, 50, 0.01),
                usage_line("2024-01-03T12:00:00Z", 300, 150, 0.03),
            ],
        );

        let loader = loader(temp_dir.path());
        let all = loader.daily_usage(&DateFilter::new()).await.unwrap();
        let dates: Vec<String> = all.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
        assert_eq!(all[0].tokens.input_tokens, 400);

        let bounded = loader
            .daily_usage(&DateFilter::new().with_since("20240102").with_until("20240102"))
            .await
            .unwrap();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].date.to_string(), "2024-01-02");
    }

    #[tokio::test]
    async fn test_huge_token_counts_saturate() {
        let temp_dir = TempDir::new().unwrap();
        let huge = 10_000_000_000_000_000_000;
        write_log(
            temp_dir.path(),
            "proj/sess/a.jsonl",
            &[
                usage_line("2024-01-01T10:00:00Z", huge, 1, 0.01),
                usage_line("2024-01-01T11:00:00Z", huge, 1, 0.01),
            ],
        );

        let daily = loader(temp_dir.path())
            .daily_usage(&DateFilter::new())
            .await
            .unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].tokens.input_tokens, u64::MAX);
        assert_eq!(daily[0].tokens.output_tokens, 2);
        assert_eq!(daily[0].tokens.total(), u64::MAX);
    }

    #[tokio::test]
    async fn test_session_usage_sorted_by_cost() {
        let temp_dir = TempDir::new().unwrap();
        write_log(
            temp_dir.path(),
            "proj/cheap/a.jsonl",
            &[usage_line("2024-01-05T10:00:00Z", 10, 5, 0.5)],
        );
        write_log(
            temp_dir.path(),
            "proj/pricey/b.jsonl",
            &[
                usage_line("2024-01-01T10:00:00Z", 10, 5, 1.0),
                usage_line("2024-01-02T10:00:00Z", 10, 5, 1.0),
            ],
        );

        let loader = loader(temp_dir.path());
        let sessions = loader.session_usage(&DateFilter::new()).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session_id, "pricey");
        assert_eq!(sessions[0].total_cost, 2.0);
        assert_eq!(sessions[0].last_activity.to_string(), "2024-01-02");
        assert_eq!(sessions[1].session_id, "cheap");

        // Sessions are filtered on their last activity date
        let recent = loader
            .session_usage(&DateFilter::new().with_since("20240103"))
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].session_id, "cheap");
    }

    #[tokio::test]
    async fn test_from_options_resolves_home() {
        let temp_dir = TempDir::new().unwrap();
        let home = temp_dir.path().to_string_lossy().into_owned();
        let env: HashMap<String, String> = [("HOME".to_string(), home)].into_iter().collect();

        let loader = DataLoader::from_options(
            &LoadOptions::new(),
            &env,
            TimezoneConfig::fixed(chrono_tz::UTC),
        );
        assert_eq!(loader.claude_path(), temp_dir.path().join(".claude"));

        let explicit = LoadOptions::new().with_claude_path("/data/claude");
        let loader =
            DataLoader::from_options(&explicit, &env, TimezoneConfig::fixed(chrono_tz::UTC));
        assert_eq!(loader.claude_path(), Path::new("/data/claude"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_file_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        write_log(
            temp_dir.path(),
            "proj/s1/a.jsonl",
            &[usage_line("2024-01-01T10:00:00Z", 1, 1, 0.1)],
        );
        let file = temp_dir.path().join("projects/proj/s1/a.jsonl");
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o000)).unwrap();

        let readable = std::fs::read(&file).is_ok();
        let result = loader(temp_dir.path()).daily_usage(&DateFilter::new()).await;
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();

        if readable {
            return;
        }
        assert!(matches!(result, Err(CcusageError::ReadFile { .. })));
    }
}
