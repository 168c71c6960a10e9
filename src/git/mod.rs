//! Commit frequency data source
//!
//! Reads commit timestamps from local git repositories and turns them into
//! per-repository commit-count series.
//!
//! # Example
//!
//! ```no_run
//! use commitplot::config::HistoryConfig;
//! use commitplot::git::{CommitSource, GitCommitSource};
//! use commitplot::models::TimeUnit;
//!
//! let source = GitCommitSource::new(HistoryConfig::default());
//! let ids = vec!["/path/to/repo".to_string()];
//! let dataset = source.get_commit_frequencies(&ids, TimeUnit::Month).unwrap();
//! println!("{} buckets", dataset.series[0].len());
//! ```

pub mod history;
pub mod source;

pub use history::CommitHistory;
pub use source::{commit_frequencies, CommitSource, GitCommitSource};
