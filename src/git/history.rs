//! Git history extraction using libgit2
//!
//! Walks the commit graph of a repository and reports when each commit
//! happened, using the git2 crate (Rust bindings to libgit2).

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{ErrorCode, Repository, Sort};
use std::path::Path;
use tracing::debug;

use crate::config::HistoryConfig;

/// Commit history reader for one repository.
pub struct CommitHistory {
    repo: Repository,
}

impl CommitHistory {
    /// Open a git repository.
    ///
    /// # Arguments
    /// * `path` - Path to the repository (or any subdirectory)
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Timestamps of the commits reachable from HEAD, newest first.
    ///
    /// Each timestamp carries the committer's own UTC offset, so its calendar
    /// date is the one the committer saw. A repository without any commit
    /// yields an empty list.
    pub fn commit_dates(&self, config: &HistoryConfig) -> Result<Vec<DateTime<FixedOffset>>> {
        match self.repo.head() {
            Ok(_) => {}
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                debug!("Repository {:?} has no commits yet", self.repo.path());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).context("Failed to resolve HEAD"),
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        if config.first_parent {
            revwalk.simplify_first_parent()?;
        }
        revwalk.push_head()?;

        let mut dates = Vec::new();
        for oid_result in revwalk {
            if config.max_commits > 0 && dates.len() >= config.max_commits {
                break;
            }

            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            dates.push(git_time_to_local(&commit.time()));
        }

        debug!("Read {} commits from {:?}", dates.len(), self.repo.path());
        Ok(dates)
    }
}

/// Convert a git timestamp to a date-time in the committer's offset.
fn git_time_to_local(time: &git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or(Utc.fix());
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_default()
        .with_timezone(&offset)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use git2::{Commit, Oid, Signature, Time};
    use tempfile::{tempdir, TempDir};

    /// Commit the next revision of `counter.txt` with the given parents.
    fn commit_at(
        repo: &Repository,
        dir: &Path,
        time: Time,
        parents: &[Oid],
        update_ref: Option<&str>,
    ) -> Result<Oid> {
        let sig = Signature::new("Test User", "test@example.com", &time)?;
        let tree_id = {
            let mut index = repo.index()?;
            std::fs::write(dir.join("counter.txt"), time.seconds().to_string())?;
            index.add_path(Path::new("counter.txt"))?;
            index.write()?;
            index.write_tree()?
        };
        let tree = repo.find_tree(tree_id)?;
        let parents = parents
            .iter()
            .map(|oid| repo.find_commit(*oid))
            .collect::<std::result::Result<Vec<Commit>, _>>()?;
        let parent_refs: Vec<&Commit> = parents.iter().collect();
        let message = format!("commit at {}", time.seconds());
        Ok(repo.commit(update_ref, &sig, &sig, &message, &tree, &parent_refs)?)
    }

    /// Create a repository with one commit per timestamp (seconds since epoch),
    /// committed in the given order at UTC.
    pub(crate) fn create_test_repo(timestamps: &[i64]) -> Result<TempDir> {
        create_test_repo_with_offset(timestamps, 0)
    }

    /// Like [`create_test_repo`], with every commit recorded at `offset_minutes`.
    pub(crate) fn create_test_repo_with_offset(
        timestamps: &[i64],
        offset_minutes: i32,
    ) -> Result<TempDir> {
        let dir = tempdir()?;
        let repo = Repository::init(dir.path())?;

        let mut parent: Option<Oid> = None;
        for ts in timestamps {
            let parents: Vec<Oid> = parent.into_iter().collect();
            let time = Time::new(*ts, offset_minutes);
            parent = Some(commit_at(&repo, dir.path(), time, &parents, Some("HEAD"))?);
        }

        Ok(dir)
    }

    /// Repository whose HEAD is a merge: `root -> main -> merge` with a side
    /// commit branching off `root` and merged as the second parent.
    fn create_merge_repo() -> Result<TempDir> {
        let dir = tempdir()?;
        let repo = Repository::init(dir.path())?;
        let at = |ts: i64| Time::new(ts, 0);

        let root = commit_at(&repo, dir.path(), at(1_700_000_000), &[], Some("HEAD"))?;
        let side = commit_at(&repo, dir.path(), at(1_700_100_000), &[root], None)?;
        let main = commit_at(&repo, dir.path(), at(1_700_200_000), &[root], Some("HEAD"))?;
        commit_at(&repo, dir.path(), at(1_700_300_000), &[main, side], Some("HEAD"))?;

        Ok(dir)
    }

    #[test]
    fn test_open_rejects_non_repo() -> Result<()> {
        let dir = create_test_repo(&[1_700_000_000])?;
        assert!(CommitHistory::open(dir.path()).is_ok());

        let non_repo = tempdir()?;
        assert!(CommitHistory::open(non_repo.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_commit_dates_newest_first() -> Result<()> {
        let dir = create_test_repo(&[1_700_000_000, 1_700_086_400, 1_700_172_800])?;
        let history = CommitHistory::open(dir.path())?;

        let dates = history.commit_dates(&HistoryConfig::default())?;
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0].timestamp(), 1_700_172_800);
        assert_eq!(dates[2].timestamp(), 1_700_000_000);
        Ok(())
    }

    #[test]
    fn test_commit_dates_respects_max_commits() -> Result<()> {
        let dir = create_test_repo(&[1_700_000_000, 1_700_086_400, 1_700_172_800])?;
        let history = CommitHistory::open(dir.path())?;

        let config = HistoryConfig {
            max_commits: 2,
            ..Default::default()
        };
        assert_eq!(history.commit_dates(&config)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_first_parent_skips_merged_branch() -> Result<()> {
        let dir = create_merge_repo()?;
        let history = CommitHistory::open(dir.path())?;

        let all = history.commit_dates(&HistoryConfig::default())?;
        assert_eq!(all.len(), 4);

        let config = HistoryConfig {
            first_parent: true,
            ..Default::default()
        };
        let first_parent = history.commit_dates(&config)?;
        assert_eq!(first_parent.len(), 3);
        assert!(first_parent.iter().all(|d| d.timestamp() != 1_700_100_000));
        Ok(())
    }

    #[test]
    fn test_commit_dates_keep_committer_offset() -> Result<()> {
        // 2023-11-14 22:13:20 UTC is already the 15th at +02:00
        let dir = create_test_repo_with_offset(&[1_700_000_000], 120)?;
        let history = CommitHistory::open(dir.path())?;

        let dates = history.commit_dates(&HistoryConfig::default())?;
        assert_eq!(dates[0].timestamp(), 1_700_000_000);
        assert_eq!(dates[0].offset().local_minus_utc(), 7200);
        assert_eq!(
            dates[0].date_naive(),
            NaiveDate::from_ymd_opt(2023, 11, 15).expect("valid date")
        );
        Ok(())
    }

    #[test]
    fn test_empty_repo_has_no_dates() -> Result<()> {
        let dir = tempdir()?;
        Repository::init(dir.path())?;
        let history = CommitHistory::open(dir.path())?;
        assert!(history.commit_dates(&HistoryConfig::default())?.is_empty());
        Ok(())
    }
}
