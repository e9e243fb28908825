//! The "current image" slot.
//!
//! Loads can complete out of order (a slow URL fetch finishing after a quick
//! local file). Each load is stamped with a [`RequestToken`] when it starts;
//! on completion only the most recently issued token may commit. Older
//! completions are dropped, which cancels them by disinterest rather than by
//! interrupting the work.
//!
//! The committed [`Snapshot`] is shared behind an `Arc` and never mutated;
//! a new load replaces it wholesale.

use crate::analysis::{self, Snapshot};
use crate::config::ArtcheckConfig;
use crate::ingest::{IngestError, Source};
use crate::validate::Badge;
use std::sync::Arc;

/// Identifies one load request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Empty,
    Loading,
    Ready,
    /// The latest load failed; any previous snapshot is still shown.
    LoadFailed,
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    Failed,
    /// A newer request was issued after this one; the result was discarded.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    issued: u64,
    status: SessionStatus,
    current: Option<Arc<Snapshot>>,
    last_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load and get the token its result must be committed with.
    pub fn begin(&mut self) -> RequestToken {
        self.issued += 1;
        self.status = SessionStatus::Loading;
        RequestToken(self.issued)
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.issued
    }

    /// Record the result of the load started with `token`.
    pub fn commit(
        &mut self,
        token: RequestToken,
        result: Result<Snapshot, IngestError>,
    ) -> CommitOutcome {
        if !self.is_latest(token) {
            tracing::debug!(
                token = token.0,
                latest = self.issued,
                "Discarding stale load result"
            );
            return CommitOutcome::Stale;
        }
        match result {
            Ok(snapshot) => {
                self.current = Some(Arc::new(snapshot));
                self.status = SessionStatus::Ready;
                self.last_error = None;
                CommitOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "Image load failed");
                self.status = SessionStatus::LoadFailed;
                self.last_error = Some(e.to_string());
                CommitOutcome::Failed
            }
        }
    }

    /// Begin, load, and commit `source` in one step.
    pub fn load(&mut self, source: &Source, config: &ArtcheckConfig) -> CommitOutcome {
        let token = self.begin();
        let result = analysis::load(source, config);
        self.commit(token, result)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Badge to display: load failure wins over the previous image's report.
    pub fn badge(&self) -> Option<Badge> {
        match self.status {
            SessionStatus::LoadFailed => Some(Badge::LoadFailed),
            _ => self.current.as_ref().map(|s| s.analysis.badge),
        }
    }
}
