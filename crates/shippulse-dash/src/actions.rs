//! User-triggered connector actions.
//!
//! A [`SyncAction`] guards one connector's manual sync button: at most one
//! run pending at a time, and a successful run names the cache namespace
//! to invalidate so dependent screens refetch post-sync data.

use shippulse_core::error::{MetricsError, MetricsResult};

/// Manual sync trigger for one connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncAction {
    connector: String,
    namespace: String,
    pending: bool,
}

impl SyncAction {
    /// Action for `connector`, invalidating `namespace` on success.
    pub fn new(connector: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            connector: connector.into(),
            namespace: namespace.into(),
            pending: false,
        }
    }

    /// The Linear re-sync action: syncs the `linear` connector and
    /// invalidates the `linear` cache namespace.
    #[must_use]
    pub fn linear() -> Self {
        Self::new("linear", "linear")
    }

    /// Connector this action triggers.
    #[must_use]
    pub fn connector(&self) -> &str {
        &self.connector
    }

    /// Cache namespace invalidated when a run succeeds.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// True while a triggered run has not finished.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Mark a run as started.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::SyncAlreadyRunning`] when a previous run is
    /// still pending; the caller must not re-trigger.
    pub fn begin(&mut self) -> MetricsResult<()> {
        if self.pending {
            return Err(MetricsError::SyncAlreadyRunning {
                connector: self.connector.clone(),
            });
        }
        self.pending = true;
        tracing::debug!(
            target: "shippulse.dash",
            op = "sync_begin",
            connector = %self.connector,
            "sync triggered"
        );
        Ok(())
    }

    /// Mark the pending run as finished.
    ///
    /// Clears the pending flag either way. Returns the namespace to
    /// invalidate when the run succeeded; a failed run must not evict
    /// anything, since no new data landed.
    pub fn finish(&mut self, result: &MetricsResult<()>) -> Option<&str> {
        self.pending = false;
        match result {
            Ok(()) => {
                tracing::debug!(
                    target: "shippulse.dash",
                    op = "sync_finish",
                    connector = %self.connector,
                    namespace = %self.namespace,
                    "sync succeeded"
                );
                Some(&self.namespace)
            }
            Err(error) => {
                tracing::debug!(
                    target: "shippulse.dash",
                    op = "sync_finish",
                    connector = %self.connector,
                    error = %error,
                    "sync failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetch_error() -> MetricsError {
        MetricsError::FetchFailed {
            metric: "sync/connectors".into(),
            source: Box::new(std::io::Error::other("backend unavailable")),
        }
    }

    #[test]
    fn begin_while_pending_is_rejected() {
        let mut action = SyncAction::linear();
        assert!(action.begin().is_ok());
        assert!(action.is_pending());

        match action.begin() {
            Err(MetricsError::SyncAlreadyRunning { connector }) => {
                assert_eq!(connector, "linear");
            }
            other => panic!("expected SyncAlreadyRunning, got {other:?}"),
        }
    }

    #[test]
    fn successful_finish_names_the_namespace() {
        let mut action = SyncAction::linear();
        action.begin().unwrap();
        assert_eq!(action.finish(&Ok(())), Some("linear"));
        assert!(!action.is_pending());
    }

    #[test]
    fn failed_finish_invalidates_nothing() {
        let mut action = SyncAction::linear();
        action.begin().unwrap();
        assert_eq!(action.finish(&Err(fetch_error())), None);
        // Pending clears even on failure so the user can retry.
        assert!(!action.is_pending());
        assert!(action.begin().is_ok());
    }

    #[test]
    fn action_names_its_connector() {
        let action = SyncAction::new("jira", "jira");
        assert_eq!(action.connector(), "jira");
        assert_eq!(action.namespace(), "jira");
        assert!(!action.is_pending());
    }
}
