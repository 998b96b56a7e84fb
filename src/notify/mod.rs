//! Notification module.
//!
//! Posts rendered summaries to a remote review thread. The pipeline only
//! sees the [`Notifier`] trait; [`GitLabNotifier`] is the implementation
//! used by the CLI.

mod gitlab;

pub use gitlab::GitLabNotifier;

use async_trait::async_trait;
use tracing::info;

use crate::config::CommentTarget;
use crate::error::Result;

/// Something that can post a comment on a review thread.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Posts `body` on thread `thread_id` of target `target_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment could not be posted.
    async fn post_comment(&self, target_id: &str, thread_id: &str, body: &str) -> Result<()>;
}

/// Posts a rendered summary on a merge request.
///
/// # Errors
///
/// Returns the notifier's error unchanged.
pub async fn post_summary(notifier: &dyn Notifier, target: &CommentTarget, body: &str) -> Result<()> {
    info!("Posting plan summary to {target}");
    notifier
        .post_comment(&target.project_id, &target.merge_request_iid.to_string(), body)
        .await?;
    info!("Plan summary posted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NotifyError, TpsError};
    use mockall::mock;

    mock! {
        pub Poster {}

        #[async_trait]
        impl Notifier for Poster {
            async fn post_comment(&self, target_id: &str, thread_id: &str, body: &str) -> Result<()>;
        }
    }

    fn target() -> CommentTarget {
        CommentTarget {
            project_id: String::from("group/project"),
            merge_request_iid: 12,
        }
    }

    #[tokio::test]
    async fn test_post_summary_passes_target() {
        let mut poster = MockPoster::new();
        poster
            .expect_post_comment()
            .withf(|target, thread, body| {
                target == "group/project" && thread == "12" && body == "summary body"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        post_summary(&poster, &target(), "summary body").await.unwrap();
    }

    #[tokio::test]
    async fn test_post_summary_surfaces_failure() {
        let mut poster = MockPoster::new();
        poster.expect_post_comment().times(1).returning(|_, _, _| {
            Err(TpsError::Notify(NotifyError::AuthenticationFailed {
                message: String::from("401"),
            }))
        });

        let err = post_summary(&poster, &target(), "body").await.unwrap_err();
        assert!(matches!(
            err,
            TpsError::Notify(NotifyError::AuthenticationFailed { .. })
        ));
    }
}
