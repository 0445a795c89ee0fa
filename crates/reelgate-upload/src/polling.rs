//! Progress polling
//!
//! Exposes the polling phase of a session as a `Stream` of progress updates.
//! Polls are strictly sequential: the next query is only issued once the
//! previous one resolved and `PollingConfig::interval` has elapsed. The wait
//! is cut short when the polling deadline falls inside it.
//! Cancellation interrupts the wait between polls but never an in-flight query.

use futures::{Stream, StreamExt};
use reelgate_core::{
    LifecycleError, PollTimeoutError, ProgressUpdate, UploadSession, UploadStatus,
};

use tokio::time::Instant;

use crate::controller::UploadLifecycleController;

impl UploadLifecycleController {
    /// Poll the active session until it reaches a terminal state.
    ///
    /// Yields every update; a failure or timeout is yielded as the last item.
    /// Cancellation ends the stream without an error item.
    pub fn progress(
        &mut self,
    ) -> impl Stream<Item = Result<ProgressUpdate, LifecycleError>> + Send + '_ {
        futures::stream::unfold(self, |controller| async move {
            let item = controller.next_progress().await?;
            Some((item, controller))
        })
    }

    /// Drive `progress()` to the end and return the final session.
    pub async fn run(&mut self) -> Result<UploadSession, LifecycleError> {
        {
            let stream = self.progress();
            futures::pin_mut!(stream);
            while let Some(item) = stream.next().await {
                item?;
            }
        }
        Ok(self.session.clone())
    }

    async fn next_progress(&mut self) -> Option<Result<ProgressUpdate, LifecycleError>> {
        self.sync_cancellation();
        if self.session.status != UploadStatus::Polling {
            return None;
        }

        if self.polls_issued > 0 {
            let next_poll = Instant::now() + self.polling.interval;
            let wake = match self.deadline() {
                Some(deadline) => next_poll.min(deadline),
                None => next_poll,
            };
            let cancel = self.cancel.clone();
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep_until(wake) => {}
            }
            self.sync_cancellation();
            if self.session.status != UploadStatus::Polling {
                return None;
            }
        }

        if let Some(timeout) = self.timed_out() {
            return Some(Err(self.fail(timeout.into()).await));
        }

        let session_id = self.session.session_id.clone()?;
        Some(self.poll_once(&session_id).await)
    }

    fn deadline(&self) -> Option<Instant> {
        Some(self.polling_started? + self.polling.timeout?)
    }

    fn timed_out(&self) -> Option<PollTimeoutError> {
        let limit = self.polling.timeout?;
        let elapsed = self.polling_started?.elapsed();
        (elapsed >= limit).then_some(PollTimeoutError { elapsed, limit })
    }
}
