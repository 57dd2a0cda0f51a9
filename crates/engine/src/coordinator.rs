// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs one unit of work: output resolution, execution, completion wait and
//! cleanup

use crate::action::{Action, StreamProvider};
use crate::completion::CompletionState;
use crate::config::{FeatureFlags, SchedulerConfig};
use crate::error::SchedulerError;
use crate::listener::{ExecutionListener, ExecutionStatus};
use crate::resolver::OutputPathResolver;
use rj_adapters::{
    Authorizer, ContentStore, Identity, IdentityContext, Notification, NotifyAdapter,
    RepositoryFile, SettingsStore,
};
use rj_core::{keys, IdGen, JobParams};
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// The job must be rescheduled with a different output path; nothing ran
    pub update_required: bool,
    pub success: bool,
}

impl RunOutcome {
    fn update_required() -> Self {
        Self {
            update_required: true,
            success: false,
        }
    }

    fn finished(success: bool) -> Self {
        Self {
            update_required: false,
            success,
        }
    }
}

pub struct ActionExecutionCoordinator<C, S, I, A, N, L, G, F = SchedulerConfig> {
    resolver: OutputPathResolver<C, S, I, A, F>,
    notify: N,
    listener: L,
    id_gen: G,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl<C, S, I, A, N, L, G, F> ActionExecutionCoordinator<C, S, I, A, N, L, G, F>
where
    C: ContentStore,
    S: SettingsStore,
    I: IdentityContext,
    A: Authorizer,
    N: NotifyAdapter,
    L: ExecutionListener,
    G: IdGen,
    F: FeatureFlags,
{
    pub fn new(
        resolver: OutputPathResolver<C, S, I, A, F>,
        notify: N,
        listener: L,
        id_gen: G,
    ) -> Self {
        let defaults = SchedulerConfig::default();
        Self {
            resolver,
            notify,
            listener,
            id_gen,
            poll_interval: defaults.completion_poll_interval,
            timeout: defaults.completion_timeout,
        }
    }

    /// Take the completion wait settings from `config`
    pub fn with_config(mut self, config: &SchedulerConfig) -> Self {
        self.poll_interval = config.completion_poll_interval;
        self.timeout = config.completion_timeout;
        self
    }

    /// Run `action` for `owner`'s job.
    ///
    /// With a stream provider the output folder is resolved first; if it
    /// moved, nothing runs and the outcome asks for an update.
    pub async fn run(
        &self,
        owner: &Identity,
        action: &mut dyn Action,
        mut params: JobParams,
        provider: Option<&StreamProvider>,
    ) -> Result<RunOutcome, SchedulerError> {
        let lineage_id = match params.get_str(keys::LINEAGE_ID) {
            Some(id) => id.to_string(),
            None => self.id_gen.next(),
        };
        params.insert(keys::LINEAGE_ID, lineage_id.clone());

        let output_path = match provider {
            Some(provider) => {
                let (folder, pattern) = provider.split();
                match self.resolver.resolve(owner, folder, pattern).await {
                    Ok(Some(path)) if path != provider.output_path => {
                        tracing::info!(
                            lineage_id = %lineage_id,
                            scheduled = %provider.output_path,
                            resolved = %path,
                            "output path moved, update required"
                        );
                        return Ok(RunOutcome::update_required());
                    }
                    Ok(Some(path)) => Some(path),
                    Ok(None) => {
                        let err = SchedulerError::UnavailableOutputLocation(
                            provider.output_path.clone(),
                        );
                        return Err(self.abort(&lineage_id, Some(provider), err));
                    }
                    Err(e) => return Err(self.abort(&lineage_id, Some(provider), e)),
                }
            }
            None => None,
        };

        self.listener.on_status(&lineage_id, ExecutionStatus::Running);
        let run = self.execute(action, params, output_path.as_deref(), provider, &lineage_id);
        match self.resolver.identity().run_as(owner.clone(), run).await {
            Ok(success) => {
                let status = if success {
                    ExecutionStatus::Succeeded
                } else {
                    ExecutionStatus::Failed
                };
                self.listener.on_status(&lineage_id, status);
                Ok(RunOutcome::finished(success))
            }
            Err(e) => Err(self.abort(&lineage_id, provider, e)),
        }
    }

    /// Release any waiter and report failure before the error propagates
    fn abort(
        &self,
        lineage_id: &str,
        provider: Option<&StreamProvider>,
        err: SchedulerError,
    ) -> SchedulerError {
        if let Some(signal) = provider.and_then(|p| p.completion.as_ref()) {
            signal.fail();
        }
        tracing::error!(lineage_id, error = %err, "run failed");
        self.listener.on_status(lineage_id, ExecutionStatus::Failed);
        err
    }

    async fn execute(
        &self,
        action: &mut dyn Action,
        mut params: JobParams,
        output_path: Option<&str>,
        provider: Option<&StreamProvider>,
        lineage_id: &str,
    ) -> Result<bool, SchedulerError> {
        let content = self.resolver.content();
        if let Some(path) = output_path {
            let stream = content.open_output(path).await?;
            params.insert(keys::OUTPUT_FILE, path);
            match action.output_sink() {
                Some(sink) => sink.set_output(path, stream),
                None => tracing::debug!(path, "work takes no output stream"),
            }
        }

        let finished = match action.execute(&params).await {
            Ok(()) => self.await_completion(provider).await,
            Err(e) => Err(SchedulerError::Execution(e.to_string())),
        };
        let completed = match finished {
            Ok(completed) => completed,
            Err(e) => {
                if let Some(path) = output_path {
                    self.close_output(action, path).await;
                }
                return Err(e);
            }
        };

        if let Some(path) = output_path {
            self.cleanup(action, path, &params, lineage_id).await;
        }
        Ok(completed && action.is_successful())
    }

    async fn await_completion(&self, provider: Option<&StreamProvider>) -> Result<bool, SchedulerError> {
        let Some(signal) = provider.and_then(|p| p.completion.as_ref()) else {
            return Ok(true);
        };
        let state = signal
            .wait(self.poll_interval, self.timeout)
            .await
            .map_err(|e| SchedulerError::Execution(e.to_string()))?;
        Ok(state != CompletionState::Failed)
    }

    /// Flush the output stream and drop the file if nothing was written.
    /// Returns the file when it holds output.
    async fn close_output(&self, action: &mut dyn Action, path: &str) -> Option<RepositoryFile> {
        if let Some(mut stream) = action.output_sink().and_then(|sink| sink.take_output()) {
            if let Err(e) = stream.flush() {
                tracing::warn!(path, error = %e, "failed to flush output");
            }
        }

        let content = self.resolver.content();
        match content.get_file(path).await {
            Ok(Some(file)) if file.size == 0 => {
                tracing::info!(path, "deleting empty output");
                if let Err(e) = content.delete_file(&file.id).await {
                    tracing::warn!(path, error = %e, "failed to delete empty output");
                }
                None
            }
            Ok(Some(file)) => Some(file),
            Ok(None) => {
                tracing::debug!(path, "no output produced");
                None
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "failed to look up output");
                None
            }
        }
    }

    async fn cleanup(&self, action: &mut dyn Action, path: &str, params: &JobParams, lineage_id: &str) {
        let content = self.resolver.content();
        let kept = match self.close_output(action, path).await {
            Some(file) => {
                self.tag_lineage(&file.id, path, lineage_id).await;
                true
            }
            None => false,
        };

        let extra = action.post_processing().map(|p| p.outputs()).unwrap_or_default();
        for output in extra {
            match content.get_file(&output).await {
                Ok(Some(file)) => self.tag_lineage(&file.id, &output, lineage_id).await,
                Ok(None) => tracing::debug!(path = %output, "post-processing output missing"),
                Err(e) => tracing::warn!(path = %output, error = %e, "failed to look up output"),
            }
        }

        if let Some(recipient) = params.get_str(keys::EMAIL_TO) {
            let mut notification = Notification::new(
                recipient,
                "Scheduled job finished",
                format!("Run {} finished", lineage_id),
            );
            if kept {
                notification = notification.with_output(path);
            }
            if let Err(e) = self.notify.notify(notification).await {
                tracing::warn!(recipient, error = %e, "failed to send notification");
            }
        }
    }

    async fn tag_lineage(&self, file_id: &str, path: &str, lineage_id: &str) {
        let content = self.resolver.content();
        let result = async {
            let mut metadata = content.metadata(file_id).await?;
            metadata.insert(keys::LINEAGE_ID.to_string(), lineage_id.to_string());
            content.set_metadata(file_id, metadata).await
        }
        .await;
        if let Err(e) = result {
            tracing::warn!(path, error = %e, "failed to attach lineage");
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
