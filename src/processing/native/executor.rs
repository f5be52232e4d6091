//! Sequential batch orchestration over a session's inputs.
//!
//! Images are converted one at a time in input order. After each image a
//! progress event is emitted and the task yields to the runtime, so progress
//! is observable as it happens rather than only at the end.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::core::{
    BatchEvent, BatchSummary, ConversionParams, ConverterSession, FailureRecord, ItemOutcome,
    ProgressEmitter, ProgressUpdate,
};

use super::pipeline::ConversionPipeline;

/// Shared flag that stops a running batch before its next item.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Runs the conversion pipeline over every input of a session.
#[derive(Clone, Default)]
pub struct BatchOrchestrator {
    pipeline: ConversionPipeline,
    cancel: CancelFlag,
}

impl BatchOrchestrator {
    pub fn new(pipeline: ConversionPipeline) -> Self {
        Self {
            pipeline,
            cancel: CancelFlag::default(),
        }
    }

    /// Handle for cancelling runs of this orchestrator from elsewhere.
    ///
    /// A cancel stops the current run, or the next one if no run is in
    /// progress. The flag is cleared once that run returns.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Converts all of `session`'s inputs with `params`.
    ///
    /// Results and failures of any previous run are discarded first. A failed
    /// image is recorded and the batch moves on; per-image errors never abort
    /// the run. Emits one [`BatchEvent::Progress`] per attempted image and a
    /// final [`BatchEvent::Complete`], whose summary is also returned.
    pub async fn run<E>(
        &self,
        session: &mut ConverterSession,
        params: &ConversionParams,
        emitter: &E,
    ) -> BatchSummary
    where
        E: ProgressEmitter + ?Sized,
    {
        session.begin_run();

        let inputs = session.inputs().to_vec();
        let total = inputs.len();
        let mut attempted = 0;
        let mut cancelled = false;

        info!(
            "Converting {} image(s) to {} (quality {:.2}, {:?})",
            total,
            params.format().mime_type(),
            params.quality(),
            params.policy()
        );

        for input in &inputs {
            if self.cancel.is_cancelled() {
                info!("Batch cancelled after {attempted}/{total} image(s)");
                cancelled = true;
                break;
            }

            let outcome = match self.pipeline.convert(input, params).await {
                Ok(result) => {
                    debug!(
                        "{} converted ({:.1}% smaller)",
                        result.output_name(),
                        result.size_reduction_percent()
                    );
                    session.record_success(result);
                    ItemOutcome::Converted
                }
                Err(error) => {
                    warn!("Conversion failed for {}: {}", input.name(), error);
                    let kind = error.kind();
                    session.record_failure(FailureRecord {
                        input: input.clone(),
                        error,
                    });
                    ItemOutcome::Failed(kind)
                }
            };

            attempted += 1;
            emitter.emit(BatchEvent::Progress(ProgressUpdate::new(
                attempted,
                total,
                input.name(),
                outcome,
            )));

            // Let observers see this item before the next one starts.
            tokio::task::yield_now().await;
        }

        let summary = BatchSummary {
            total,
            attempted,
            results: session.results().to_vec(),
            failures: session.failures().to_vec(),
            cancelled,
        };

        info!(
            "Batch finished: {}/{} converted, {} failed",
            summary.succeeded(),
            total,
            summary.failed()
        );

        self.cancel.clear();
        emitter.emit(BatchEvent::Complete(summary.clone()));
        summary
    }
}
