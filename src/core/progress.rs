use serde::Serialize;
use tokio::sync::mpsc;

use crate::core::BatchSummary;
use crate::utils::ErrorKind;

/// How the item behind a progress update ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "errorKind", rename_all = "camelCase")]
pub enum ItemOutcome {
    Converted,
    Failed(ErrorKind),
}

/// Progress update emitted after each attempted item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Number of items attempted so far, successful or not
    pub completed_count: usize,
    /// Total number of items in the batch
    pub total_count: usize,
    /// Progress percentage (0-100), rounded
    pub percent: u32,
    /// Name of the item that was just attempted
    pub file_name: String,
    pub outcome: ItemOutcome,
}

impl ProgressUpdate {
    pub fn new(completed_count: usize, total_count: usize, file_name: &str, outcome: ItemOutcome) -> Self {
        Self {
            completed_count,
            total_count,
            percent: percent(completed_count, total_count),
            file_name: file_name.to_string(),
            outcome,
        }
    }
}

/// `round(completed / total * 100)`, half rounding up. An empty batch is done.
pub fn percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((completed * 200 + total) / (total * 2)) as u32
}

/// Events produced by a batch run, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Progress(ProgressUpdate),
    /// Always the last event of a run
    Complete(BatchSummary),
}

/// Receives batch events as the orchestrator produces them.
pub trait ProgressEmitter: Send + Sync {
    fn emit(&self, event: BatchEvent);
}

impl<F> ProgressEmitter for F
where
    F: Fn(BatchEvent) + Send + Sync,
{
    fn emit(&self, event: BatchEvent) {
        self(event)
    }
}

/// Forwards events into an unbounded channel.
///
/// The paired receiver is a lazy sequence of events that ends after
/// [`BatchEvent::Complete`] once the emitter is dropped.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<BatchEvent>,
}

impl ProgressEmitter for ChannelEmitter {
    fn emit(&self, event: BatchEvent) {
        // A dropped receiver just means nobody is watching any more.
        let _ = self.tx.send(event);
    }
}

/// Creates a channel-backed emitter and the receiving end of its events.
pub fn progress_channel() -> (ChannelEmitter, mpsc::UnboundedReceiver<BatchEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelEmitter { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13); // 12.5
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn percent_is_monotonic() {
        for total in 1..50 {
            let values: Vec<u32> = (1..=total).map(|done| percent(done, total)).collect();
            assert!(values.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(*values.last().unwrap(), 100);
        }
    }

    #[tokio::test]
    async fn channel_delivers_in_order() {
        let (emitter, mut rx) = progress_channel();
        emitter.emit(BatchEvent::Progress(ProgressUpdate::new(1, 2, "a.png", ItemOutcome::Converted)));
        emitter.emit(BatchEvent::Progress(ProgressUpdate::new(
            2,
            2,
            "b.png",
            ItemOutcome::Failed(ErrorKind::Decode),
        )));
        drop(emitter);

        let mut seen = Vec::new();
        while let Some(BatchEvent::Progress(update)) = rx.recv().await {
            seen.push((update.file_name, update.percent));
        }
        assert_eq!(seen, vec![("a.png".to_string(), 50), ("b.png".to_string(), 100)]);
    }
}
