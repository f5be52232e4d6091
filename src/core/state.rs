//! Session state owned by the caller.

use tracing::debug;

use crate::core::{ConversionResult, FailureRecord, InputImage};
use crate::utils::dedupe_names;
use crate::archive::ArchiveEntry;

/// Inputs and the outcome of the latest batch run.
///
/// The session is borrowed mutably by the orchestrator for the duration of a
/// run, so nothing else can observe or change it half way through.
#[derive(Debug, Default)]
pub struct ConverterSession {
    inputs: Vec<InputImage>,
    results: Vec<ConversionResult>,
    failures: Vec<FailureRecord>,
}

impl ConverterSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends images to the input list, keeping their order.
    pub fn add_images(&mut self, images: impl IntoIterator<Item = InputImage>) {
        let before = self.inputs.len();
        self.inputs.extend(images);
        debug!("Session holds {} input(s) (+{})", self.inputs.len(), self.inputs.len() - before);
    }

    pub fn inputs(&self) -> &[InputImage] {
        &self.inputs
    }

    /// Results of the latest run, in input order
    pub fn results(&self) -> &[ConversionResult] {
        &self.results
    }

    /// Failures of the latest run, in input order
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Drops everything and hands back an empty session.
    pub fn reset(self) -> Self {
        debug!(
            "Resetting session ({} inputs, {} results)",
            self.inputs.len(),
            self.results.len()
        );
        Self::default()
    }

    /// Named entries for bundling every result into one archive.
    ///
    /// Output names are de-duplicated so repeated input names cannot
    /// overwrite each other inside the archive.
    pub fn archive_entries(&self) -> Vec<ArchiveEntry> {
        let names = dedupe_names(self.results.iter().map(|r| r.output_name()));
        names
            .into_iter()
            .zip(&self.results)
            .map(|(name, result)| ArchiveEntry::new(name, result.shared_output()))
            .collect()
    }

    pub(crate) fn begin_run(&mut self) {
        if !self.results.is_empty() || !self.failures.is_empty() {
            debug!(
                "Discarding {} result(s) and {} failure(s) from the previous run",
                self.results.len(),
                self.failures.len()
            );
        }
        self.results.clear();
        self.failures.clear();
    }

    pub(crate) fn record_success(&mut self, result: ConversionResult) {
        self.results.push(result);
    }

    pub(crate) fn record_failure(&mut self, failure: FailureRecord) {
        self.failures.push(failure);
    }
}
