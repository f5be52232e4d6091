//! Input image definition.

use std::fmt;
use std::sync::Arc;

/// One source image handed to the converter.
///
/// The bytes are shared, so cloning an input (into a result or a failure
/// record) never copies the original file.
#[derive(Clone, PartialEq, Eq)]
pub struct InputImage {
    name: String,
    bytes: Arc<[u8]>,
}

impl InputImage {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Display name, used to derive the output name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the original file in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}

impl fmt::Debug for InputImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputImage")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .finish()
    }
}
