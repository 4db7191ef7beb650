/// Default number of bytes pulled from the source per read
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Configuration for reading SeqXML files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Size of the chunks pulled from the underlying source
    pub block_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl ReaderConfig {
    /// Set the chunk size (at least one byte)
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    pub(super) fn effective_block_size(&self) -> usize {
        self.block_size.max(1)
    }
}
