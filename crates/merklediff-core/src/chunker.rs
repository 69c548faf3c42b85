//! Fixed-size splitting of raw byte input for chunk trees.

/// Splits a byte slice into fixed-size chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
}

impl Chunker {
    /// `chunk_size == 0` disables splitting: the whole input is one chunk.
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Borrowing split of `data`; the final chunk may be short.
    ///
    /// Empty input yields no chunks.
    pub fn chunk<'a>(&self, data: &'a [u8]) -> Vec<&'a [u8]> {
        if data.is_empty() {
            return Vec::new();
        }
        if self.chunk_size == 0 {
            return vec![data];
        }
        data.chunks(self.chunk_size).collect()
    }
}
