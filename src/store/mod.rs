pub mod sqlite;

use tracing::info;

use crate::app::Result;
use crate::domain::PostRecord;

pub use sqlite::SqliteStore;

/// Destination for scraped posts
pub trait PostSink {
    /// Append records in order; returns how many were written
    fn append(&self, records: &[PostRecord]) -> Result<usize>;
}

impl<T: PostSink + ?Sized> PostSink for &T {
    fn append(&self, records: &[PostRecord]) -> Result<usize> {
        (**self).append(records)
    }
}

/// Buffers records and hands them to the sink `batch_size` at a time
pub struct BatchWriter<S: PostSink> {
    sink: S,
    batch_size: usize,
    buffer: Vec<PostRecord>,
    written: usize,
}

impl<S: PostSink> BatchWriter<S> {
    pub fn new(sink: S, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            sink,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            written: 0,
        }
    }

    pub fn push(&mut self, record: PostRecord) -> Result<()> {
        self.buffer.push(record);
        if self.buffer.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Write whatever is buffered; returns the total written by this writer
    pub fn finish(mut self) -> Result<usize> {
        self.flush()?;
        Ok(self.written)
    }

    pub fn written(&self) -> usize {
        self.written
    }

    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let count = self.sink.append(&self.buffer)?;
        self.written += count;
        info!("Saved {} posts", count);
        self.buffer.clear();
        Ok(())
    }
}
