//! Asynchronous CSV reader with batch interface
//!
//! Reads transaction or category rows from any `futures::io::AsyncRead`
//! source in batches, for the async loading strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV source → AsyncReader<T> → batches of T
//!                   ↓
//!            csv_format module
//!            (CsvRow::from_record)
//! ```

use crate::io::csv_format::CsvRow;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::marker::PhantomData;

/// Asynchronous CSV reader
///
/// Rows that fail to parse are logged and skipped.
pub struct AsyncReader<T, R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    skipped: usize,
    _row: PhantomData<T>,
}

impl<T, R> AsyncReader<T, R>
where
    T: CsvRow,
    R: AsyncRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            skipped: 0,
            _row: PhantomData,
        }
    }

    /// Read up to `batch_size` rows
    ///
    /// # Returns
    ///
    /// The successfully converted rows. An empty vector means the end of the
    /// input was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<T> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<T::Record>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => match T::from_record(record) {
                    Ok(row) => batch.push(row),
                    Err(e) => {
                        tracing::warn!("Skipping row: {}", e);
                        self.skipped += 1;
                    }
                },
                Some(Err(e)) => {
                    tracing::warn!("CSV parse error: {}", e);
                    self.skipped += 1;
                }
                None => break,
            }
        }

        batch
    }

    /// Number of rows skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
