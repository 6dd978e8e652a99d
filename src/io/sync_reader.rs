//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over the rows of a transactions or
//! categories CSV file. Delegates format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! `SyncReader<T>` implements `Iterator`, yielding `Result<T, LedgerError>`
//! for each CSV row:
//!
//! ```no_run
//! use ledger_report::io::sync_reader::SyncReader;
//! use ledger_report::types::Transaction;
//! use std::path::Path;
//!
//! let reader = SyncReader::<Transaction>::new(Path::new("transactions.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(transaction) => println!("Loaded: {:?}", transaction),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as `LedgerError::Parse` with the line
//!   number, and iteration continues with the next row

use crate::io::csv_format::CsvRow;
use crate::types::LedgerError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time, so memory use does not grow with file size.
#[derive(Debug)]
pub struct SyncReader<T, R = File> {
    reader: csv::Reader<R>,
    line_num: u64,
    _row: PhantomData<T>,
}

impl<T: CsvRow> SyncReader<T, File> {
    /// Open a CSV file for streaming iteration
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if the file opened successfully
    /// * `Err(LedgerError::Io)` if it could not be opened
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;
        Ok(Self::from_reader(file))
    }
}

impl<T: CsvRow, R: Read> SyncReader<T, R> {
    /// Wrap any reader producing CSV text
    ///
    /// Fields are trimmed and rows may have fewer columns than the header
    /// (trailing optional columns can be left out).
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(reader);

        Self {
            reader,
            line_num: 1,
            _row: PhantomData,
        }
    }
}

impl<T: CsvRow, R: Read> Iterator for SyncReader<T, R> {
    type Item = Result<T, LedgerError>;

    /// Get the next row
    ///
    /// # Returns
    ///
    /// * `Some(Ok(T))` - Successfully parsed row
    /// * `Some(Err(LedgerError::Parse))` - Malformed row, with its line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<T::Record>();
        let result = deserializer.next()?;
        self.line_num += 1;

        let line = Some(self.line_num);
        Some(match result {
            Ok(record) => {
                T::from_record(record).map_err(|message| LedgerError::Parse { line, message })
            }
            Err(e) => Err(LedgerError::Parse {
                line,
                message: e.to_string(),
            }),
        })
    }
}
