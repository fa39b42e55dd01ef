//! Redb transaction implementation.
//!
//! This module provides the `RedbTransaction` type which implements the
//! `Transaction` trait for both read-only and read-write transactions.
//!
//! # Memory-Efficient Cursors
//!
//! The cursor implementation uses batched streaming to avoid loading entire
//! tables into memory. Instead of materializing all entries upfront, it loads
//! entries in configurable batches (default 1000 entries), fetching the next
//! batch on demand as the cursor advances.

use std::ops::Bound;

use redb::{ReadTransaction, ReadableTable, WriteTransaction};

use crate::engine::{Cursor, CursorResult, KeyValue, StorageError, Transaction};

use super::tables::{decode_key, encode_key, table_end_key, table_start_key, DATA_TABLE};

/// Default batch size for cursor operations.
/// This limits memory usage while maintaining good performance.
const DEFAULT_BATCH_SIZE: usize = 1000;

/// A transaction for the Redb storage engine.
///
/// This type wraps both read-only and read-write Redb transactions,
/// providing a unified interface through the `Transaction` trait.
///
/// Note: We allow the `large_enum_variant` lint here because boxing the
/// `WriteTransaction` would add indirection overhead for every operation,
/// and transactions are typically short-lived.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }
}

/// Look up an encoded key in an open table.
fn read_value(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    encoded_key: &[u8],
) -> Result<Option<Vec<u8>>, StorageError> {
    match table.get(encoded_key) {
        Ok(Some(value)) => Ok(Some(value.value().to_vec())),
        Ok(None) => Ok(None),
        Err(e) => Err(StorageError::Internal(e.to_string())),
    }
}

/// Scan a physical key range out of an open table, decoding logical keys.
///
/// Exclusive starts (continuation batches, `Bound::Excluded`) are handled
/// upstream by starting the physical range at the byte-successor of the
/// excluded key, so every decoded entry here is in range.
fn scan_range(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    effective_start: &[u8],
    effective_end: &[u8],
    user_end_bound: &Option<Bound<Vec<u8>>>,
    batch_size: usize,
) -> Result<Vec<KeyValue>, StorageError> {
    let range = table
        .range(effective_start..effective_end)
        .map_err(|e| StorageError::Internal(e.to_string()))?;

    let mut entries = Vec::with_capacity(batch_size.min(1024));

    for result in range {
        if entries.len() >= batch_size {
            break;
        }

        let (k, v) = result.map_err(|e| StorageError::Internal(e.to_string()))?;
        if let Some((_, logical_key)) = decode_key(k.value()) {
            // Check user end bound for Included case
            if let Some(Bound::Included(end_key)) = user_end_bound {
                if logical_key > end_key.as_slice() {
                    break;
                }
            }

            entries.push((logical_key.to_vec(), v.value().to_vec()));
        }
    }

    Ok(entries)
}

impl Transaction for RedbTransaction {
    type Cursor<'a>
        = RedbCursor<'a>
    where
        Self: 'a;

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let encoded_key = encode_key(table, key);

        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => read_value(&t, &encoded_key),
                Err(redb::TableError::TableDoesNotExist(_)) => {
                    // No data table means no data, which is not an error
                    Ok(None)
                }
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => read_value(&t, &encoded_key),
                Err(redb::TableError::TableDoesNotExist(_)) => {
                    // No data table means no data, which is not an error
                    Ok(None)
                }
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
        }
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let encoded_key = encode_key(table, key);
                let mut t =
                    tx.open_table(DATA_TABLE).map_err(|e| StorageError::Internal(e.to_string()))?;
                t.insert(encoded_key.as_slice(), value)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let encoded_key = encode_key(table, key);
                match tx.open_table(DATA_TABLE) {
                    Ok(mut t) => match t.remove(encoded_key.as_slice()) {
                        Ok(Some(_)) => Ok(true),
                        Ok(None) => Ok(false),
                        Err(e) => Err(StorageError::Internal(e.to_string())),
                    },
                    Err(redb::TableError::TableDoesNotExist(_)) => {
                        // Table doesn't exist, so key definitely doesn't exist
                        Ok(false)
                    }
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                }
            }
        }
    }

    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError> {
        RedbCursor::new(self, table.to_string(), None, None, DEFAULT_BATCH_SIZE)
    }

    fn range(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
    ) -> Result<Self::Cursor<'_>, StorageError> {
        let start_owned = bound_to_owned(start);
        let end_owned = bound_to_owned(end);
        RedbCursor::new(
            self,
            table.to_string(),
            Some(start_owned),
            Some(end_owned),
            DEFAULT_BATCH_SIZE,
        )
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => {
                // Read transactions don't need explicit commit
                Ok(())
            }
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => {
                // Read transactions just get dropped
                Ok(())
            }
            Self::Write(tx) => {
                // Ignore abort result - we're rolling back anyway
                drop(tx.abort());
                Ok(())
            }
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

impl RedbTransaction {
    /// Fetch a batch of entries from the table, starting after the given key.
    ///
    /// This is the core method for batched streaming. It fetches up to `batch_size`
    /// entries starting from `after_key` (exclusive) or from the beginning if None.
    fn fetch_batch(
        &self,
        table: &str,
        after_key: Option<&[u8]>,
        user_start_bound: &Option<Bound<Vec<u8>>>,
        user_end_bound: &Option<Bound<Vec<u8>>>,
        batch_size: usize,
    ) -> Result<Vec<KeyValue>, StorageError> {
        // Compute effective start based on after_key or user bounds.
        // Exclusive starts use the byte-successor of the encoded key: appending
        // 0x00 yields the smallest key sorting strictly after it, so the scan
        // never drops a valid entry when the excluded key is absent.
        let effective_start: Vec<u8> = if let Some(after) = after_key {
            key_successor(encode_key(table, after))
        } else {
            match user_start_bound {
                Some(Bound::Included(k)) => encode_key(table, k),
                Some(Bound::Excluded(k)) => key_successor(encode_key(table, k)),
                _ => table_start_key(table),
            }
        };

        // Compute effective end based on user bounds
        let effective_end: Vec<u8> = match user_end_bound {
            Some(Bound::Included(k)) => {
                // We need to include k, so extend one byte past it
                let mut end = encode_key(table, k);
                end.push(0xFF);
                end
            }
            Some(Bound::Excluded(k)) => encode_key(table, k),
            _ => table_end_key(table),
        };

        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => {
                    scan_range(&t, &effective_start, &effective_end, user_end_bound, batch_size)
                }
                Err(redb::TableError::TableDoesNotExist(_)) => {
                    // Table doesn't exist yet, return empty result (not an error)
                    Ok(Vec::new())
                }
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => {
                    scan_range(&t, &effective_start, &effective_end, user_end_bound, batch_size)
                }
                Err(redb::TableError::TableDoesNotExist(_)) => {
                    // Table doesn't exist yet, return empty result (not an error)
                    Ok(Vec::new())
                }
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
        }
    }
}

/// Return the smallest byte string sorting strictly after `key`.
fn key_successor(mut key: Vec<u8>) -> Vec<u8> {
    key.push(0x00);
    key
}

/// Convert a `Bound<&[u8]>` to `Bound<Vec<u8>>`.
fn bound_to_owned(bound: Bound<&[u8]>) -> Bound<Vec<u8>> {
    match bound {
        Bound::Included(b) => Bound::Included(b.to_vec()),
        Bound::Excluded(b) => Bound::Excluded(b.to_vec()),
        Bound::Unbounded => Bound::Unbounded,
    }
}

/// A memory-efficient cursor for iterating over key-value pairs in Redb.
///
/// This implementation uses batched streaming to avoid loading entire tables
/// into memory. Instead of materializing all entries upfront, it fetches
/// entries in batches and loads more data on demand as the cursor advances.
///
/// # Memory Guarantees
///
/// At any time, the cursor holds at most `batch_size` entries in memory,
/// plus the current entry (if any). This means a table with 1M entries
/// will use approximately the same memory as a table with 1K entries.
pub struct RedbCursor<'a> {
    /// Reference to the transaction for fetching additional batches.
    tx: &'a RedbTransaction,
    /// The logical table name.
    table: String,
    /// Current batch of entries.
    batch: Vec<KeyValue>,
    /// Position within the current batch.
    batch_position: Option<usize>,
    /// User's start bound for range queries.
    start_bound: Option<Bound<Vec<u8>>>,
    /// User's end bound for range queries.
    end_bound: Option<Bound<Vec<u8>>>,
    /// Maximum entries per batch.
    batch_size: usize,
    /// Whether there are more entries after the current batch.
    has_more: bool,
    /// Cached current entry for the `current()` method.
    /// This is separate from the batch to handle edge cases.
    current_entry: Option<KeyValue>,
}

impl<'a> RedbCursor<'a> {
    /// Create a new streaming cursor.
    ///
    /// The cursor starts in an unpositioned state. Call `seek_first()` or
    /// `next()` to position the cursor before reading `current()`.
    pub fn new(
        tx: &'a RedbTransaction,
        table: String,
        start_bound: Option<Bound<Vec<u8>>>,
        end_bound: Option<Bound<Vec<u8>>>,
        batch_size: usize,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            tx,
            table,
            batch: Vec::new(),
            batch_position: None,
            start_bound,
            end_bound,
            batch_size,
            has_more: true,
            current_entry: None,
        })
    }

    /// Load the first batch of entries.
    fn load_first_batch(&mut self) -> Result<(), StorageError> {
        self.batch = self.tx.fetch_batch(
            &self.table,
            None,
            &self.start_bound,
            &self.end_bound,
            self.batch_size,
        )?;
        self.has_more = self.batch.len() >= self.batch_size;
        Ok(())
    }

    /// Load the next batch, continuing from the last key in the current batch.
    fn load_next_batch(&mut self) -> Result<bool, StorageError> {
        if !self.has_more {
            return Ok(false);
        }

        let after_key = self.batch.last().map(|(k, _)| k.as_slice());

        let new_batch = self.tx.fetch_batch(
            &self.table,
            after_key,
            &self.start_bound,
            &self.end_bound,
            self.batch_size,
        )?;

        if new_batch.is_empty() {
            self.has_more = false;
            return Ok(false);
        }

        self.has_more = new_batch.len() >= self.batch_size;
        self.batch = new_batch;
        self.batch_position = Some(0);

        Ok(true)
    }

    /// Update the current entry cache from the batch.
    fn update_current(&mut self) {
        self.current_entry = self.batch_position.and_then(|pos| self.batch.get(pos).cloned());
    }
}

impl Cursor for RedbCursor<'_> {
    fn seek_first(&mut self) -> CursorResult {
        self.load_first_batch()?;

        if self.batch.is_empty() {
            self.batch_position = None;
            self.current_entry = None;
            return Ok(None);
        }

        self.batch_position = Some(0);
        self.update_current();
        Ok(self.current_entry.clone())
    }

    fn next(&mut self) -> CursorResult {
        match self.batch_position {
            None => {
                // Not positioned, start from first
                self.seek_first()
            }
            Some(pos) => {
                let next_pos = pos + 1;
                if next_pos < self.batch.len() {
                    // Move within current batch
                    self.batch_position = Some(next_pos);
                    self.update_current();
                    Ok(self.current_entry.clone())
                } else if self.load_next_batch()? {
                    // Moved to next batch
                    self.update_current();
                    Ok(self.current_entry.clone())
                } else {
                    // No more entries
                    self.batch_position = None;
                    self.current_entry = None;
                    Ok(None)
                }
            }
        }
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.current_entry.as_ref().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

// Note: Cursor tests live in the integration tests in tests/redb_tests.rs
// because the streaming cursor requires a real transaction context.
