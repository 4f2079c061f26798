// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Read-only SQLite frequency store and the in-memory table loaded from it.
//!
//! The store schema is one row per n-gram:
//!
//! ```text
//! ngrams(word1 TEXT, ..., wordN TEXT, frequency INTEGER)
//! PRIMARY KEY (word1..wordN), INDEX idx_context (word1..word{N-1})
//! ```
//!
//! where N is the n-gram order (3 or 4). [`NgramStore`] is an explicitly
//! owned, scoped handle: it is opened once, injected into the generator,
//! retained for the generator's lifetime, and released by a consuming close.
//! There is no ambient or static connection state.
//!
//! [`FrequencyTable`] is the whole table pulled into an immutable map at
//! load time. All store I/O happens in [`NgramStore::load_table`]; generation
//! afterwards only reads the map, which is safe to share across threads.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::stego::error::StegoError;

/// N-gram orders the store schema supports.
const SUPPORTED_ORDERS: [usize; 2] = [3, 4];

/// Owned handle to a read-only n-gram database.
#[derive(Debug)]
pub struct NgramStore {
    conn: Connection,
    order: usize,
}

impl NgramStore {
    /// Open an n-gram database file read-only.
    ///
    /// # Errors
    /// - [`StegoError::UnsupportedOrder`] if `order` is not 3 or 4.
    /// - [`StegoError::Store`] if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, order: usize) -> Result<Self, StegoError> {
        check_order(order)?;
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn, order })
    }

    /// Wrap an already-open connection (in-memory databases, tests).
    ///
    /// # Errors
    /// Returns [`StegoError::UnsupportedOrder`] if `order` is not 3 or 4.
    pub fn from_connection(conn: Connection, order: usize) -> Result<Self, StegoError> {
        check_order(order)?;
        Ok(Self { conn, order })
    }

    /// The n-gram order this store was opened for.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Load the full frequency table into memory.
    ///
    /// One linear scan over the `ngrams` table; candidate lists keep the
    /// row retrieval order.
    pub fn load_table(&self) -> Result<FrequencyTable, StegoError> {
        let sql = match self.order {
            3 => "SELECT word1, word2, word3, frequency FROM ngrams",
            _ => "SELECT word1, word2, word3, word4, frequency FROM ngrams",
        };
        let context_len = self.order - 1;

        let mut contexts: HashMap<Vec<String>, Vec<(String, u32)>> = HashMap::new();
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut context = Vec::with_capacity(context_len);
            for i in 0..context_len {
                context.push(row.get::<_, String>(i)?);
            }
            let word: String = row.get(context_len)?;
            let frequency: u32 = row.get(context_len + 1)?;
            contexts.entry(context).or_default().push((word, frequency));
        }

        tracing::debug!(
            order = self.order,
            contexts = contexts.len(),
            "frequency table loaded"
        );

        Ok(FrequencyTable {
            order: self.order,
            contexts,
        })
    }

    /// Total number of n-gram rows in the store.
    pub fn ngram_count(&self) -> Result<u64, StegoError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ngrams", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Close the store, releasing the database handle.
    pub fn close(self) -> Result<(), StegoError> {
        self.conn.close().map_err(|(_, e)| StegoError::Store(e))
    }
}

fn check_order(order: usize) -> Result<(), StegoError> {
    if SUPPORTED_ORDERS.contains(&order) {
        Ok(())
    } else {
        Err(StegoError::UnsupportedOrder(order))
    }
}

/// Immutable frequency table: context tuple → candidate next words.
///
/// Never mutated after load, so shared references can be read from any
/// number of threads without synchronization.
pub struct FrequencyTable {
    order: usize,
    contexts: HashMap<Vec<String>, Vec<(String, u32)>>,
}

impl FrequencyTable {
    /// The n-gram order the table was built for.
    pub fn order(&self) -> usize {
        self.order
    }

    /// All (word, frequency) candidates following `context`, in the order
    /// the store returned them. `None` when the context was never observed.
    pub fn candidates(&self, context: &[String]) -> Option<&[(String, u32)]> {
        self.contexts.get(context).map(Vec::as_slice)
    }

    /// Number of distinct contexts.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// True if the table holds no n-grams at all.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
