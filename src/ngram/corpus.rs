// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Corpus preprocessing and n-gram database construction.
//!
//! Raw corpus text is split into sentences on terminal punctuation, each
//! sentence is tokenized into words and clause punctuation, and every
//! sentence shorter than the n-gram order is dropped. Each surviving
//! sentence is padded with (order−1) `<START>` markers and one `<END>`
//! marker before counting, so the resulting table knows how sentences begin
//! and end.
//!
//! [`build_ngram_database`] writes the counted n-grams into the SQLite
//! schema that [`NgramStore`](crate::ngram::store::NgramStore) reads:
//! `ngrams(word1..wordN, frequency)` with an index over the context columns.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::ngram::{END_MARKER, START_MARKER};
use crate::stego::error::StegoError;

/// Split corpus text into tokenized sentences.
///
/// Sentences break on runs of `.`, `!`, `?`. Tokens are maximal runs of
/// alphanumeric characters (plus `_`), or single clause-punctuation
/// characters; whitespace only separates. Empty sentences are skipped.
pub fn tokenize_sentences(text: &str) -> Vec<Vec<String>> {
    text.split(|c| matches!(c, '.' | '!' | '?'))
        .filter_map(|sentence| {
            let tokens = tokenize(sentence);
            if tokens.is_empty() {
                None
            } else {
                Some(tokens)
            }
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn tokenize(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in sentence.chars() {
        if is_word_char(c) {
            word.push(c);
        } else {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            if !c.is_whitespace() {
                tokens.push(c.to_string());
            }
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

/// Build the `ngrams` table from corpus text.
///
/// Replaces any existing table, counts every n-gram of the given order over
/// marker-padded sentences, and inserts one row per distinct n-gram inside a
/// single transaction.
///
/// # Returns
/// The number of distinct n-grams written.
///
/// # Errors
/// - [`StegoError::UnsupportedOrder`] if `order` is not 3 or 4.
/// - [`StegoError::Store`] on any database failure.
pub fn build_ngram_database(
    conn: &mut Connection,
    text: &str,
    order: usize,
) -> Result<usize, StegoError> {
    let (ddl, insert) = match order {
        3 => (
            "DROP TABLE IF EXISTS ngrams;
             CREATE TABLE ngrams (
                 word1 TEXT,
                 word2 TEXT,
                 word3 TEXT,
                 frequency INTEGER,
                 PRIMARY KEY (word1, word2, word3)
             );
             CREATE INDEX idx_context ON ngrams (word1, word2);",
            "INSERT INTO ngrams VALUES (?1, ?2, ?3, ?4)",
        ),
        4 => (
            "DROP TABLE IF EXISTS ngrams;
             CREATE TABLE ngrams (
                 word1 TEXT,
                 word2 TEXT,
                 word3 TEXT,
                 word4 TEXT,
                 frequency INTEGER,
                 PRIMARY KEY (word1, word2, word3, word4)
             );
             CREATE INDEX idx_context ON ngrams (word1, word2, word3);",
            "INSERT INTO ngrams VALUES (?1, ?2, ?3, ?4, ?5)",
        ),
        other => return Err(StegoError::UnsupportedOrder(other)),
    };

    let counts = count_ngrams(text, order);

    let tx = conn.transaction()?;
    tx.execute_batch(ddl)?;
    {
        let mut stmt = tx.prepare(insert)?;
        for (ngram, frequency) in &counts {
            match order {
                3 => stmt.execute((&ngram[0], &ngram[1], &ngram[2], frequency))?,
                _ => stmt.execute((&ngram[0], &ngram[1], &ngram[2], &ngram[3], frequency))?,
            };
        }
    }
    tx.commit()?;

    tracing::debug!(order, ngrams = counts.len(), "n-gram database built");
    Ok(counts.len())
}

/// Count n-grams of the given order over marker-padded sentences.
fn count_ngrams(text: &str, order: usize) -> HashMap<Vec<String>, u32> {
    let mut counts: HashMap<Vec<String>, u32> = HashMap::new();
    for tokens in tokenize_sentences(text) {
        // Sentences shorter than the order carry no usable context.
        if tokens.len() < order {
            continue;
        }
        let mut marked = vec![START_MARKER.to_string(); order - 1];
        marked.extend(tokens);
        marked.push(END_MARKER.to_string());

        for window in marked.windows(order) {
            *counts.entry(window.to_vec()).or_insert(0) += 1;
        }
    }
    counts
}
