// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Cover-text generation over the n-gram frequency table.
//!
//! Three strategies share one loop shape: start from (order−1) `<START>`
//! markers, repeatedly look up candidates for the sliding context window,
//! stop early when the context is unknown or an `<END>` marker is reached:
//!
//! - **Markov**: weighted random sampling proportional to stored frequency.
//!   Gives varied output; with a seed it is fully reproducible.
//! - **Viterbi**: always the maximum-frequency candidate. Deterministic;
//!   ties fall to retrieval order.
//! - **Beam search**: keeps the `beam_width` best hypotheses by cumulative
//!   log-probability and returns the best survivor.
//!
//! Randomness is never held as hidden state: the Markov path takes an
//! explicit RNG per call, seeded through ChaCha20 so that identical seed +
//! identical table yields identical output on every platform (`usize`-width
//! sampling would diverge between 32- and 64-bit targets).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::ngram::store::{FrequencyTable, NgramStore};
use crate::ngram::{END_MARKER, START_MARKER};
use crate::stego::error::StegoError;

/// Punctuation that attaches to the preceding word after generation.
const ATTACHED_PUNCT: [char; 6] = ['.', ',', '!', '?', ';', ':'];

/// Cover-text generation strategy, selected by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Weighted random sampling; `seed` makes the output reproducible.
    Markov { seed: Option<u64> },
    /// Maximum-likelihood single path.
    Viterbi,
    /// Top-`beam_width` hypothesis search.
    BeamSearch { beam_width: usize },
}

impl Strategy {
    /// Human-readable label reported in encode results.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Markov { .. } => "Markov",
            Self::Viterbi => "Viterbi",
            Self::BeamSearch { .. } => "BeamSearch",
        }
    }
}

/// Summary of the loaded model, mirroring what the store knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStats {
    pub order: usize,
    pub ngram_count: u64,
    pub context_count: usize,
}

/// Generates plausible filler text from an n-gram frequency table.
///
/// Construction loads the whole table from the store (the only I/O the
/// generator ever performs); the store handle is retained for the
/// generator's lifetime and released by [`close`](Self::close), which
/// consumes the generator, so there is no way to generate from a closed one.
pub struct CoverTextGenerator {
    store: NgramStore,
    table: FrequencyTable,
}

impl CoverTextGenerator {
    /// Load the frequency table and take ownership of the store.
    pub fn new(store: NgramStore) -> Result<Self, StegoError> {
        let table = store.load_table()?;
        Ok(Self { store, table })
    }

    /// The n-gram order of the underlying table.
    pub fn order(&self) -> usize {
        self.table.order()
    }

    /// Generate cover text with the given strategy.
    pub fn generate(&self, strategy: &Strategy, max_words: usize) -> String {
        match strategy {
            Strategy::Markov { seed } => {
                let mut rng = match seed {
                    Some(seed) => ChaCha20Rng::seed_from_u64(*seed),
                    None => ChaCha20Rng::from_entropy(),
                };
                self.generate_markov(max_words, &mut rng)
            }
            Strategy::Viterbi => self.generate_viterbi(max_words),
            Strategy::BeamSearch { beam_width } => {
                self.generate_beam_search(max_words, *beam_width)
            }
        }
    }

    /// Markov-chain sampling with an explicit randomness source.
    ///
    /// Draws each next word with probability proportional to its stored
    /// frequency. Stops at `max_words`, on an unknown context, or on an
    /// `<END>` draw. Fewer words than `max_words` is expected, not an
    /// error.
    pub fn generate_markov<R: Rng + ?Sized>(&self, max_words: usize, rng: &mut R) -> String {
        let context_len = self.table.order() - 1;
        let mut context: Vec<String> = vec![START_MARKER.to_string(); context_len];
        let mut words: Vec<String> = Vec::new();

        for _ in 0..max_words {
            let window = &context[context.len() - context_len..];
            let Some(candidates) = self.table.candidates(window) else {
                break;
            };
            let next = weighted_pick(candidates, rng);
            if next == END_MARKER {
                break;
            }
            words.push(next.to_string());
            context.push(next.to_string());
        }

        attach_punctuation(&words.join(" "))
    }

    /// Maximum-likelihood path: the single most frequent candidate at each
    /// step, first match winning ties.
    pub fn generate_viterbi(&self, max_words: usize) -> String {
        let context_len = self.table.order() - 1;
        let mut context: Vec<String> = vec![START_MARKER.to_string(); context_len];
        let mut words: Vec<String> = Vec::new();

        for _ in 0..max_words {
            let window = &context[context.len() - context_len..];
            let Some(candidates) = self.table.candidates(window) else {
                break;
            };
            let next = candidates
                .iter()
                .fold(None::<&(String, u32)>, |best, cand| match best {
                    Some(b) if b.1 >= cand.1 => Some(b),
                    _ => Some(cand),
                })
                .map(|(word, _)| word.as_str())
                .unwrap_or(END_MARKER);
            if next == END_MARKER {
                break;
            }
            words.push(next.to_string());
            context.push(next.to_string());
        }

        attach_punctuation(&words.join(" "))
    }

    /// Beam search over cumulative log-probabilities.
    ///
    /// Each step expands every surviving hypothesis into its `beam_width`
    /// highest-probability continuations (`<END>` continuations are
    /// discarded), then keeps the `beam_width` best hypotheses overall.
    /// Returns the best hypothesis after `max_words` steps or earlier
    /// exhaustion; empty if nothing could be generated.
    pub fn generate_beam_search(&self, max_words: usize, beam_width: usize) -> String {
        struct Beam {
            words: Vec<String>,
            log_prob: f64,
        }

        if beam_width == 0 {
            return String::new();
        }

        let context_len = self.table.order() - 1;
        let mut beams = vec![Beam {
            words: Vec::new(),
            log_prob: 0.0,
        }];

        for _ in 0..max_words {
            let mut expanded: Vec<Beam> = Vec::new();

            for beam in &beams {
                let mut context: Vec<String> = vec![START_MARKER.to_string(); context_len];
                context.extend(beam.words.iter().cloned());
                let window = &context[context.len() - context_len..];
                let Some(candidates) = self.table.candidates(window) else {
                    continue;
                };

                let total: f64 = candidates.iter().map(|(_, f)| f64::from(*f)).sum();
                let mut scored: Vec<(&str, f64)> = candidates
                    .iter()
                    .map(|(word, freq)| (word.as_str(), (f64::from(*freq) / total).ln()))
                    .collect();
                scored.sort_by(|a, b| b.1.total_cmp(&a.1));

                for (word, log_prob) in scored.into_iter().take(beam_width) {
                    if word == END_MARKER {
                        continue;
                    }
                    let mut words = beam.words.clone();
                    words.push(word.to_string());
                    expanded.push(Beam {
                        words,
                        log_prob: beam.log_prob + log_prob,
                    });
                }
            }

            if expanded.is_empty() {
                break;
            }
            expanded.sort_by(|a, b| b.log_prob.total_cmp(&a.log_prob));
            expanded.truncate(beam_width);
            beams = expanded;
        }

        beams
            .first()
            .map(|beam| attach_punctuation(&beam.words.join(" ")))
            .unwrap_or_default()
    }

    /// Model summary via the retained store handle.
    pub fn stats(&self) -> Result<ModelStats, StegoError> {
        Ok(ModelStats {
            order: self.table.order(),
            ngram_count: self.store.ngram_count()?,
            context_count: self.table.context_count(),
        })
    }

    /// Release the frequency store. Consumes the generator, so any further
    /// use is a compile error rather than degraded output.
    pub fn close(self) -> Result<(), StegoError> {
        self.store.close()
    }
}

/// Draw one candidate with probability proportional to its frequency.
fn weighted_pick<'a, R: Rng + ?Sized>(candidates: &'a [(String, u32)], rng: &mut R) -> &'a str {
    let total: u64 = candidates.iter().map(|(_, f)| u64::from(*f)).sum();
    if total == 0 {
        return &candidates[0].0;
    }
    let mut roll = rng.gen_range(0..total);
    for (word, freq) in candidates {
        let freq = u64::from(*freq);
        if roll < freq {
            return word;
        }
        roll -= freq;
    }
    &candidates[candidates.len() - 1].0
}

/// Collapse whitespace before clause punctuation so it attaches to the
/// preceding word ("word ," → "word,").
fn attach_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ATTACHED_PUNCT.contains(&ch) {
            while out.ends_with(char::is_whitespace) {
                out.pop();
            }
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngram::corpus::build_ngram_database;
    use rusqlite::Connection;

    const CORPUS: &str = "the cat sat on the mat. the cat ran over the hill. \
                          the dog sat on the rug, then slept. a bird sang in the tree.";

    fn test_generator() -> CoverTextGenerator {
        let mut conn = Connection::open_in_memory().unwrap();
        build_ngram_database(&mut conn, CORPUS, 3).unwrap();
        let store = NgramStore::from_connection(conn, 3).unwrap();
        CoverTextGenerator::new(store).unwrap()
    }

    #[test]
    fn markov_seeded_is_deterministic() {
        let gen = test_generator();
        let a = gen.generate(&Strategy::Markov { seed: Some(42) }, 12);
        let b = gen.generate(&Strategy::Markov { seed: Some(42) }, 12);
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn markov_respects_max_words() {
        let gen = test_generator();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let text = gen.generate_markov(3, &mut rng);
        assert!(text.split_whitespace().count() <= 3);
    }

    #[test]
    fn markov_different_seeds_usually_differ() {
        let gen = test_generator();
        let outputs: Vec<String> = (0..16)
            .map(|seed| gen.generate(&Strategy::Markov { seed: Some(seed) }, 12))
            .collect();
        let distinct: std::collections::HashSet<_> = outputs.iter().collect();
        assert!(distinct.len() > 1, "all seeds produced {:?}", outputs[0]);
    }

    #[test]
    fn viterbi_is_deterministic_and_greedy() {
        let gen = test_generator();
        let a = gen.generate_viterbi(10);
        let b = gen.generate_viterbi(10);
        assert_eq!(a, b);
        // "the" starts three of the four training sentences.
        assert!(a.starts_with("the"), "got {a:?}");
    }

    #[test]
    fn beam_search_returns_best_hypothesis() {
        let gen = test_generator();
        let text = gen.generate_beam_search(10, 3);
        assert!(!text.is_empty());
        assert_eq!(text, gen.generate_beam_search(10, 3));
    }

    #[test]
    fn beam_width_zero_is_empty() {
        let gen = test_generator();
        assert_eq!(gen.generate_beam_search(10, 0), "");
    }

    #[test]
    fn generation_terminates_on_sentence_end() {
        // Single training sentence: generation can never exceed its length.
        let mut conn = Connection::open_in_memory().unwrap();
        build_ngram_database(&mut conn, "one two three four.", 3).unwrap();
        let store = NgramStore::from_connection(conn, 3).unwrap();
        let gen = CoverTextGenerator::new(store).unwrap();

        let text = gen.generate_viterbi(50);
        assert_eq!(text, "one two three four");
    }

    #[test]
    fn empty_table_generates_empty_text() {
        let mut conn = Connection::open_in_memory().unwrap();
        build_ngram_database(&mut conn, "", 3).unwrap();
        let store = NgramStore::from_connection(conn, 3).unwrap();
        let gen = CoverTextGenerator::new(store).unwrap();

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(gen.generate_markov(10, &mut rng), "");
        assert_eq!(gen.generate_viterbi(10), "");
        assert_eq!(gen.generate_beam_search(10, 4), "");
    }

    #[test]
    fn punctuation_attaches_to_previous_word() {
        assert_eq!(attach_punctuation("then slept , soundly"), "then slept, soundly");
        assert_eq!(attach_punctuation("wait  !"), "wait!");
        assert_eq!(attach_punctuation("no change here"), "no change here");
        // Generated text never leaves a space before a comma.
        let gen = test_generator();
        for seed in 0..16 {
            let text = gen.generate(&Strategy::Markov { seed: Some(seed) }, 20);
            assert!(!text.contains(" ,"), "got {text:?}");
        }
    }

    #[test]
    fn stats_reflect_store() {
        let gen = test_generator();
        let stats = gen.stats().unwrap();
        assert_eq!(stats.order, 3);
        assert!(stats.ngram_count > 0);
        assert!(stats.context_count > 0);
    }

    #[test]
    fn close_succeeds() {
        let gen = test_generator();
        assert!(gen.close().is_ok());
    }

    #[test]
    fn strategy_labels() {
        assert_eq!(Strategy::Markov { seed: None }.label(), "Markov");
        assert_eq!(Strategy::Viterbi.label(), "Viterbi");
        assert_eq!(Strategy::BeamSearch { beam_width: 5 }.label(), "BeamSearch");
    }
}
