// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Example: hide a message in generated text and recover it.
use phasm_text::ngram::corpus::build_ngram_database;
use phasm_text::{CoverTextGenerator, NgramStore, StegoEngine};
use rusqlite::Connection;

const DEMO_CORPUS: &str = "the cat sat on the mat. the cat ran over the hill. \
                           the dog sat on the rug, then slept. a bird sang in the old tree. \
                           the bird flew over the hill at dawn.";

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: roundtrip <message> <password> [ngram.db]");
        std::process::exit(1);
    }
    let message = &args[1];
    let password = &args[2];

    let store = match args.get(3) {
        Some(path) => NgramStore::open(path, 3).expect("Could not open n-gram database"),
        None => {
            // No database given: train a tiny in-memory model from the demo corpus.
            let mut conn = Connection::open_in_memory().expect("Could not open in-memory db");
            build_ngram_database(&mut conn, DEMO_CORPUS, 3).expect("Could not build n-grams");
            NgramStore::from_connection(conn, 3).expect("Could not wrap connection")
        }
    };

    let generator = CoverTextGenerator::new(store).expect("Could not load frequency table");
    let stats = generator.stats().expect("Could not read model stats");
    println!("Model: {}-gram, {} n-grams, {} contexts", stats.order, stats.ngram_count, stats.context_count);

    let engine = StegoEngine::with_defaults(generator);

    let encoded = engine.encode(message, password).expect("Encode failed");
    println!("Visible text:  {}", encoded.visible_text);
    println!("Algorithm:     {}", encoded.algorithm);
    println!(
        "Hidden chars:  {}",
        encoded.stego_text.chars().count() - encoded.visible_text.chars().count()
    );

    let decoded = engine.decode(&encoded.stego_text, password).expect("Decode failed");
    println!("Recovered:     {}", decoded.message);
    println!("Corrections:   {}", decoded.errors_corrected);

    engine.close().expect("Close failed");
}
