//! Markov chain over word tokens.
//!
//! - Tokenization and detokenization (`tokenizer`)
//! - Bigram states and their successors (`state`)
//! - The transition table built from a corpus (`transition_table`)
//! - Injectable randomness (`picker`)
//! - Bounded stochastic generation (`generator`)

/// Lowercase word / punctuation tokenizer and the line sentinels.
pub mod tokenizer;

/// Bigram keys and the successor list stored for each of them.
pub mod state;

/// Transition table built from a corpus.
///
/// Supports sequential and parallel construction and merging.
pub mod transition_table;

/// "Pick one of N" capability used by the generator.
pub mod picker;

/// Seed handling and the bounded walk through the table.
pub mod generator;
