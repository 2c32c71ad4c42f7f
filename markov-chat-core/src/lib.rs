//! Minimal conversational text generator.
//!
//! This crate provides:
//! - A word-level tokenizer
//! - A transition table keyed by bigrams, built from example sentences
//! - A bounded stochastic generator extending a seed phrase
//! - Exact token rules answering before the generator
//! - Corpus handling, persistence and configuration for front ends
//!
//! A typical turn goes through [`chat::ChatBot`]: the rule set is tried
//! first, and the chain is only walked when no trigger matched.

/// Markov chain model: tokenizer, table and generator.
pub mod model;

/// Canned replies triggered by exact tokens.
pub mod rules;

/// Training line sequences and the default corpus.
pub mod corpus;

/// Persistence of a trained corpus.
pub mod store;

/// Bot settings, loadable from TOML.
pub mod config;

/// Rule-first, generate-second conversation front end.
pub mod chat;

pub mod error;

pub use chat::{ChatBot, Reply, ReplySource};
pub use config::ChatConfig;
pub use corpus::Corpus;
pub use error::{ChatError, Result};
pub use model::generator::{generate_response, generate_response_with};
pub use model::transition_table::TransitionTable;
pub use rules::{RuleSet, find_rule_response};

/// Builds the transition table of a corpus.
///
/// # Errors
/// Returns [`ChatError::EmptyCorpus`] for a zero-length corpus.
pub fn build_transitions<S: AsRef<str> + Sync>(corpus: &[S]) -> Result<TransitionTable> {
	TransitionTable::build(corpus)
}
