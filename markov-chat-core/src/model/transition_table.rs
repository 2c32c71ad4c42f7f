use std::collections::HashMap;
use std::thread;

use log::debug;

use super::state::{Bigram, State};
use super::tokenizer::{END_TOKEN, START_TOKEN, Token, tokenize};
use crate::error::ChatError;

/// Corpora with at least this many lines are built on worker threads.
pub const PARALLEL_THRESHOLD: usize = 1000;

/// Mapping from a bigram to every token observed right after it.
///
/// # Responsibilities
/// - Build the chain from corpus lines padded with sentinels
/// - Look up the successors of a bigram
/// - Merge with another table (parallel construction)
///
/// # Invariants
/// - A key is present only if at least one successor was observed
/// - Successor lists keep observation order, duplicates included
/// - A table is never updated after construction: a new corpus means a new table
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
	states: HashMap<Bigram, State>,
}

impl TransitionTable {
	/// Builds a table from a corpus.
	///
	/// Each line is tokenized and padded as `<start> <start> tokens... <end>`,
	/// then every window of three tokens records one transition.
	///
	/// Large corpora are split across threads (see [`Self::build_parallel`]),
	/// the resulting table is the same.
	///
	/// # Errors
	/// Returns [`ChatError::EmptyCorpus`] for a zero-length corpus. Callers
	/// substitute a default corpus beforehand.
	pub fn build<S: AsRef<str> + Sync>(corpus: &[S]) -> Result<Self, ChatError> {
		if corpus.is_empty() {
			return Err(ChatError::EmptyCorpus);
		}
		if corpus.len() >= PARALLEL_THRESHOLD {
			return Self::build_parallel(corpus);
		}

		let mut table = Self::default();
		for line in corpus {
			table.add_line(line.as_ref());
		}
		debug!(
			"Built transition table: {} lines, {} keys, {} transitions",
			corpus.len(),
			table.len(),
			table.transition_count()
		);
		Ok(table)
	}

	/// Builds partial tables on worker threads and merges them in chunk order.
	///
	/// Merging in order keeps successor lists identical to a sequential build.
	///
	/// # Errors
	/// - [`ChatError::EmptyCorpus`] for a zero-length corpus
	/// - [`ChatError::Worker`] if a builder thread panicked
	pub fn build_parallel<S: AsRef<str> + Sync>(corpus: &[S]) -> Result<Self, ChatError> {
		if corpus.is_empty() {
			return Err(ChatError::EmptyCorpus);
		}

		let chunks = num_cpus::get().max(1);
		let chunk_size = corpus.len().div_ceil(chunks);

		let partial_tables = thread::scope(|scope| {
			let handles: Vec<_> = corpus
				.chunks(chunk_size)
				.map(|chunk| {
					scope.spawn(move || {
						let mut partial = TransitionTable::default();
						for line in chunk {
							partial.add_line(line.as_ref());
						}
						partial
					})
				})
				.collect();

			handles
				.into_iter()
				.map(|handle| handle.join().map_err(|_| ChatError::Worker))
				.collect::<Result<Vec<TransitionTable>, ChatError>>()
		})?;

		let mut table = Self::default();
		for partial in &partial_tables {
			table.merge(partial)?;
		}
		debug!(
			"Built transition table on {} threads: {} lines, {} keys, {} transitions",
			partial_tables.len(),
			corpus.len(),
			table.len(),
			table.transition_count()
		);
		Ok(table)
	}

	/// Adds the transitions of one line.
	///
	/// A line without tokens still records `(<start>, <start>) -> <end>`.
	fn add_line(&mut self, line: &str) {
		let mut tokens: Vec<Token> = Vec::with_capacity(3);
		tokens.push(START_TOKEN.to_owned());
		tokens.push(START_TOKEN.to_owned());
		tokens.extend(tokenize(line));
		tokens.push(END_TOKEN.to_owned());

		for window in tokens.windows(3) {
			let key = Bigram::new(window[0].clone(), window[1].clone());
			let next = window[2].clone();
			match self.states.get_mut(&key) {
				Some(state) => state.add_successor(next),
				None => {
					self.states.insert(key.clone(), State::new(key, next));
				}
			}
		}
	}

	/// Returns the successors observed after `key`.
	///
	/// `None` means the chain has no continuation for this context.
	pub fn successors(&self, key: &Bigram) -> Option<&[Token]> {
		self.states.get(key).map(State::successors)
	}

	/// Returns the state stored for `key`.
	pub fn state(&self, key: &Bigram) -> Option<&State> {
		self.states.get(key)
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Total number of recorded transitions, duplicates included.
	pub fn transition_count(&self) -> usize {
		self.states.values().map(|state| state.successors().len()).sum()
	}

	/// Merges another table into this one.
	///
	/// Successors of `other` are appended after the existing ones.
	///
	/// # Errors
	/// Propagates [`ChatError::KeyMismatch`] from the state merge.
	pub fn merge(&mut self, other: &Self) -> Result<(), ChatError> {
		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}
		Ok(())
	}
}
