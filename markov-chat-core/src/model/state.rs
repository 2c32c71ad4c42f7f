use super::picker::Picker;
use super::tokenizer::Token;
use crate::error::ChatError;

/// Ordered pair of two consecutive tokens used as a lookup key.
///
/// Equality and hashing are structural, so no separator is needed
/// between the two tokens.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bigram {
	pub previous: Token,
	pub current: Token,
}

impl Bigram {
	pub fn new(previous: impl Into<Token>, current: impl Into<Token>) -> Self {
		Self { previous: previous.into(), current: current.into() }
	}

	/// Slides the window forward by one token.
	///
	/// `(a, b).advance(c)` gives `(b, c)`.
	pub fn advance(self, next: Token) -> Self {
		Self { previous: self.current, current: next }
	}
}

/// Represents a state of the chain.
///
/// A `State` corresponds to one bigram (`key`) and stores every token
/// observed right after it, in observation order.
///
/// Frequency is encoded by repetition: a successor seen three times appears
/// three times in `successors`, which makes a uniform pick over the list
/// a frequency-weighted pick over distinct tokens.
///
/// ## Invariants
/// - All successors belong to the same `key`
/// - `successors` is never empty once the state is stored in a table
#[derive(Clone, Debug)]
pub struct State {
	key: Bigram,
	successors: Vec<Token>,
}

impl State {
	/// Creates a state holding its first observed successor.
	pub fn new(key: Bigram, first: Token) -> Self {
		Self { key, successors: vec![first] }
	}

	pub fn key(&self) -> &Bigram {
		&self.key
	}

	pub fn successors(&self) -> &[Token] {
		&self.successors
	}

	/// Records one more occurrence of `next` after this key.
	pub fn add_successor(&mut self, next: Token) {
		self.successors.push(next);
	}

	/// Picks one successor uniformly through `picker`.
	///
	/// Out of range indices from a misbehaving picker are clamped to the
	/// last successor.
	pub fn predict(&self, picker: &mut dyn Picker) -> Option<&Token> {
		if self.successors.is_empty() {
			return None;
		}
		let index = picker.pick(self.successors.len()).min(self.successors.len() - 1);
		self.successors.get(index)
	}

	/// Appends the successors of another state with the same key.
	///
	/// # Errors
	/// Returns [`ChatError::KeyMismatch`] if the keys differ.
	pub fn merge(&mut self, other: &Self) -> Result<(), ChatError> {
		if self.key != other.key {
			return Err(ChatError::KeyMismatch);
		}
		self.successors.extend(other.successors.iter().cloned());
		Ok(())
	}
}
