use log::trace;

use super::picker::{Picker, RngPicker};
use super::state::Bigram;
use super::tokenizer::{END_TOKEN, START_TOKEN, Token, detokenize, tokenize};
use super::transition_table::TransitionTable;

/// Default bound on the number of generated tokens.
pub const DEFAULT_MAX_TOKENS: usize = 30;

/// Reply used when the walk produces nothing.
pub const FALLBACK_MESSAGE: &str = "Ainda estou aprendendo. Pode reformular?";

/// Derives the first key of a walk from the seed text.
///
/// - 2 tokens or more: the last two tokens
/// - 1 token: `(<start>, token)`
/// - no token: `(<start>, <start>)`
pub fn seed_key(seed: &str) -> Bigram {
	let mut tokens = tokenize(seed);
	let current = tokens.pop();
	let previous = tokens.pop();
	match (previous, current) {
		(Some(previous), Some(current)) => Bigram::new(previous, current),
		(None, Some(current)) => Bigram::new(START_TOKEN, current),
		_ => Bigram::new(START_TOKEN, START_TOKEN),
	}
}

/// Walks the table from `key` for at most `max_tokens` steps.
///
/// The walk stops on a key with no entry, on `<end>` (not emitted), or
/// once `max_tokens` tokens were produced.
pub fn walk(
	table: &TransitionTable,
	mut key: Bigram,
	max_tokens: usize,
	picker: &mut dyn Picker,
) -> Vec<Token> {
	let mut produced = Vec::new();

	for _ in 0..max_tokens {
		let Some(state) = table.state(&key) else {
			trace!("No continuation for ({}, {})", key.previous, key.current);
			break;
		};
		let Some(next) = state.predict(picker) else {
			break;
		};
		if next == END_TOKEN {
			break;
		}
		let next = next.clone();
		produced.push(next.clone());
		key = key.advance(next);
	}

	produced
}

/// Stochastic reply generator over a transition table.
///
/// # Responsibilities
/// - Turn a seed into the starting key
/// - Walk the table with an injectable picker
/// - Never return an empty reply
#[derive(Debug, Clone)]
pub struct Generator {
	max_tokens: usize,
	fallback: String,
}

impl Default for Generator {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_TOKENS, FALLBACK_MESSAGE)
	}
}

impl Generator {
	pub fn new(max_tokens: usize, fallback: impl Into<String>) -> Self {
		Self { max_tokens, fallback: fallback.into() }
	}

	pub fn max_tokens(&self) -> usize {
		self.max_tokens
	}

	pub fn fallback(&self) -> &str {
		&self.fallback
	}

	/// Generates a reply using the thread-local random generator.
	pub fn generate(&self, table: &TransitionTable, seed: &str) -> String {
		self.generate_with(table, seed, &mut RngPicker::thread())
	}

	/// Generates a reply, choosing successors through `picker`.
	///
	/// Returns the fallback message when the walk yields no token.
	pub fn generate_with(&self, table: &TransitionTable, seed: &str, picker: &mut dyn Picker) -> String {
		let key = seed_key(seed);
		let produced = walk(table, key, self.max_tokens, picker);
		trace!("Generated {} tokens from seed {:?}", produced.len(), seed);

		if produced.is_empty() {
			return self.fallback.clone();
		}
		detokenize(&produced)
	}
}

/// Builds a reply for `seed` with the default fallback message.
///
/// Never fails and never returns an empty string.
pub fn generate_response(table: &TransitionTable, seed: &str, max_tokens: usize) -> String {
	Generator::new(max_tokens, FALLBACK_MESSAGE).generate(table, seed)
}

/// Same as [`generate_response`] with an explicit picker.
pub fn generate_response_with(
	table: &TransitionTable,
	seed: &str,
	max_tokens: usize,
	picker: &mut dyn Picker,
) -> String {
	Generator::new(max_tokens, FALLBACK_MESSAGE).generate_with(table, seed, picker)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn first() -> impl FnMut(usize) -> usize {
		|_| 0
	}

	fn last() -> impl FnMut(usize) -> usize {
		|len| len - 1
	}

	#[test]
	fn seed_key_from_token_count() {
		assert_eq!(seed_key(""), Bigram::new(START_TOKEN, START_TOKEN));
		assert_eq!(seed_key("  ?? "), Bigram::new("?", "?"));
		assert_eq!(seed_key("Olá"), Bigram::new(START_TOKEN, "olá"));
		assert_eq!(seed_key("Eu sou o JARViS"), Bigram::new("o", "jarvis"));
	}

	#[test]
	fn empty_seed_walks_the_whole_line() {
		let table = TransitionTable::build(&["a b c."]).unwrap();
		assert_eq!(generate_response_with(&table, "", 30, &mut first()), "a b c.");
		assert_eq!(generate_response(&table, "", 30), "a b c.");
	}

	#[test]
	fn short_seed_keeps_walking() {
		let table = TransitionTable::build(&["a b c d e"]).unwrap();
		assert_eq!(generate_response_with(&table, "A", 30, &mut first()), "b c d e");
	}

	#[test]
	fn two_token_seed_continues_from_its_tail() {
		let table = TransitionTable::build(&["a b c d e"]).unwrap();
		assert_eq!(generate_response_with(&table, "x y c d", 30, &mut first()), "e");
	}

	#[test]
	fn picker_selects_among_successors() {
		let table = TransitionTable::build(&["eu sou jarvis", "eu posso ajudar"]).unwrap();
		assert_eq!(generate_response_with(&table, "", 30, &mut first()), "eu sou jarvis");
		assert_eq!(generate_response_with(&table, "", 30, &mut last()), "eu posso ajudar");
	}

	#[test]
	fn unknown_context_falls_back() {
		let table = TransitionTable::build(&["a b c."]).unwrap();
		assert_eq!(generate_response(&table, "zz yy", 30), FALLBACK_MESSAGE);
	}

	#[test]
	fn immediate_end_falls_back() {
		let table = TransitionTable::build(&[""]).unwrap();
		assert_eq!(generate_response(&table, "", 30), FALLBACK_MESSAGE);
	}

	#[test]
	fn zero_budget_falls_back() {
		let table = TransitionTable::build(&["a b c."]).unwrap();
		assert_eq!(generate_response(&table, "", 0), FALLBACK_MESSAGE);
	}

	#[test]
	fn walk_is_bounded_by_max_tokens() {
		// "a a a ..." loops on (a, a) forever without a bound
		let table = TransitionTable::build(&["a a a a"]).unwrap();
		for max_tokens in 1..10 {
			let tokens = walk(&table, seed_key(""), max_tokens, &mut first());
			assert_eq!(tokens.len(), max_tokens);
		}
	}

	#[test]
	fn walk_stops_on_missing_key_regardless_of_budget() {
		let table = TransitionTable::build(&["a b c."]).unwrap();
		let tokens = walk(&table, Bigram::new("b", "a"), 1000, &mut first());
		assert!(tokens.is_empty());
	}

	#[test]
	fn random_walk_output_is_always_a_valid_continuation() {
		let table = TransitionTable::build(&["o céu é azul.", "o mar é verde.", "o céu é verde!"]).unwrap();
		for _ in 0..100 {
			let tokens = walk(&table, seed_key(""), 30, &mut RngPicker::thread());
			assert!(!tokens.is_empty());
			assert!(tokens.len() <= 30);

			let mut key = seed_key("");
			for token in tokens {
				assert!(table.successors(&key).unwrap().contains(&token));
				key = key.advance(token);
			}
		}
	}

	#[test]
	fn custom_fallback_is_used() {
		let generator = Generator::new(5, "...");
		let table = TransitionTable::build(&["a"]).unwrap();
		assert_eq!(generator.generate(&table, "nada aqui"), "...");
		assert_eq!(generator.max_tokens(), 5);
	}
}
