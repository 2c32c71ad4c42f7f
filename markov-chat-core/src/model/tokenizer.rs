use std::sync::LazyLock;

use regex::Regex;

/// A single lowercase word run or punctuation character.
pub type Token = String;

/// Sentinel marking the beginning of a corpus line.
pub const START_TOKEN: &str = "<start>";

/// Sentinel marking the end of a corpus line.
pub const END_TOKEN: &str = "<end>";

/// Word runs (Unicode aware) or any single non-word, non-space character.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
	// Should not panic, the pattern is a literal
	Regex::new(r"\w+|[^\w\s]").unwrap()
});

/// Whitespace in front of the punctuation that attaches to the previous word.
static ATTACHED_PUNCTUATION_RE: LazyLock<Regex> = LazyLock::new(|| {
	// Should not panic, the pattern is a literal
	Regex::new(r"\s+([.,!?;:])").unwrap()
});

/// Splits text into lowercase tokens.
///
/// - Each match is either a maximal run of word characters or exactly one
///   non-word, non-whitespace character.
/// - Whitespace produces no token.
/// - Input with nothing matchable yields an empty vector.
///
/// The sentinels can never come out of this function: `<` and `>` are
/// emitted as standalone punctuation tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
	let lowered = text.to_lowercase();
	TOKEN_RE
		.find_iter(&lowered)
		.map(|m| m.as_str().to_owned())
		.collect()
}

/// Joins tokens back into display text.
///
/// Tokens are separated by a single space, then the space before any of
/// `. , ! ? ; :` is removed so punctuation sticks to the preceding word.
/// This is an approximation, not an inverse of [`tokenize`].
pub fn detokenize<S: AsRef<str>>(tokens: &[S]) -> String {
	let joined = tokens
		.iter()
		.map(AsRef::as_ref)
		.collect::<Vec<_>>()
		.join(" ");
	ATTACHED_PUNCTUATION_RE.replace_all(&joined, "$1").into_owned()
}
