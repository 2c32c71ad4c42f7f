use thiserror::Error;

/// Errors raised by the chat engine and its collaborators.
///
/// Generation and rule matching have no error path: an unknown context
/// is an expected outcome, answered with the fallback message.
#[derive(Error, Debug)]
pub enum ChatError {
	/// The table builder was handed a zero-length corpus.
	#[error("Corpus is empty, substitute the default corpus before building")]
	EmptyCorpus,

	/// A persisted corpus could not be decoded into a non-empty line sequence.
	#[error("Stored corpus is malformed: {0}")]
	MalformedStoredCorpus(String),

	/// Two states or tables with different keys were merged.
	#[error("Key mismatch")]
	KeyMismatch,

	/// A table builder thread panicked.
	#[error("A transition table worker thread panicked")]
	Worker,

	#[error("Invalid configuration: {0}")]
	Config(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
