use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::corpus::default_corpus;
use crate::error::ChatError;
use crate::model::generator::{DEFAULT_MAX_TOKENS, FALLBACK_MESSAGE, Generator};
use crate::rules::RuleSet;

/// Status reported after a successful training.
pub const TRAINED_MESSAGE: &str = "Treino atualizado. JARViS pronto.";

/// Settings of a chat bot.
///
/// Every field is optional in a configuration file, missing ones keep
/// their default value.
///
/// ```toml
/// max_tokens = 40
/// fallback_message = "Não sei o que dizer."
/// default_corpus = ["Uma frase.", "Outra frase."]
///
/// [rules]
/// oi = "Olá!"
/// ```
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
	/// Upper bound on generated tokens per reply.
	pub max_tokens: usize,

	/// Reply used when generation produces nothing.
	pub fallback_message: String,

	/// Status returned by a training.
	pub trained_message: String,

	/// Lines used when no training text is available.
	pub default_corpus: Vec<String>,

	/// Exact token triggers answered before generation.
	pub rules: RuleSet,
}

impl Default for ChatConfig {
	fn default() -> Self {
		Self {
			max_tokens: DEFAULT_MAX_TOKENS,
			fallback_message: FALLBACK_MESSAGE.to_owned(),
			trained_message: TRAINED_MESSAGE.to_owned(),
			default_corpus: default_corpus(),
			rules: RuleSet::default(),
		}
	}
}

impl ChatConfig {
	/// Loads a TOML configuration file.
	///
	/// # Errors
	/// - [`ChatError::Io`] if the file cannot be read
	/// - [`ChatError::Config`] if it is not valid TOML or fails validation
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChatError> {
		let contents = fs::read_to_string(path)?;
		Self::from_toml(&contents)
	}

	/// Parses and validates a TOML document.
	pub fn from_toml(contents: &str) -> Result<Self, ChatError> {
		let config: Self = toml::from_str(contents).map_err(|e| ChatError::Config(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	/// Checks the invariants the engine relies on.
	///
	/// # Errors
	/// Returns [`ChatError::Config`] if:
	/// - `max_tokens` is 0
	/// - `fallback_message` is blank
	/// - `default_corpus` has no non-blank line
	pub fn validate(&self) -> Result<(), ChatError> {
		if self.max_tokens == 0 {
			return Err(ChatError::Config("max_tokens must be >= 1".to_owned()));
		}
		if self.fallback_message.trim().is_empty() {
			return Err(ChatError::Config("fallback_message cannot be empty".to_owned()));
		}
		if self.default_corpus.iter().all(|line| line.trim().is_empty()) {
			return Err(ChatError::Config("default_corpus needs at least one line".to_owned()));
		}
		Ok(())
	}

	/// Generator configured with these settings.
	pub fn generator(&self) -> Generator {
		Generator::new(self.max_tokens, self.fallback_message.clone())
	}
}
