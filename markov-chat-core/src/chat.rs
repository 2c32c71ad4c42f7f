use std::sync::Arc;

use log::{debug, info};

use crate::config::ChatConfig;
use crate::corpus::Corpus;
use crate::error::ChatError;
use crate::model::generator::Generator;
use crate::model::picker::{Picker, RngPicker};
use crate::model::transition_table::TransitionTable;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
	Rule,
	Generated,
}

/// A reply to one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
	pub text: String,
	pub source: ReplySource,
}

/// Conversation front end: canned rules first, chain generation second.
///
/// # Responsibilities
/// - Own the current transition table and the corpus it was built from
/// - Rebuild and replace the table wholesale on training
/// - Answer each message independently of the previous ones
#[derive(Debug, Clone)]
pub struct ChatBot {
	config: ChatConfig,
	generator: Generator,
	corpus: Corpus,
	table: Arc<TransitionTable>,
}

impl ChatBot {
	/// Creates a bot trained on the configured default corpus.
	///
	/// # Errors
	/// Returns [`ChatError::Config`] if the configuration is invalid.
	pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
		config.validate()?;
		let corpus = Corpus::from_lines(&config.default_corpus);
		Self::with_corpus(config, corpus)
	}

	/// Creates a bot trained on `corpus` (the default one if it is empty).
	pub fn with_corpus(config: ChatConfig, corpus: Corpus) -> Result<Self, ChatError> {
		config.validate()?;
		let corpus = corpus.or_default_with(&config.default_corpus);
		let table = TransitionTable::build(corpus.lines())?;
		Ok(Self {
			generator: config.generator(),
			config,
			corpus,
			table: Arc::new(table),
		})
	}

	pub fn config(&self) -> &ChatConfig {
		&self.config
	}

	pub fn corpus(&self) -> &Corpus {
		&self.corpus
	}

	/// Snapshot of the current table, still valid after a later training.
	pub fn table(&self) -> Arc<TransitionTable> {
		Arc::clone(&self.table)
	}

	/// Builds a table for `corpus` without touching the bot.
	///
	/// Pair with [`Self::replace`] to keep a slow build outside any lock.
	pub fn prepare(&self, corpus: Corpus) -> Result<(Corpus, TransitionTable), ChatError> {
		let corpus = corpus.or_default_with(&self.config.default_corpus);
		let table = TransitionTable::build(corpus.lines())?;
		Ok((corpus, table))
	}

	/// Swaps in a table built by [`Self::prepare`]. Returns the trained status.
	pub fn replace(&mut self, corpus: Corpus, table: TransitionTable) -> &str {
		info!(
			"Trained on {} lines ({} keys, {} transitions)",
			corpus.len(),
			table.len(),
			table.transition_count()
		);
		self.corpus = corpus;
		self.table = Arc::new(table);
		&self.config.trained_message
	}

	/// Rebuilds the table from `corpus` and replaces the current one.
	///
	/// An empty corpus is replaced by the configured default.
	pub fn train(&mut self, corpus: Corpus) -> Result<&str, ChatError> {
		let (corpus, table) = self.prepare(corpus)?;
		Ok(self.replace(corpus, table))
	}

	/// Answers a message using the thread-local random generator.
	pub fn respond(&self, prompt: &str) -> Option<Reply> {
		self.respond_with(prompt, &mut RngPicker::thread())
	}

	/// Answers a message, choosing successors through `picker`.
	///
	/// Returns `None` for a blank message.
	pub fn respond_with(&self, prompt: &str, picker: &mut dyn Picker) -> Option<Reply> {
		self.answer(prompt, &self.generator, picker)
	}

	/// Same as [`Self::respond_with`] with a custom token bound.
	pub fn respond_bounded(&self, prompt: &str, max_tokens: usize, picker: &mut dyn Picker) -> Option<Reply> {
		let generator = Generator::new(max_tokens, self.config.fallback_message.clone());
		self.answer(prompt, &generator, picker)
	}

	fn answer(&self, prompt: &str, generator: &Generator, picker: &mut dyn Picker) -> Option<Reply> {
		let prompt = prompt.trim();
		if prompt.is_empty() {
			return None;
		}

		if let Some(text) = self.config.rules.find_response(prompt) {
			debug!("Rule matched for {:?}", prompt);
			return Some(Reply { text: text.to_owned(), source: ReplySource::Rule });
		}

		let text = generator.generate_with(&self.table, prompt, picker);
		Some(Reply { text, source: ReplySource::Generated })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::corpus::DEFAULT_CORPUS;
	use crate::model::generator::FALLBACK_MESSAGE;

	fn first() -> impl FnMut(usize) -> usize {
		|_| 0
	}

	#[test]
	fn starts_on_default_corpus() {
		let bot = ChatBot::new(ChatConfig::default()).unwrap();
		assert_eq!(bot.corpus().lines(), DEFAULT_CORPUS);
		assert!(!bot.table().is_empty());
	}

	#[test]
	fn rules_win_over_generation() {
		let mut bot = ChatBot::new(ChatConfig::default()).unwrap();
		bot.train(Corpus::from_lines(["oi, tudo bem? sim."])).unwrap();
		let reply = bot.respond("oi, tudo bem?").unwrap();
		assert_eq!(reply.text, "Olá, eu sou o JARViS. Em que posso ajudar?");
		assert_eq!(reply.source, ReplySource::Rule);
	}

	#[test]
	fn generates_when_no_rule_matches() {
		let mut bot = ChatBot::new(ChatConfig::default()).unwrap();
		let status = bot.train(Corpus::from_lines(["a b c."])).unwrap().to_owned();
		assert_eq!(status, "Treino atualizado. JARViS pronto.");

		let reply = bot.respond_with("a", &mut first()).unwrap();
		assert_eq!(reply, Reply { text: "b c.".to_owned(), source: ReplySource::Generated });
	}

	#[test]
	fn blank_message_gets_no_reply() {
		let bot = ChatBot::new(ChatConfig::default()).unwrap();
		assert!(bot.respond("   ").is_none());
	}

	#[test]
	fn unknown_context_gets_fallback() {
		let bot = ChatBot::new(ChatConfig::default()).unwrap();
		let reply = bot.respond("palavras desconhecidas").unwrap();
		assert_eq!(reply.text, FALLBACK_MESSAGE);
	}

	#[test]
	fn empty_training_uses_default_corpus() {
		let mut bot = ChatBot::with_corpus(ChatConfig::default(), Corpus::from_lines(["x y"])).unwrap();
		bot.train(Corpus::from_text("\n  \n")).unwrap();
		assert_eq!(bot.corpus().lines(), DEFAULT_CORPUS);
	}

	#[test]
	fn training_replaces_the_table_wholesale() {
		let mut bot = ChatBot::with_corpus(ChatConfig::default(), Corpus::from_lines(["a b c."])).unwrap();
		let before = bot.table();
		bot.train(Corpus::from_lines(["x y z."])).unwrap();

		assert_eq!(before.transition_count(), 5);
		assert_eq!(bot.respond_with("x", &mut first()).unwrap().text, "y z.");
		assert_eq!(bot.respond_with("a b", &mut first()).unwrap().text, FALLBACK_MESSAGE);
	}

	#[test]
	fn bounded_reply_respects_limit() {
		let bot = ChatBot::with_corpus(ChatConfig::default(), Corpus::from_lines(["um dois três quatro"])).unwrap();
		let reply = bot.respond_bounded("um", 2, &mut first()).unwrap();
		assert_eq!(reply.text, "dois três");
	}
}
