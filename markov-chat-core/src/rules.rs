use std::collections::HashMap;

use serde::Deserialize;

use crate::model::tokenizer::tokenize;

const GREETING: &str = "Olá, eu sou o JARViS. Em que posso ajudar?";

/// Fixed mapping from a trigger token to a canned reply.
///
/// Triggers are stored lowercase so they can match tokenizer output,
/// including when read from a configuration file.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "HashMap<String, String>")]
pub struct RuleSet {
	rules: HashMap<String, String>,
}

impl Default for RuleSet {
	fn default() -> Self {
		Self::from_map([
			("oi", GREETING),
			("ola", GREETING),
			("jarvis", "JARViS online. Aguardando comandos."),
			("ajuda", "Sou o JARViS. Posso conversar e gerar respostas com base no texto de treino."),
			("tchau", "Até logo. JARViS encerrando."),
		])
	}
}

impl RuleSet {
	/// An empty rule set, nothing ever matches.
	pub fn empty() -> Self {
		Self { rules: HashMap::new() }
	}

	pub fn from_map<I, K, V>(rules: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let mut set = Self::empty();
		for (trigger, reply) in rules {
			set.insert(trigger, reply);
		}
		set
	}

	pub fn insert(&mut self, trigger: impl AsRef<str>, reply: impl Into<String>) {
		self.rules.insert(trigger.as_ref().to_lowercase(), reply.into());
	}

	pub fn get(&self, trigger: &str) -> Option<&str> {
		self.rules.get(trigger).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Returns the reply of the first input token that is a trigger.
	///
	/// The first match is decided by token position in `text`, not by
	/// the order of the rules.
	pub fn find_response(&self, text: &str) -> Option<&str> {
		tokenize(text).iter().find_map(|token| self.get(token))
	}
}

impl From<HashMap<String, String>> for RuleSet {
	fn from(rules: HashMap<String, String>) -> Self {
		Self::from_map(rules)
	}
}

/// Looks up a canned reply for `text`, see [`RuleSet::find_response`].
pub fn find_rule_response<'a>(text: &str, rules: &'a RuleSet) -> Option<&'a str> {
	rules.find_response(text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn greeting_matches_inside_a_sentence() {
		let rules = RuleSet::default();
		assert_eq!(find_rule_response("oi, tudo bem?", &rules), Some(GREETING));
	}

	#[test]
	fn match_ignores_case() {
		let rules = RuleSet::default();
		assert_eq!(rules.find_response("Ei JARVIS"), Some("JARViS online. Aguardando comandos."));
	}

	#[test]
	fn first_token_position_wins() {
		let rules = RuleSet::default();
		assert_eq!(rules.find_response("tchau e oi"), Some("Até logo. JARViS encerrando."));
		assert_eq!(rules.find_response("oi e tchau"), Some(GREETING));
	}

	#[test]
	fn partial_words_do_not_match() {
		let rules = RuleSet::default();
		assert_eq!(rules.find_response("oitenta ajudante"), None);
		assert_eq!(rules.find_response(""), None);
	}

	#[test]
	fn accented_word_is_a_different_token() {
		let rules = RuleSet::default();
		assert_eq!(rules.find_response("olá"), None);
		assert_eq!(rules.find_response("ola"), Some(GREETING));
	}

	#[test]
	fn triggers_are_lowercased_on_insert() {
		let mut rules = RuleSet::empty();
		rules.insert("Status", "ok");
		assert_eq!(rules.len(), 1);
		assert_eq!(rules.find_response("STATUS?"), Some("ok"));
	}
}
