use serde::{Deserialize, Serialize};

/// Persona sentences used whenever no training text is available.
pub const DEFAULT_CORPUS: [&str; 3] = [
	"Olá. Eu sou o JARViS, assistente virtual inspirado no filme Homem de Ferro.",
	"Posso gerar frases com base no que você me ensinar.",
	"Forneça exemplos ou faça perguntas, senhor.",
];

/// Returns the default corpus as owned lines.
pub fn default_corpus() -> Vec<String> {
	DEFAULT_CORPUS.iter().map(|line| (*line).to_owned()).collect()
}

/// Ordered sequence of trimmed, non-empty training lines.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Corpus {
	lines: Vec<String>,
}

impl Corpus {
	/// Splits raw multi-line training text into a corpus.
	///
	/// Lines are trimmed and blank ones dropped.
	pub fn from_text(text: &str) -> Self {
		Self::from_lines(text.lines())
	}

	/// Builds a corpus from individual samples, trimming and dropping blanks.
	pub fn from_lines<I, S>(lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let lines = lines
			.into_iter()
			.map(|line| line.as_ref().trim().to_owned())
			.filter(|line| !line.is_empty())
			.collect();
		Self { lines }
	}

	/// Replaces an empty corpus with `default`.
	pub fn or_default_with(self, default: &[String]) -> Self {
		if self.is_empty() {
			Self::from_lines(default)
		} else {
			self
		}
	}

	/// Replaces an empty corpus with [`DEFAULT_CORPUS`].
	pub fn or_default(self) -> Self {
		self.or_default_with(&default_corpus())
	}

	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	pub fn len(&self) -> usize {
		self.lines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}
}

impl From<Corpus> for Vec<String> {
	fn from(corpus: Corpus) -> Self {
		corpus.lines
	}
}
