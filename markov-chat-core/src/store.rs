use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, warn};

use crate::corpus::Corpus;
use crate::error::ChatError;

/// Reads a plain text training file.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`, trims lines and drops blank ones
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Corpus, ChatError> {
	let contents = fs::read_to_string(path)?;
	Ok(Corpus::from_text(&contents))
}

/// Persists a corpus with `postcard`.
///
/// Parent directories are created if missing.
pub fn save_corpus<P: AsRef<Path>>(path: P, corpus: &Corpus) -> Result<(), ChatError> {
	let path = path.as_ref();
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)?;
		}
	}
	let bytes = postcard::to_stdvec(corpus).map_err(|e| ChatError::MalformedStoredCorpus(e.to_string()))?;
	fs::write(path, bytes)?;
	debug!("Saved {} corpus lines to {}", corpus.len(), path.display());
	Ok(())
}

/// Loads a corpus written by [`save_corpus`].
///
/// # Errors
/// - [`ChatError::Io`] if the file cannot be read
/// - [`ChatError::MalformedStoredCorpus`] if the bytes are not a sequence of
///   strings, or hold no non-blank line
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus, ChatError> {
	let bytes = fs::read(path)?;
	let lines: Vec<String> =
		postcard::from_bytes(&bytes).map_err(|e| ChatError::MalformedStoredCorpus(e.to_string()))?;
	let corpus = Corpus::from_lines(lines);
	if corpus.is_empty() {
		return Err(ChatError::MalformedStoredCorpus("no usable line".to_owned()));
	}
	Ok(corpus)
}

/// Restores the stored corpus, falling back to `default`.
///
/// - Missing file: `default`, no status
/// - Malformed content or read failure: `default` and a status message for the user
///
/// Never fails.
pub fn restore_corpus<P: AsRef<Path>>(path: P, default: &[String]) -> (Corpus, Option<String>) {
	let path = path.as_ref();
	match load_corpus(path) {
		Ok(corpus) => {
			debug!("Restored {} corpus lines from {}", corpus.len(), path.display());
			(corpus, None)
		}
		Err(ChatError::Io(e)) if e.kind() == ErrorKind::NotFound => (Corpus::from_lines(default), None),
		Err(e) => {
			warn!("Ignoring stored corpus {}: {}", path.display(), e);
			let status = "Treino salvo inválido. Usando o corpus padrão.".to_owned();
			(Corpus::from_lines(default), Some(status))
		}
	}
}
