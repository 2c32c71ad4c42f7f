use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use markov_chat_core::model::picker::{Picker, RngPicker};
use markov_chat_core::store::read_lines;
use markov_chat_core::{ChatBot, ChatConfig, Corpus};

const EXIT_WORDS: [&str; 3] = ["sair", "exit", "quit"];

/// Simple rule-based + Markov chain chatbot.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Sentences to train the model on.
	#[arg(long, num_args = 0..)]
	train: Vec<String>,

	/// Text file with one training sentence per line.
	#[arg(long)]
	train_file: Option<PathBuf>,

	/// Generate a single reply for this prompt.
	#[arg(long)]
	prompt: Option<String>,

	/// Start the interactive mode.
	#[arg(long)]
	interactive: bool,

	/// Maximum number of generated tokens per reply.
	#[arg(long)]
	max_tokens: Option<usize>,

	/// Fixed random seed for reproducible replies.
	#[arg(long)]
	seed: Option<u64>,

	/// TOML configuration file.
	#[arg(long)]
	config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
	let args = Args::parse();

	let mut config = match &args.config {
		Some(path) => ChatConfig::load(path)?,
		None => ChatConfig::default(),
	};
	if let Some(max_tokens) = args.max_tokens {
		config.max_tokens = max_tokens;
	}

	// Samples from the command line come first, then the file
	let mut samples = args.train.clone();
	if let Some(path) = &args.train_file {
		samples.extend(read_lines(path)?.lines().iter().cloned());
	}
	let corpus = Corpus::from_lines(samples);
	debug!("Training on {} lines", corpus.len());

	let bot = ChatBot::with_corpus(config, corpus)?;
	let mut picker: Box<dyn Picker> = match args.seed {
		Some(seed) => Box::new(RngPicker::seeded(seed)),
		None => Box::new(RngPicker::thread()),
	};

	if let Some(prompt) = &args.prompt {
		if let Some(reply) = bot.respond_with(prompt, picker.as_mut()) {
			println!("{}", reply.text);
		}
		return Ok(());
	}

	if args.interactive {
		let stdin = io::stdin();
		interactive_loop(&bot, stdin.lock(), io::stdout(), picker.as_mut())?;
		return Ok(());
	}

	println!("Nada a fazer. Use --interactive ou --prompt.");
	Ok(())
}

/// Reads messages until an exit word or the end of input.
///
/// Blank lines are skipped.
fn interactive_loop<R: BufRead, W: Write>(
	bot: &ChatBot,
	input: R,
	mut output: W,
	picker: &mut dyn Picker,
) -> io::Result<()> {
	writeln!(output, "Digite algo (ou 'sair' para encerrar):")?;
	write!(output, "> ")?;
	output.flush()?;

	for line in input.lines() {
		let line = line?;
		let message = line.trim();
		if EXIT_WORDS.contains(&message.to_lowercase().as_str()) {
			writeln!(output, "Encerrando. Até logo!")?;
			return Ok(());
		}
		if let Some(reply) = bot.respond_with(message, picker) {
			writeln!(output, "{}", reply.text)?;
		}
		write!(output, "> ")?;
		output.flush()?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run(bot: &ChatBot, input: &str) -> String {
		let mut output = Vec::new();
		interactive_loop(bot, input.as_bytes(), &mut output, &mut |_: usize| 0usize).unwrap();
		String::from_utf8(output).unwrap()
	}

	#[test]
	fn answers_until_exit_word() {
		let bot = ChatBot::with_corpus(ChatConfig::default(), Corpus::from_lines(["a b c."])).unwrap();
		let output = run(&bot, "oi\n\n  \na\nSAIR\na\n");

		assert!(output.contains("Olá, eu sou o JARViS. Em que posso ajudar?"));
		assert!(output.contains("b c."));
		assert!(output.ends_with("Encerrando. Até logo!\n"));
		assert_eq!(output.matches("b c.").count(), 1);
	}

	#[test]
	fn end_of_input_stops_quietly() {
		let bot = ChatBot::new(ChatConfig::default()).unwrap();
		let output = run(&bot, "");
		assert_eq!(output, "Digite algo (ou 'sair' para encerrar):\n> ");
	}

	#[test]
	fn arguments_parse() {
		let args = Args::parse_from(["markov-chat", "--train", "Olá mundo", "Como vai?", "--prompt", "olá", "--seed", "4"]);
		assert_eq!(args.train, ["Olá mundo", "Como vai?"]);
		assert_eq!(args.prompt.as_deref(), Some("olá"));
		assert_eq!(args.seed, Some(4));
		assert!(!args.interactive);
	}
}
