use std::env;
use std::path::PathBuf;
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use markov_chat_core::model::picker::RngPicker;
use markov_chat_core::store::{restore_corpus, save_corpus};
use markov_chat_core::{ChatBot, ChatConfig, ChatError, Corpus};

const DEFAULT_ADDRESS: &str = "127.0.0.1:5000";
const DEFAULT_DATA_DIR: &str = "./data";
const CORPUS_FILE: &str = "corpus.bin";

/// Server settings read from the environment.
///
/// - `MARKOV_CHAT_ADDR`: bind address (default `127.0.0.1:5000`)
/// - `MARKOV_CHAT_DATA`: directory holding the stored corpus (default `./data`)
/// - `MARKOV_CHAT_CONFIG`: optional TOML file with the bot settings
struct ServerSettings {
	address: String,
	data_dir: PathBuf,
	config_path: Option<PathBuf>,
}

impl ServerSettings {
	fn from_env() -> Self {
		Self {
			address: env::var("MARKOV_CHAT_ADDR").unwrap_or_else(|_| DEFAULT_ADDRESS.to_owned()),
			data_dir: env::var("MARKOV_CHAT_DATA")
				.map(PathBuf::from)
				.unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
			config_path: env::var("MARKOV_CHAT_CONFIG").ok().map(PathBuf::from),
		}
	}
}

/// Query parameters of the `/v1/respond` endpoint
#[derive(Deserialize)]
struct RespondParams {
	prompt: Option<String>,
	max_tokens: Option<usize>,
	seed: Option<u64>, // fixed seed for reproducible replies
}

#[derive(Serialize)]
struct Stats {
	lines: usize,
	keys: usize,
	transitions: usize,
}

struct SharedData {
	bot: ChatBot,
	corpus_path: PathBuf,
}

impl SharedData {
	/// Builds the bot from the stored corpus.
	///
	/// A missing or malformed store falls back to the default corpus.
	fn restore(config: ChatConfig, data_dir: PathBuf) -> Result<Self, ChatError> {
		let corpus_path = data_dir.join(CORPUS_FILE);
		let (corpus, status) = restore_corpus(&corpus_path, &config.default_corpus);
		if let Some(status) = status {
			warn!("{status}");
		}
		let bot = ChatBot::with_corpus(config, corpus)?;
		info!("Chat bot ready with {} corpus lines", bot.corpus().len());
		Ok(Self { bot, corpus_path })
	}
}

/// HTTP GET endpoint `/v1/respond`
///
/// Answers one message: a canned rule reply if a trigger matches,
/// a generated continuation otherwise.
#[get("/v1/respond")]
async fn get_response(data: web::Data<RwLock<SharedData>>, query: web::Query<RespondParams>) -> impl Responder {
	let prompt = match query.prompt.as_deref().map(str::trim) {
		Some(s) if !s.is_empty() => s,
		_ => return HttpResponse::BadRequest().body("Missing or empty prompt"),
	};

	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Chat lock failed"),
	};

	let max_tokens = query.max_tokens.unwrap_or(shared_data.bot.config().max_tokens);
	if max_tokens == 0 {
		return HttpResponse::BadRequest().body("max_tokens must be >= 1");
	}

	let reply = match query.seed {
		Some(seed) => shared_data.bot.respond_bounded(prompt, max_tokens, &mut RngPicker::seeded(seed)),
		None => shared_data.bot.respond_bounded(prompt, max_tokens, &mut RngPicker::thread()),
	};

	match reply {
		Some(reply) => HttpResponse::Ok().body(reply.text),
		None => HttpResponse::BadRequest().body("Missing or empty prompt"),
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// The body is the raw training text, one example per line. Blank text
/// trains on the default corpus. The table is built before the write lock
/// is taken, so replies keep using the previous table until the swap.
#[put("/v1/train")]
async fn put_training(data: web::Data<RwLock<SharedData>>, body: String) -> impl Responder {
	let corpus = Corpus::from_text(&body);

	let prepared = match data.read() {
		Ok(shared_data) => shared_data.bot.prepare(corpus),
		Err(_) => return HttpResponse::InternalServerError().body("Chat lock failed"),
	};
	let (corpus, table) = match prepared {
		Ok(p) => p,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to train: {e}")),
	};

	let mut shared_data = match data.write() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Chat lock failed"),
	};
	if let Err(e) = save_corpus(&shared_data.corpus_path, &corpus) {
		warn!("Failed to store corpus: {e}");
	}
	let status = shared_data.bot.replace(corpus, table).to_owned();

	HttpResponse::Ok().body(status)
}

#[get("/v1/corpus")]
async fn get_corpus(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Chat lock failed"),
	};
	HttpResponse::Ok().body(shared_data.bot.corpus().lines().join("\n"))
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Chat lock failed"),
	};
	let table = shared_data.bot.table();
	HttpResponse::Ok().json(Stats {
		lines: shared_data.bot.corpus().len(),
		keys: table.len(),
		transitions: table.transition_count(),
	})
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_response)
		.service(put_training)
		.service(get_corpus)
		.service(get_stats);
}

/// Main entry point for the server.
///
/// Restores the stored corpus, wraps the bot in a `RwLock` and starts an
/// Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let settings = ServerSettings::from_env();
	let config = match &settings.config_path {
		Some(path) => ChatConfig::load(path).map_err(std::io::Error::other)?,
		None => ChatConfig::default(),
	};
	let shared_data = SharedData::restore(config, settings.data_dir).map_err(std::io::Error::other)?;
	let shared_data = web::Data::new(RwLock::new(shared_data));

	info!("Listening on {}", settings.address);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(configure)
	})
		.bind(settings.address.as_str())?
		.run()
		.await
}
