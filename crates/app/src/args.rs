use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use services::QuestionSourceConfig;
use simplelog::LevelFilter;

const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
const DEFAULT_LOG_FILE: &str = "quiz.log";
const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidTimeout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    History,
    ClearHistory,
    Help,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "history" => Some(Self::History),
            "clear-history" => Some(Self::ClearHistory),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Where the history ledger lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Store {
    Sqlite(String),
    Memory,
}

#[derive(Debug)]
pub struct Args {
    pub command: Command,
    pub store: Store,
    pub questions: QuestionSourceConfig,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [play]        [--db <sqlite_url> | --memory] [--questions-url <url>] [--timeout <secs>]");
    eprintln!("  quiz history       [--db <sqlite_url>]");
    eprintln!("  quiz clear-history [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  no --questions-url: built-in offline questions");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS_URL, QUIZ_HTTP_TIMEOUT_SECS, QUIZ_LOG_FILE, QUIZ_LOG_LEVEL");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    /// Parse arguments on top of environment defaults.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown commands/flags or invalid values.
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter().peekable();

        let first = args.peek().cloned();
        let command = match first.as_deref() {
            None => Command::Play,
            Some("--help" | "-h") => Command::Help,
            Some(first) if first.starts_with("--") => Command::Play,
            Some(first) => {
                let command = Command::from_arg(first)
                    .ok_or_else(|| ArgsError::UnknownCommand(first.to_owned()))?;
                args.next();
                command
            }
        };

        let mut store = std::env::var("QUIZ_DB_URL")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map_or_else(|| Store::Sqlite(DEFAULT_DB_URL.into()), |raw| {
                Store::Sqlite(normalize_sqlite_url(raw))
            });
        let mut questions = QuestionSourceConfig::from_env();
        let log_file = std::env::var("QUIZ_LOG_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);
        let log_level = std::env::var("QUIZ_LOG_LEVEL")
            .ok()
            .and_then(|raw| raw.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    store = Store::Sqlite(normalize_sqlite_url(value));
                }
                "--memory" => store = Store::Memory,
                "--questions-url" => {
                    let value = require_value(&mut args, "--questions-url")?;
                    questions = questions.with_url(value);
                }
                "--timeout" => {
                    let value = require_value(&mut args, "--timeout")?;
                    let secs: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTimeout { raw: value.clone() })?;
                    questions.timeout = Duration::from_secs(secs);
                }
                "--help" | "-h" => {
                    return Ok(Self {
                        command: Command::Help,
                        store,
                        questions,
                        log_file,
                        log_level,
                    });
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            command,
            store,
            questions,
            log_file,
            log_level,
        })
    }
}

/// Accept `sqlite://…`, `sqlite:…`, `sqlite::memory:` or a bare file path and
/// return a `sqlite://` URL with an absolute path.
pub fn normalize_sqlite_url(raw: String) -> String {
    let raw = raw.trim();
    if raw == MEMORY_URL || raw.starts_with("sqlite://") {
        return raw.to_owned();
    }
    let path = PathBuf::from(raw.strip_prefix("sqlite:").unwrap_or(raw));
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir().map_or(path.clone(), |cwd| cwd.join(&path))
    };
    format!("sqlite://{}", path.display())
}

/// Directory part of a file-backed `sqlite://` URL.
fn sqlite_parent_dir(db_url: &str) -> Option<&Path> {
    let path = db_url.strip_prefix("sqlite://")?;
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    Path::new(path).parent().filter(|dir| !dir.as_os_str().is_empty())
}

/// Create the directory holding the database file; `SQLite` creates the file
/// itself but not missing directories.
///
/// # Errors
///
/// Returns the I/O error if the directory cannot be created.
pub fn ensure_db_dir(db_url: &str) -> std::io::Result<()> {
    match sqlite_parent_dir(db_url) {
        Some(dir) => std::fs::create_dir_all(dir),
        None => Ok(()),
    }
}
