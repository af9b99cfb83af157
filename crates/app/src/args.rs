use std::fmt;
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidPath { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidPath { flag, raw } => write!(f, "invalid {flag} path: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [endless]   [--catalog <path>] [--seed <n>] [--no-demo-history]");
    eprintln!("  cargo run -p app -- competition [--catalog <path>] [--seed <n>] [--no-demo-history]");
    eprintln!("                                  [--duration <secs>] [--problems <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  built-in catalog, random seed, demo solve history");
    eprintln!("  competition: --duration 16200 (4.5 hours) --problems 3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRAINER_CATALOG, TRAINER_SEED, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Endless,
    Competition,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "endless" => Some(Self::Endless),
            "competition" => Some(Self::Competition),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub catalog: Option<PathBuf>,
    pub seed: Option<u64>,
    pub duration_secs: Option<u32>,
    pub problem_count: Option<usize>,
    pub demo_history: bool,
}

/// `None` means `--help` was requested.
pub type Parsed = Option<Args>;

impl Args {
    /// Parse `argv` (without the program name), falling back to the
    /// `TRAINER_*` environment for anything not given as a flag.
    pub fn parse(argv: Vec<String>) -> Result<Parsed, ArgsError> {
        Self::parse_with_env(argv, |key| std::env::var(key).ok())
    }

    fn parse_with_env(
        argv: Vec<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Parsed, ArgsError> {
        let mut iter = argv.into_iter().peekable();

        // No subcommand means endless mode.
        let command = match iter.peek().map(String::as_str) {
            None => Command::Endless,
            Some(first) if first.starts_with('-') => Command::Endless,
            Some(first) => {
                let command = Command::from_arg(first)
                    .ok_or_else(|| ArgsError::UnknownCommand(first.to_owned()))?;
                iter.next();
                command
            }
        };

        let mut args = Self {
            command,
            catalog: env("TRAINER_CATALOG")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            seed: env("TRAINER_SEED")
                .map(|value| parse_number(value, "TRAINER_SEED"))
                .transpose()?,
            duration_secs: None,
            problem_count: None,
            demo_history: true,
        };

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--catalog" => {
                    let value = require_value(&mut iter, "--catalog")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidPath {
                            flag: "--catalog",
                            raw: value,
                        });
                    }
                    args.catalog = Some(PathBuf::from(value));
                }
                "--seed" => {
                    let value = require_value(&mut iter, "--seed")?;
                    args.seed = Some(parse_number(value, "--seed")?);
                }
                "--duration" => {
                    let value = require_value(&mut iter, "--duration")?;
                    args.duration_secs = Some(parse_number(value, "--duration")?);
                }
                "--problems" => {
                    let value = require_value(&mut iter, "--problems")?;
                    args.problem_count = Some(parse_number(value, "--problems")?);
                }
                "--no-demo-history" => args.demo_history = false,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(args))
    }
}
