use std::fs;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use blinken_core::{
    DEFAULT_BUDGET, DecodeError, DeviceState, EncodeError, ErrorKind, Record, RecordFields,
    decode, decode_sparse, encode_sparse_to_vec, encode_to_vec,
};
use clap::{Parser, Subcommand};
use glob::glob;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BLINKEN_BUILD_COMMIT"),
    " ",
    env!("BLINKEN_BUILD_DATE"),
    ")"
);

const RANGE_HINT: &str = "channels take 0..=255, time takes 0..=2147483647 ms";

#[derive(Parser, Debug)]
#[command(name = "blinken")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Encode and decode blinken lighting-state messages (R/G/B/W channels + fade time).",
    long_about = None,
    after_help = "Examples:\n  blinken decode R255G0B10T1500\n  blinken encode --red 10 --time 300\n  blinken apply R10 G20T500 --pretty"
)]
struct Cli {
    /// Enable debug logging on stderr (overrides RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a message and print the record as JSON (unset fields omitted).
    Decode {
        /// Message text, e.g. R10G20T500
        #[arg(required_unless_present = "input")]
        message: Option<String>,

        /// Read the message bytes from a file (a glob must match exactly one file)
        #[arg(short = 'i', long, conflicts_with = "message")]
        input: Option<PathBuf>,

        /// Decode as a complete state: absent fields are zero instead of unset
        #[arg(long)]
        full: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Encode a record into a message.
    Encode {
        /// Red channel (0-255)
        #[arg(short = 'r', long)]
        red: Option<i64>,

        /// Green channel (0-255)
        #[arg(short = 'g', long)]
        green: Option<i64>,

        /// Blue channel (0-255)
        #[arg(short = 'b', long)]
        blue: Option<i64>,

        /// White channel (0-255)
        #[arg(short = 'w', long)]
        white: Option<i64>,

        /// Fade time in milliseconds
        #[arg(short = 't', long)]
        time: Option<i64>,

        /// Read field values from a JSON object; flags override its keys
        #[arg(long)]
        json: Option<PathBuf>,

        /// Emit all five fields (missing ones as 0) followed by the terminator
        #[arg(long)]
        full: bool,

        /// Maximum message size in bytes
        #[arg(long, default_value_t = DEFAULT_BUDGET)]
        budget: usize,

        /// Write the exact message bytes to stdout (no newline, terminator kept)
        #[arg(long)]
        raw: bool,
    },
    /// Apply messages in order to a zeroed device state and print the result.
    ///
    /// Rejected messages leave the state untouched and are logged as warnings.
    Apply {
        /// Messages to apply as sparse patches
        #[arg(required = true)]
        messages: Vec<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Exit with a non-zero code if any message was rejected
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            message,
            input,
            full,
            pretty,
        } => cmd_decode(message, input, full, pretty),
        Commands::Encode {
            red,
            green,
            blue,
            white,
            time,
            json,
            full,
            budget,
            raw,
        } => {
            let flags = RecordFields {
                red,
                green,
                blue,
                white,
                time,
            };
            cmd_encode(flags, json, full, budget, raw)
        }
        Commands::Apply {
            messages,
            pretty,
            strict,
        } => cmd_apply(messages, pretty, strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        let hint = match err.kind() {
            ErrorKind::Range => RANGE_HINT.to_string(),
            _ => "expected tag/digit pairs such as R10G20B30W40T500".to_string(),
        };
        CliError::new(format!("invalid message: {}", err), Some(hint))
    }
}

impl From<EncodeError> for CliError {
    fn from(err: EncodeError) -> Self {
        let hint = match err.kind() {
            ErrorKind::BufferTooSmall => "raise --budget".to_string(),
            _ => RANGE_HINT.to_string(),
        };
        CliError::new(format!("encode failed: {}", err), Some(hint))
    }
}

fn cmd_decode(
    message: Option<String>,
    input: Option<PathBuf>,
    full: bool,
    pretty: bool,
) -> Result<(), CliError> {
    let bytes = match (message, input) {
        (Some(message), _) => message.into_bytes(),
        (None, Some(input)) => read_message_file(&input)?,
        (None, None) => {
            return Err(CliError::new(
                "missing message",
                Some("pass a message or use -i/--input".to_string()),
            ));
        }
    };

    let record = if full {
        decode(&bytes)?
    } else {
        decode_sparse(&bytes)?
    };
    debug!(?record, "decoded");
    println!("{}", serialize_fields(&record, pretty)?);
    Ok(())
}

fn cmd_encode(
    flags: RecordFields,
    json: Option<PathBuf>,
    full: bool,
    budget: usize,
    raw: bool,
) -> Result<(), CliError> {
    let mut fields = match json {
        Some(path) => read_fields_file(&path)?,
        None => RecordFields::default(),
    };
    fields.merge(&flags);

    let patch = Record::try_from(fields)
        .map_err(|err| CliError::new(err.to_string(), Some(RANGE_HINT.to_string())))?;
    let bytes = if full {
        let mut record = Record::zeroed();
        record.apply(&patch);
        encode_to_vec(&record, budget)?
    } else {
        if !patch.is_set() {
            warn!("no fields set, message is empty");
        }
        encode_sparse_to_vec(&patch, budget)?
    };
    debug!(len = bytes.len(), budget, "encoded");

    let mut stdout = std::io::stdout().lock();
    if raw {
        stdout
            .write_all(&bytes)
            .context("Failed to write message")?;
    } else {
        let text = bytes
            .strip_suffix(&[blinken_core::TERMINATOR])
            .unwrap_or(&bytes[..]);
        stdout.write_all(text).context("Failed to write message")?;
        stdout.write_all(b"\n").context("Failed to write message")?;
    }
    Ok(())
}

fn cmd_apply(messages: Vec<String>, pretty: bool, strict: bool) -> Result<(), CliError> {
    let mut state = DeviceState::new();
    let mut rejected = 0usize;

    for (index, message) in messages.iter().enumerate() {
        if let Err(err) = state.apply_message(message.as_bytes()) {
            rejected += 1;
            warn!(index = index + 1, input = %message, error = %err, "rejected message");
        }
    }

    println!("{}", serialize_fields(state.current(), pretty)?);
    if strict && rejected > 0 {
        return Err(CliError::new(
            format!("{} of {} messages rejected", rejected, messages.len()),
            Some("messages are applied whole or not at all".to_string()),
        ));
    }
    Ok(())
}

fn serialize_fields(record: &Record, pretty: bool) -> Result<String, CliError> {
    let fields = RecordFields::from(record);
    if pretty {
        serde_json::to_string_pretty(&fields)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(&fields)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn read_fields_file(path: &PathBuf) -> Result<RecordFields, CliError> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            format!("invalid JSON in {}: {}", path.display(), err),
            Some("expected an object with keys red, green, blue, white, time".to_string()),
        )
    })
}

/// Reads a message file, dropping one trailing line ending.
fn read_message_file(input: &PathBuf) -> Result<Vec<u8>, CliError> {
    let resolved = resolve_input_path(input)?;
    if !resolved.is_file() {
        return Err(CliError::new(
            format!("input file not found: {}", resolved.display()),
            Some("pass the path of a file holding one message".to_string()),
        ));
    }
    let mut bytes = fs::read(&resolved)
        .with_context(|| format!("Failed to read input file: {}", resolved.display()))?;
    if bytes.ends_with(b"\n") {
        bytes.pop();
        if bytes.ends_with(b"\r") {
            bytes.pop();
        }
    }
    Ok(bytes)
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single message file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
