use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by the node client. Never retried locally.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid node address '{node}': {reason}")]
    InvalidNode { node: String, reason: String },
    #[error("failed to connect to node {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("node request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to encode request: {0}")]
    Encode(serde_json::Error),
    #[error("node returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("node returned JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("tx {hash} rejected with code {code}: {log}")]
    Rejected { hash: String, code: u32, log: String },
    #[error("malformed node response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("keyring database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to create keyring directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("key '{0}' already exists")]
    AlreadyExists(String),
    #[error("key '{0}' not found")]
    NotFound(String),
    #[error("'{address}' is not a valid {prefix} address")]
    InvalidAddress { address: String, prefix: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(serde_json::Error),
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    /// A flag value could not be converted to its declared type.
    #[error("{0}")]
    Parameter(clap::Error),
    /// Wrong number of positional arguments.
    #[error("{0}")]
    ArgumentCount(clap::Error),
    /// Any other command-line usage failure (missing flag, unknown subcommand, help).
    #[error("{0}")]
    Usage(clap::Error),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("failed to resolve signer: {0}")]
    Context(String),
    #[error(transparent)]
    Keyring(#[from] KeyringError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Print the error and terminate the process.
    ///
    /// Help and version requests arrive here as `Usage` and exit 0.
    pub fn exit(self) -> ! {
        match self {
            CliError::Parameter(err) | CliError::ArgumentCount(err) | CliError::Usage(err) => {
                let _ = err.print();
                std::process::exit(if err.use_stderr() { 1 } else { 0 })
            }
            other => {
                eprintln!("Error: {other}");
                std::process::exit(1)
            }
        }
    }
}
