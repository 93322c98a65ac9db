use std::fmt::{self, Display, Formatter};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::keyring::KeyRecord;
use crate::tx::TxOutput;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything a command can print on success.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Tx(TxOutput),
    Key(KeyRecord),
    Keys(Vec<KeyRecord>),
    KeyDeleted { deleted: String },
    Config(ClientConfig),
    ConfigUpdated { key: String, value: String },
}

impl CommandOutput {
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self),
            OutputFormat::Text => Ok(self.to_string()),
        }
    }
}

impl Display for CommandOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::Tx(output) => write!(f, "{output}"),
            CommandOutput::Key(key) => write_key(f, key),
            CommandOutput::Keys(keys) => {
                if keys.is_empty() {
                    return write!(f, "No keys found");
                }
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "- {}: {}", key.name, key.address)?;
                }
                Ok(())
            }
            CommandOutput::KeyDeleted { deleted } => write!(f, "Key '{deleted}' deleted"),
            CommandOutput::Config(config) => {
                writeln!(f, "chain-id: {}", config.chain_id)?;
                writeln!(f, "node: {}", config.node)?;
                writeln!(f, "broadcast-mode: {}", config.broadcast_mode)?;
                writeln!(f, "output: {}", config.output)?;
                writeln!(f, "bech32-prefix: {}", config.bech32_prefix)?;
                write!(f, "gas: {}", config.gas)
            }
            CommandOutput::ConfigUpdated { key, value } => write!(f, "{key} set to {value}"),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

fn write_key(f: &mut Formatter<'_>, key: &KeyRecord) -> fmt::Result {
    writeln!(f, "name: {}", key.name)?;
    writeln!(f, "address: {}", key.address)?;
    write!(f, "created_at: {}", key.created_at.to_rfc3339())
}
