use std::fmt;

use serde::{Deserialize, Serialize};

/// Separates server entries in a server-info blob.
pub const SERVER_SEPARATOR: &str = ",";
/// Separates a server identifier from its channels inside one entry.
pub const CHANNEL_SEPARATOR: &str = "#";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftStaking {
    pub nft_identifier: String,
    pub nft_metadata: String,
    pub reward_address: String,
    pub reward_weight: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAccess {
    pub server: String,
    pub channels: Vec<String>,
}

impl ServerAccess {
    /// Parse one `server(#channel)*` entry.
    ///
    /// The first token is always the server, even when empty. An entry with
    /// no `#` has no channels. Duplicate channels are kept in order.
    pub fn parse(entry: &str) -> Self {
        let mut tokens = entry.split(CHANNEL_SEPARATOR);
        let server = tokens.next().unwrap_or_default().to_string();
        ServerAccess {
            server,
            channels: tokens.map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for ServerAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.server)?;
        for channel in &self.channels {
            write!(f, "{CHANNEL_SEPARATOR}{channel}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub address: String,
    pub servers: Vec<ServerAccess>,
}

/// Split a server-info blob (`entry(,entry)*`) into its entries.
///
/// Never fails and never returns an empty list: `""` yields one entry with
/// an empty server and no channels, and `",,"` yields three such entries.
pub fn parse_server_info(blob: &str) -> Vec<ServerAccess> {
    blob.split(SERVER_SEPARATOR).map(ServerAccess::parse).collect()
}

/// Inverse of [`parse_server_info`].
pub fn format_server_info(servers: &[ServerAccess]) -> String {
    servers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(SERVER_SEPARATOR)
}
