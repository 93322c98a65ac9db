use serde::{Deserialize, Serialize};

use crate::types::{Access, NftStaking};

/// Messages of the `nftstaking` module, tagged with their type URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum Msg {
    #[serde(rename = "/teritori.nftstaking.v1beta1.MsgRegisterNftStaking")]
    RegisterNftStaking {
        sender: String,
        nft_staking: NftStaking,
    },
    #[serde(rename = "/teritori.nftstaking.v1beta1.MsgSetAccessInfo")]
    SetAccessInfo { sender: String, access_info: Access },
}

impl Msg {
    pub fn register_nft_staking(sender: impl Into<String>, nft_staking: NftStaking) -> Self {
        Msg::RegisterNftStaking {
            sender: sender.into(),
            nft_staking,
        }
    }

    pub fn set_access_info(sender: impl Into<String>, access_info: Access) -> Self {
        Msg::SetAccessInfo {
            sender: sender.into(),
            access_info,
        }
    }

    pub fn type_url(&self) -> &'static str {
        match self {
            Msg::RegisterNftStaking { .. } => "/teritori.nftstaking.v1beta1.MsgRegisterNftStaking",
            Msg::SetAccessInfo { .. } => "/teritori.nftstaking.v1beta1.MsgSetAccessInfo",
        }
    }

    pub fn sender(&self) -> &str {
        match self {
            Msg::RegisterNftStaking { sender, .. } | Msg::SetAccessInfo { sender, .. } => sender,
        }
    }
}
