// Wallet data models
// Feature: Credits Wallet (004-credits-wallet)

use serde::{Deserialize, Serialize};

/// Credit balance for a workspace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    /// Credits currently spendable
    #[serde(default)]
    pub available_credits: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_credits: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_credits: Option<u64>,
}
