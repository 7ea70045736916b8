use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FarmConfig {
    pub pid: Option<u32>,
    #[serde(default)]
    pub lp_symbol: Option<String>,
    pub lp_address: String,
    #[serde(default)]
    pub stable_swap_address: Option<String>,
    pub token: Token,
    pub quote_token: Token,
}

impl FarmConfig {
    /// Stable-swap address, if one is set and non-empty.
    pub fn stable_swap(&self) -> Option<&str> {
        self.stable_swap_address
            .as_deref()
            .filter(|address| !address.trim().is_empty())
    }

    pub fn label(&self) -> &str {
        self.lp_symbol.as_deref().unwrap_or(&self.lp_address)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
}
