use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BlocksResponse {
    #[serde(default)]
    pub blocks: Vec<BlockValue>,
}

#[derive(Debug, Deserialize)]
pub struct BlockValue {
    pub number: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}
