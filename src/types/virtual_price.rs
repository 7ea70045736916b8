use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualPriceResponse {
    pub virtual_price_at_latest_block: Option<VirtualPrice>,
    pub virtual_price_one_day_ago: Option<VirtualPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualPrice {
    pub virtual_price: Option<String>,
}
