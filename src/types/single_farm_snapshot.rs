use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SingleFarmSnapshot {
    pub id: String,
    #[serde(rename = "reserveUSD")]
    pub reserve_usd: String,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmsBulkResponse {
    #[serde(default)]
    pub farms_at_latest_block: Vec<SingleFarmSnapshot>,
    #[serde(default)]
    pub farms_one_week_ago: Vec<SingleFarmSnapshot>,
}
