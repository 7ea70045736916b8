use serde_json::json;

use crate::{
    configuration::ChainEndpoints,
    error::Error,
    provider::{request_as, Subgraph},
    types::BlocksResponse,
};

/// Width in seconds of the window searched after a timestamp.
const BLOCK_WINDOW: i64 = 600;

const BLOCKS_QUERY: &str = r#"query blocks($timestampGreater: Int!, $timestampLower: Int!) {
  blocks(
    first: 1
    orderBy: timestamp
    orderDirection: asc
    where: { timestamp_gt: $timestampGreater, timestamp_lt: $timestampLower }
  ) {
    number
    timestamp
  }
}"#;

/// First block mined within `BLOCK_WINDOW` seconds after `timestamp`.
pub async fn get_block_from_timestamp(
    subgraph: &dyn Subgraph,
    endpoints: &ChainEndpoints,
    timestamp: i64,
) -> Result<u64, Error> {
    let endpoint = endpoints.blocks()?;
    let response: BlocksResponse = request_as(
        subgraph,
        endpoint,
        "blocks",
        BLOCKS_QUERY,
        json!({
            "timestampGreater": timestamp,
            "timestampLower": timestamp + BLOCK_WINDOW,
        }),
    )
    .await?;

    let block = response
        .blocks
        .first()
        .ok_or(Error::BlockNotFound(timestamp))?;
    let number: u64 = block.number.parse()?;

    Ok(number)
}
