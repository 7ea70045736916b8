use std::{collections::HashMap, str::FromStr as _};

use bigdecimal::{BigDecimal, Zero as _};
use serde_json::json;
use tracing::info;

use crate::{
    configuration::ChainEndpoints,
    error::Error,
    helpers::round_half_up,
    provider::{request_as, Subgraph},
    types::{AprMap, FarmsBulkResponse, SingleFarmSnapshot},
};

/// Addresses per subgraph request.
pub const FARM_GROUP_SIZE: usize = 30;

const APR_DECIMALS: i64 = 2;

const FARMS_BULK_QUERY: &str = r#"query farmsBulk($addresses: [String]!, $blockWeekAgo: Int!) {
  farmsAtLatestBlock: pairs(first: 30, where: { id_in: $addresses }) {
    id
    volumeUSD
    reserveUSD
  }
  farmsOneWeekAgo: pairs(first: 30, where: { id_in: $addresses }, block: { number: $blockWeekAgo }) {
    id
    volumeUSD
    reserveUSD
  }
}"#;

/// Share of the swap fee paid to LP holders, 0.25%.
fn lp_holders_fee() -> BigDecimal {
    BigDecimal::new(25_i64.into(), 4)
}

fn weeks_in_a_year() -> BigDecimal {
    BigDecimal::new(521_429_i64.into(), 4)
}

/// APRs for every address, fetched `FARM_GROUP_SIZE` at a time. Groups
/// are requested one after another.
pub async fn get_aprs_for_normal_farms(
    subgraph: &dyn Subgraph,
    endpoints: &ChainEndpoints,
    addresses: &[String],
    block_week_ago: u64,
) -> Result<AprMap, Error> {
    let mut aprs = AprMap::new();

    for (index, group) in addresses.chunks(FARM_GROUP_SIZE).enumerate() {
        info!(
            "Chain {}: fetching farm group {} ({} farms)",
            endpoints.chain_id,
            index + 1,
            group.len()
        );
        let group_aprs =
            get_aprs_for_farm_group(subgraph, endpoints, group, block_week_ago)
                .await?;
        aprs.extend(group_aprs);
    }

    Ok(aprs)
}

pub async fn get_aprs_for_farm_group(
    subgraph: &dyn Subgraph,
    endpoints: &ChainEndpoints,
    addresses: &[String],
    block_week_ago: u64,
) -> Result<AprMap, Error> {
    let response: FarmsBulkResponse = request_as(
        subgraph,
        &endpoints.info,
        "farmsBulk",
        FARMS_BULK_QUERY,
        json!({
            "addresses": addresses,
            "blockWeekAgo": block_week_ago,
        }),
    )
    .await?;

    compute_aprs(addresses, &response)
}

/// One entry per requested address; farms missing from either snapshot get 0.
pub fn compute_aprs(
    addresses: &[String],
    response: &FarmsBulkResponse,
) -> Result<AprMap, Error> {
    let latest = index_snapshots(&response.farms_at_latest_block);
    let week_ago = index_snapshots(&response.farms_one_week_ago);
    let mut aprs = AprMap::new();

    for address in addresses {
        let address = address.to_lowercase();
        let apr = match (latest.get(&address), week_ago.get(&address)) {
            (Some(latest), Some(week_ago)) => {
                compute_farm_apr(latest, week_ago)?
            },
            _ => BigDecimal::zero(),
        };
        aprs.insert(address, apr);
    }

    Ok(aprs)
}

pub fn compute_farm_apr(
    latest: &SingleFarmSnapshot,
    week_ago: &SingleFarmSnapshot,
) -> Result<BigDecimal, Error> {
    let volume_latest = BigDecimal::from_str(&latest.volume_usd)?;
    let volume_week_ago = BigDecimal::from_str(&week_ago.volume_usd)?;
    let reserve = BigDecimal::from_str(&latest.reserve_usd)?;

    let volume_7d = volume_latest - volume_week_ago;
    let lp_fees_7d = volume_7d * lp_holders_fee();
    let lp_fees_year = lp_fees_7d * weeks_in_a_year();

    if lp_fees_year <= BigDecimal::zero() || reserve <= BigDecimal::zero() {
        return Ok(BigDecimal::zero());
    }

    let apr = lp_fees_year * BigDecimal::from(100) / reserve;

    Ok(round_half_up(&apr, APR_DECIMALS))
}

fn index_snapshots(
    snapshots: &[SingleFarmSnapshot],
) -> HashMap<String, &SingleFarmSnapshot> {
    snapshots
        .iter()
        .map(|snapshot| (snapshot.id.to_lowercase(), snapshot))
        .collect()
}
