use std::{str::FromStr as _, sync::Arc};

use bigdecimal::{BigDecimal, Zero as _};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tokio::task::JoinSet;
use tracing::error;

use crate::{
    configuration::ChainEndpoints,
    error::Error,
    helpers::{pow, round_half_up},
    provider::{get_block_from_timestamp, request_as, Subgraph},
    types::{AprMap, FarmConfig, VirtualPriceResponse},
};

const APR_DECIMALS: i64 = 5;

const DAYS_IN_A_YEAR: u32 = 365;

const VIRTUAL_PRICE_QUERY: &str = r#"query virtualPriceStableSwap($stableSwapAddress: String, $blockDayAgo: Int!) {
  virtualPriceAtLatestBlock: pair(id: $stableSwapAddress) {
    virtualPrice
  }
  virtualPriceOneDayAgo: pair(id: $stableSwapAddress, block: { number: $blockDayAgo }) {
    virtualPrice
  }
}"#;

/// Stable farm APRs, one concurrent lookup per farm. Individual farm
/// failures yield 0; only a crashed lookup task fails the batch.
pub async fn get_aprs_for_stable_farms(
    subgraph: Arc<dyn Subgraph>,
    endpoints: ChainEndpoints,
    farms: Vec<FarmConfig>,
    now: DateTime<Utc>,
) -> Result<AprMap, Error> {
    let endpoints = Arc::new(endpoints);
    let mut set = JoinSet::new();

    for farm in farms {
        let subgraph = subgraph.clone();
        let endpoints = endpoints.clone();
        set.spawn(async move {
            let apr = get_apr_for_stable_farm(
                subgraph.as_ref(),
                &endpoints,
                &farm,
                now,
            )
            .await;
            (farm.lp_address.to_lowercase(), round_half_up(&apr, APR_DECIMALS))
        });
    }

    let mut aprs = AprMap::new();
    while let Some(result) = set.join_next().await {
        let (address, apr) = result?;
        aprs.insert(address, apr);
    }

    Ok(aprs)
}

/// Unrounded APR of one stable farm, 0 when anything goes wrong.
pub async fn get_apr_for_stable_farm(
    subgraph: &dyn Subgraph,
    endpoints: &ChainEndpoints,
    farm: &FarmConfig,
    now: DateTime<Utc>,
) -> BigDecimal {
    match fetch_stable_farm_apr(subgraph, endpoints, farm, now).await {
        Ok(apr) => apr,
        Err(e) => {
            error!(
                "Chain {}: stable farm {} APR failed: {}",
                endpoints.chain_id,
                farm.label(),
                e
            );
            BigDecimal::zero()
        },
    }
}

async fn fetch_stable_farm_apr(
    subgraph: &dyn Subgraph,
    endpoints: &ChainEndpoints,
    farm: &FarmConfig,
    now: DateTime<Utc>,
) -> Result<BigDecimal, Error> {
    let stable_swap_address = farm
        .stable_swap()
        .ok_or(Error::FieldNotExist(String::from("stableSwapAddress")))?
        .to_lowercase();
    let endpoint = endpoints.stable_swap()?;

    let day_ago = (now - Duration::days(1)).timestamp();
    let block_day_ago =
        get_block_from_timestamp(subgraph, endpoints, day_ago).await?;

    let response: VirtualPriceResponse = request_as(
        subgraph,
        endpoint,
        "virtualPriceStableSwap",
        VIRTUAL_PRICE_QUERY,
        json!({
            "stableSwapAddress": stable_swap_address,
            "blockDayAgo": block_day_ago,
        }),
    )
    .await?;

    let latest = response
        .virtual_price_at_latest_block
        .and_then(|p| p.virtual_price)
        .ok_or(Error::FieldNotExist(String::from(
            "virtualPriceAtLatestBlock",
        )))?;
    let day_ago = response
        .virtual_price_one_day_ago
        .and_then(|p| p.virtual_price)
        .ok_or(Error::FieldNotExist(String::from("virtualPriceOneDayAgo")))?;

    compute_stable_apr(
        &BigDecimal::from_str(&latest)?,
        &BigDecimal::from_str(&day_ago)?,
    )
}

/// `(latest / day_ago) ^ 365 - 1`
pub fn compute_stable_apr(
    latest: &BigDecimal,
    day_ago: &BigDecimal,
) -> Result<BigDecimal, Error> {
    if *day_ago <= BigDecimal::zero() {
        return Err(Error::Subgraph(format!(
            "invalid virtual price one day ago: {}",
            day_ago
        )));
    }

    let ratio = latest / day_ago;
    let apr = pow(&ratio, DAYS_IN_A_YEAR) - BigDecimal::from(1);

    Ok(apr)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use serde_json::Value;

    use super::*;
    use crate::{
        provider::mock::{endpoints, MockSubgraph},
        types::Token,
    };

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn stable_farm(lp_address: &str, stable_swap_address: &str) -> FarmConfig {
        let token = Token {
            symbol: String::from("USDT"),
            address: String::from("0x55d398326f99059ff775485246999027b3197955"),
            decimals: 18,
        };

        FarmConfig {
            pid: Some(104),
            lp_symbol: Some(String::from("USDT-BUSD SS LP")),
            lp_address: lp_address.to_owned(),
            stable_swap_address: Some(stable_swap_address.to_owned()),
            token: token.clone(),
            quote_token: token,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn responder(
        prices: Value,
    ) -> impl Fn(&str, &str, &Value) -> Result<Value, Error> + Send + Sync
    {
        move |endpoint: &str, query: &str, variables: &Value| {
            if query.contains("blocks(") {
                assert_eq!(endpoint, "https://blocks.example.org");
                assert_eq!(
                    variables["timestampGreater"],
                    json!(now().timestamp() - 86_400)
                );
                return Ok(json!({ "blocks": [{ "number": "36000000" }] }));
            }

            assert_eq!(endpoint, "https://stable.example.org");
            assert_eq!(variables["blockDayAgo"], json!(36_000_000));
            let address = variables["stableSwapAddress"].as_str().unwrap();
            match prices.get(address) {
                Some(value) => Ok(value.clone()),
                None => {
                    Err(Error::Subgraph(format!("unknown pair {}", address)))
                },
            }
        }
    }

    #[test]
    fn test_compute_stable_apr() {
        let apr = compute_stable_apr(&dec("1.02"), &dec("1.01")).unwrap();
        assert_eq!(round_half_up(&apr, 5), dec("35.45535"));

        let apr = compute_stable_apr(&dec("1.01"), &dec("1.01")).unwrap();
        assert_eq!(round_half_up(&apr, 5), BigDecimal::zero());

        assert!(compute_stable_apr(&dec("1.01"), &BigDecimal::zero()).is_err());
    }

    #[tokio::test]
    async fn test_stable_farm_apr() {
        let subgraph = MockSubgraph::new(responder(json!({
            "0xswap": {
                "virtualPriceAtLatestBlock": { "virtualPrice": "1.02" },
                "virtualPriceOneDayAgo": { "virtualPrice": "1.01" },
            }
        })));

        let apr = get_apr_for_stable_farm(
            &subgraph,
            &endpoints(),
            &stable_farm("0xLP", "0xSWAP"),
            now(),
        )
        .await;
        assert_eq!(round_half_up(&apr, 5), dec("35.45535"));
    }

    #[tokio::test]
    async fn test_stable_farm_failure_is_zero() {
        let subgraph = MockSubgraph::new(responder(json!({
            "0xnoprice": {
                "virtualPriceAtLatestBlock": { "virtualPrice": "1.02" },
                "virtualPriceOneDayAgo": null,
            }
        })));

        let missing_price = get_apr_for_stable_farm(
            &subgraph,
            &endpoints(),
            &stable_farm("0xa", "0xnoprice"),
            now(),
        )
        .await;
        assert_eq!(missing_price, BigDecimal::zero());

        let request_error = get_apr_for_stable_farm(
            &subgraph,
            &endpoints(),
            &stable_farm("0xb", "0xunknown"),
            now(),
        )
        .await;
        assert_eq!(request_error, BigDecimal::zero());

        let mut no_endpoint = endpoints();
        no_endpoint.stable_swap = None;
        let missing_endpoint = get_apr_for_stable_farm(
            &subgraph,
            &no_endpoint,
            &stable_farm("0xc", "0xswap"),
            now(),
        )
        .await;
        assert_eq!(missing_endpoint, BigDecimal::zero());
    }

    #[tokio::test]
    async fn test_stable_farms_batch() {
        let prices = json!({
            "0xswap1": {
                "virtualPriceAtLatestBlock": { "virtualPrice": "1.02" },
                "virtualPriceOneDayAgo": { "virtualPrice": "1.01" },
            },
            "0xswap2": {
                "virtualPriceAtLatestBlock": { "virtualPrice": "1.0001" },
                "virtualPriceOneDayAgo": { "virtualPrice": "1" },
            }
        });
        let subgraph = Arc::new(MockSubgraph::new(responder(prices)));

        let farms = vec![
            stable_farm("0xLP1", "0xswap1"),
            stable_farm("0xLP2", "0xswap2"),
            stable_farm("0xLP3", "0xswap3"),
        ];

        let aprs = get_aprs_for_stable_farms(
            subgraph.clone(),
            endpoints(),
            farms,
            now(),
        )
        .await
        .unwrap();

        assert_eq!(aprs.len(), 3);
        assert!(subgraph.max_in_flight() > 1);
        assert_eq!(aprs["0xlp1"], dec("35.45535"));
        assert_eq!(aprs["0xlp2"], dec("0.03717"));
        assert_eq!(aprs["0xlp3"], BigDecimal::zero());
    }
}
