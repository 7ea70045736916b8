use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::{lp_apr, stable_apr},
    helpers::{lp_addresses, partition_farms},
    provider::get_block_from_timestamp,
    types::AprMap,
};

/// Updates the APR file of every supported chain and waits for all of them.
pub async fn fetch_and_update_lps_apr(
    app_state: AppState<State>,
) -> Result<(), Error> {
    let now = Utc::now();
    let mut set = JoinSet::new();

    for chain_id in app_state.config.supported_chains.iter().copied() {
        let app_state = app_state.clone();
        set.spawn(async move {
            (chain_id, update_lps_apr(app_state, chain_id, now).await)
        });
    }

    let mut failed = Vec::new();

    while let Some(result) = set.join_next().await {
        let (chain_id, result) = result?;
        if let Err(e) = result {
            error!("Chain {}: LP APR update failed: {}", chain_id, e);
            failed.push(chain_id);
        }
    }

    if !failed.is_empty() {
        failed.sort_unstable();
        return Err(Error::TaskError(format!(
            "LP APR update failed for chains {:?}",
            failed
        )));
    }

    Ok(())
}

pub async fn update_lps_apr(
    app_state: AppState<State>,
    chain_id: u64,
    now: DateTime<Utc>,
) -> Result<PathBuf, Error> {
    let aprs = compute_lps_apr(&app_state, chain_id, now).await?;
    app_state.apr_file.write(chain_id, &aprs).await
}

pub async fn compute_lps_apr(
    app_state: &AppState<State>,
    chain_id: u64,
    now: DateTime<Utc>,
) -> Result<AprMap, Error> {
    let farms = app_state
        .farms
        .load(chain_id)
        .into_iter()
        .filter(|farm| farm.pid.is_some())
        .collect();
    let (normal, stable) = partition_farms(farms);

    info!(
        "Chain {}: {} normal farms, {} stable farms",
        chain_id,
        normal.len(),
        stable.len()
    );

    let mut aprs = AprMap::new();

    if normal.is_empty() && stable.is_empty() {
        return Ok(aprs);
    }

    let endpoints = app_state.config.get_endpoints(chain_id)?;
    let subgraph = app_state.subgraph.as_ref();

    if !normal.is_empty() {
        let week_ago = (now - Duration::weeks(1)).timestamp();
        let block_week_ago =
            get_block_from_timestamp(subgraph, endpoints, week_ago).await?;
        let addresses = lp_addresses(&normal);

        let normal_aprs = lp_apr::get_aprs_for_normal_farms(
            subgraph,
            endpoints,
            &addresses,
            block_week_ago,
        )
        .await?;
        aprs.extend(normal_aprs);
    }

    if !stable.is_empty() {
        match stable_apr::get_aprs_for_stable_farms(
            app_state.subgraph.clone(),
            endpoints.clone(),
            stable,
            now,
        )
        .await
        {
            Ok(stable_aprs) => aprs.extend(stable_aprs),
            Err(e) => {
                error!("Chain {}: stable farms APR failed: {}", chain_id, e)
            },
        }
    }

    Ok(aprs)
}
