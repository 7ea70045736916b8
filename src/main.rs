use std::sync::Arc;

use tracing::{error, info, Level};

use lp_aprs::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::fetch_and_update_lps_apr,
    provider::HTTP,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level({
            #[cfg(debug_assertions)]
            {
                Level::DEBUG
            }

            #[cfg(not(debug_assertions))]
            {
                Level::INFO
            }
        })
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match init() {
        Ok(config) => config,
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let http = HTTP::new(&config)?;
    let state = State::new(config, Arc::new(http));
    let app_state = AppState::new(state);

    fetch_and_update_lps_apr(app_state).await?;
    info!("LP APRs updated");

    Ok(())
}

fn init() -> Result<Config, Error> {
    set_configuration()?;
    let config = get_configuration()?;
    Ok(config)
}
