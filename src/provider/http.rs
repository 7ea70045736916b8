use std::time::Duration;

use async_trait::async_trait;
use graphql_client::{QueryBody, Response};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::{
    configuration::Config,
    error::{self, Error},
    provider::Subgraph,
};

#[derive(Debug)]
pub struct HTTP {
    pub http: Client,
}

impl HTTP {
    pub fn new(config: &Config) -> Result<HTTP, Error> {
        let http = match Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                return Err(error::Error::ReqwestError(e));
            },
        };

        Ok(HTTP { http })
    }
}

#[async_trait]
impl Subgraph for HTTP {
    async fn request(
        &self,
        endpoint: &str,
        body: QueryBody<Value>,
    ) -> Result<Value, Error> {
        debug!("POST {} {}", endpoint, body.operation_name);

        let response = self
            .http
            .post(endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<Response<Value>>()
            .await?;

        into_data(response, endpoint)
    }
}

fn into_data(
    response: Response<Value>,
    endpoint: &str,
) -> Result<Value, Error> {
    if let Some(errors) = response.errors {
        if !errors.is_empty() {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<String>>()
                .join("; ");
            return Err(Error::Subgraph(format!(
                "{}: {}",
                endpoint, messages
            )));
        }
    }

    response.data.ok_or_else(|| {
        Error::Subgraph(format!("{}: no data returned", endpoint))
    })
}
