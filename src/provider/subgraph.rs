use std::fmt::Debug;

use async_trait::async_trait;
use graphql_client::QueryBody;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

/// GraphQL access to an indexed subgraph.
#[async_trait]
pub trait Subgraph: Debug + Send + Sync {
    /// Posts `body` to `endpoint` and returns the `data` object.
    async fn request(
        &self,
        endpoint: &str,
        body: QueryBody<Value>,
    ) -> Result<Value, Error>;
}

pub async fn request_as<T>(
    subgraph: &dyn Subgraph,
    endpoint: &str,
    operation_name: &'static str,
    query: &'static str,
    variables: Value,
) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let body = QueryBody {
        variables,
        query,
        operation_name,
    };
    let data = subgraph.request(endpoint, body).await?;
    let value = serde_json::from_value(data)?;

    Ok(value)
}
