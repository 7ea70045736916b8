use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use graphql_client::QueryBody;
use serde_json::Value;

use crate::{configuration::ChainEndpoints, error::Error, provider::Subgraph};

type Responder =
    Box<dyn Fn(&str, &str, &Value) -> Result<Value, Error> + Send + Sync>;

/// In-memory subgraph answering through a closure.
pub struct MockSubgraph {
    responder: Responder,
    calls: Mutex<Vec<(String, String, Value)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockSubgraph {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &str, &Value) -> Result<Value, Error>
            + Send
            + Sync
            + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> Vec<(String, String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for MockSubgraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSubgraph").finish_non_exhaustive()
    }
}

#[async_trait]
impl Subgraph for MockSubgraph {
    async fn request(
        &self,
        endpoint: &str,
        body: QueryBody<Value>,
    ) -> Result<Value, Error> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::task::yield_now().await;

        self.calls.lock().unwrap().push((
            endpoint.to_owned(),
            body.query.to_owned(),
            body.variables.clone(),
        ));
        let result =
            (self.responder)(endpoint, body.query, &body.variables);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn endpoints() -> ChainEndpoints {
    ChainEndpoints {
        chain_id: 56,
        blocks: Some(String::from("https://blocks.example.org")),
        info: String::from("https://info.example.org"),
        stable_swap: Some(String::from("https://stable.example.org")),
    }
}
