pub use self::{
    blocks::get_block_from_timestamp,
    http::HTTP,
    subgraph::{request_as, Subgraph},
};

mod blocks;
mod http;
mod subgraph;

#[cfg(test)]
pub(crate) mod mock;
