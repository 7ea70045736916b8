pub use self::{
    apr_map::AprMap,
    blocks_response::{BlockValue, BlocksResponse},
    farm_config::{FarmConfig, Token},
    single_farm_snapshot::{FarmsBulkResponse, SingleFarmSnapshot},
    virtual_price::{VirtualPrice, VirtualPriceResponse},
};

mod apr_map;
mod blocks_response;
mod farm_config;
mod single_farm_snapshot;
mod virtual_price;
