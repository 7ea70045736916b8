use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use tracing::error;

use crate::{error::Error, types::FarmConfig};

pub const BSC_CHAIN_ID: u64 = 56;
pub const BSC_TESTNET_CHAIN_ID: u64 = 97;

pub type FarmsProvider = fn() -> Result<Vec<FarmConfig>, Error>;

/// Farm lists by chain id.
#[derive(Debug)]
pub struct FarmRegistry {
    providers: HashMap<u64, FarmsProvider>,
    load_error_logged: AtomicBool,
}

impl Default for FarmRegistry {
    fn default() -> Self {
        let registry = Self::empty();

        #[cfg(feature = "mainnet")]
        let registry = registry.register(BSC_CHAIN_ID, bsc_farms);

        #[cfg(feature = "testnet")]
        let registry =
            registry.register(BSC_TESTNET_CHAIN_ID, bsc_testnet_farms);

        registry
    }
}

impl FarmRegistry {
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
            load_error_logged: AtomicBool::new(false),
        }
    }

    pub fn register(mut self, chain_id: u64, provider: FarmsProvider) -> Self {
        self.providers.insert(chain_id, provider);
        self
    }

    pub fn get_farms_config(
        &self,
        chain_id: u64,
    ) -> Result<Vec<FarmConfig>, Error> {
        let provider = self
            .providers
            .get(&chain_id)
            .ok_or(Error::UnsupportedChain(chain_id))?;

        provider()
    }

    /// Farm list for `chain_id`, empty when it cannot be loaded.
    /// The failure is logged only once per registry.
    pub fn load(&self, chain_id: u64) -> Vec<FarmConfig> {
        match self.get_farms_config(chain_id) {
            Ok(farms) => farms,
            Err(e) => {
                if !self.load_error_logged.swap(true, Ordering::SeqCst) {
                    error!(
                        "Unable to load farms config for chain {}: {}",
                        chain_id, e
                    );
                }
                Vec::new()
            },
        }
    }

    pub fn load_error_logged(&self) -> bool {
        self.load_error_logged.load(Ordering::SeqCst)
    }
}

pub fn parse_farms(data: &str) -> Result<Vec<FarmConfig>, Error> {
    let farms: Vec<FarmConfig> = serde_json::from_str(data)?;
    Ok(farms)
}

pub fn bsc_farms() -> Result<Vec<FarmConfig>, Error> {
    parse_farms(include_str!("lists/56.json"))
}

pub fn bsc_testnet_farms() -> Result<Vec<FarmConfig>, Error> {
    parse_farms(include_str!("lists/97.json"))
}
