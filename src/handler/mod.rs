pub mod lp_apr;
pub mod stable_apr;
pub mod update_lps_apr;

pub use update_lps_apr::fetch_and_update_lps_apr;
