use bigdecimal::{BigDecimal, RoundingMode};

use crate::types::FarmConfig;

/// Significant digits kept between multiplications in `pow`.
const POW_PRECISION: u64 = 64;

/// Splits farms into (normal, stable). A farm carrying a stable-swap
/// address is always stable.
pub fn partition_farms(
    farms: Vec<FarmConfig>,
) -> (Vec<FarmConfig>, Vec<FarmConfig>) {
    farms
        .into_iter()
        .partition(|farm| farm.stable_swap().is_none())
}

pub fn lp_addresses(farms: &[FarmConfig]) -> Vec<String> {
    farms
        .iter()
        .map(|farm| farm.lp_address.to_lowercase())
        .collect()
}

pub fn round_half_up(value: &BigDecimal, places: i64) -> BigDecimal {
    value.with_scale_round(places, RoundingMode::HalfUp)
}

/// `base ^ exp` by repeated squaring.
pub fn pow(base: &BigDecimal, exp: u32) -> BigDecimal {
    let mut result = BigDecimal::from(1);
    let mut base = base.clone();
    let mut exp = exp;

    while exp > 0 {
        if exp & 1 == 1 {
            result = (&result * &base).with_prec(POW_PRECISION);
        }
        exp >>= 1;
        if exp > 0 {
            base = (&base * &base).with_prec(POW_PRECISION);
        }
    }

    result
}
