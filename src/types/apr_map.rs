use std::collections::BTreeMap;

use bigdecimal::BigDecimal;

/// LP address (lower-cased) to APR percentage, already rounded.
pub type AprMap = BTreeMap<String, BigDecimal>;
