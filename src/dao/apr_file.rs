use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use bigdecimal::{BigDecimal, ToPrimitive as _};
use serde_json::Number;
use tokio::{fs, sync::Mutex};
use tracing::info;

use crate::{error::Error, types::AprMap};

pub fn get_path(dir: &str, chain_id: u64) -> PathBuf {
    let file = format!("{}.json", chain_id);
    let mut buf = PathBuf::new();

    for chunk in [dir, file.as_str()] {
        buf.push(chunk);
    }

    buf
}

/// Per-chain APR JSON files. Writes are serialised and replace the file
/// in a single rename.
#[derive(Debug)]
pub struct AprFile {
    pub dir: String,
    lock: Mutex<()>,
}

impl AprFile {
    pub fn new(dir: String) -> Self {
        Self {
            dir,
            lock: Mutex::new(()),
        }
    }

    pub async fn write(
        &self,
        chain_id: u64,
        aprs: &AprMap,
    ) -> Result<PathBuf, Error> {
        let path = get_path(&self.dir, chain_id);
        let data = serialize(aprs)?;

        let _guard = self.lock.lock().await;

        fs::create_dir_all(&self.dir).await?;
        let tmp = tmp_path(&path);
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &path).await?;

        info!(
            "Chain {}: wrote {} APRs to {}",
            chain_id,
            aprs.len(),
            path.display()
        );

        Ok(path)
    }
}

/// Pretty JSON object of address to APR number, newline terminated.
pub fn serialize(aprs: &AprMap) -> Result<String, Error> {
    let mut values = BTreeMap::new();

    for (address, apr) in aprs {
        let value = json_number(apr).ok_or_else(|| {
            Error::TaskError(format!(
                "APR {} of {} is not representable",
                apr, address
            ))
        })?;
        values.insert(address.as_str(), value);
    }

    let mut data = serde_json::to_string_pretty(&values)?;
    data.push('\n');

    Ok(data)
}

/// Whole values are written as integers (`5`, not `5.0`).
fn json_number(value: &BigDecimal) -> Option<Number> {
    if value.is_integer() {
        if let Some(integer) = value.to_i64() {
            return Some(Number::from(integer));
        }
    }

    let float: f64 = value.to_string().parse().ok()?;
    Number::from_f64(float)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
