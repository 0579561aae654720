use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value).context("serialize output")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn write_then_read_preserves_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.json");
        write_json(&path, &json!({"ledger": "tenant/dataset"})).expect("write");
        let text = fs::read_to_string(&path).expect("read back");
        assert!(text.ends_with("}\n"));
        let value: Value = read_json(&path).expect("read");
        assert_eq!(value["ledger"], "tenant/dataset");
    }

    #[test]
    fn read_errors_name_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        fs::write(&path, "[").expect("write");
        let err = read_json::<Value>(&path).expect_err("invalid json");
        assert!(format!("{err:#}").contains("bad.json"), "{err:#}");
    }
}
