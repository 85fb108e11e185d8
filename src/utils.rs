use serde::Deserialize;
use std::error;
use std::path::Path;

// read the json file at `path`
pub fn read_json<T>(path: impl AsRef<Path>) -> Result<T, Box<dyn error::Error>>
where
    for<'de> T: Deserialize<'de>,
{
    let json_str = std::fs::read_to_string(path)?;
    let json: T = serde_json::from_str(&json_str)?;
    Ok(json)
}

// write `json` to `path`, pretty printed
pub fn write_json<T>(path: impl AsRef<Path>, json: &T) -> Result<(), Box<dyn error::Error>>
where
    T: serde::Serialize,
{
    let json_str = serde_json::to_string_pretty(json)?;
    std::fs::write(path, json_str)?;
    Ok(())
}
