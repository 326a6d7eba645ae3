//! JSON output of scenarios.

use crate::error::Result;
use crate::model::Scenario;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;

const INDENT: &[u8] = b"    ";

/// Render a scenario as JSON indented by four spaces.
pub fn to_json_string(scenario: &Scenario) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    scenario.serialize(&mut ser)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a scenario to `path`, replacing any existing file.
///
/// The document is rendered in memory first so a serialization failure
/// leaves no partial file behind.
pub fn write_scenario<P: AsRef<Path>>(scenario: &Scenario, path: P) -> Result<()> {
    let text = to_json_string(scenario)?;
    fs::write(path.as_ref(), text)?;
    Ok(())
}
