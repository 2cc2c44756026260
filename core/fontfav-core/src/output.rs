//! Structured output helpers (made by FontLab https://www.fontlab.com/)

use std::io::Write;

use anyhow::Result;

use crate::catalog::FamilyEntry;

/// Write families as a prettified JSON array.
pub fn write_json_pretty(families: &[&FamilyEntry], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(families)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write families as newline-delimited JSON (NDJSON).
pub fn write_ndjson(families: &[&FamilyEntry], mut w: impl Write) -> Result<()> {
    for item in families {
        let line = serde_json::to_string(item)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}
