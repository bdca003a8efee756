pub mod auto;
pub mod cbd;
pub mod hilbert;
pub mod qdt;
pub mod qfinance;
pub mod qgame;
pub mod qmoney;

use quanecon_core::qdt::Prospect;
use serde::Serialize;
use std::fs;

/// Print a result payload as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("failed to serialize result: {e}"),
    }
}

/// Parse a `--prospects` argument: either inline JSON or `@file.json`.
/// Expects a JSON array of `{name, utility, freq?}` objects.
pub fn load_prospects(arg: &str) -> Result<Vec<Prospect>, String> {
    let text = match arg.trim().strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("cannot read '{path}': {e}"))?,
        None => arg.to_string(),
    };
    serde_json::from_str::<Vec<Prospect>>(&text)
        .map_err(|e| format!("expected a JSON list of prospects: {e}"))
}
