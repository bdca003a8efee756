use quanecon_core::{AutoRunner, Dataset};
use serde_json::json;

/// Run all three dataset analyses and print `{"runs": [...]}`. A dataset
/// that cannot be loaded still completes with a failed envelope in the
/// payload rather than a non-zero exit.
pub fn run(data_path: &str) {
    let ds = match Dataset::from_path(data_path) {
        Ok(ds) => ds,
        Err(e) => {
            super::print_json(&json!({
                "runs": [{
                    "ok": false,
                    "summary": format!("Error: cannot load '{data_path}': {e}"),
                    "tables": {},
                }],
            }));
            return;
        }
    };
    log::debug!(
        "loaded '{data_path}': {} columns, {} rows",
        ds.headers.len(),
        ds.row_count()
    );
    let runs = AutoRunner::new(ds).run_all();
    super::print_json(&json!({ "runs": runs }));
}
