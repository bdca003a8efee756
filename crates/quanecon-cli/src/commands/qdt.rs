use quanecon_core::qdt;

/// The one hard-failure path in the CLI: malformed `--prospects` input is a
/// usage error and aborts the process. Every other command reports failure
/// inside its JSON payload.
pub fn run(prospects: &str, tau: f64, quarter: f64) {
    let prospects = match super::load_prospects(prospects) {
        Ok(ps) => ps,
        Err(e) => {
            eprintln!("qdt --prospects expects a JSON list or @file.json ({e})");
            std::process::exit(2);
        }
    };
    let res = qdt::compute(&prospects, tau, quarter);
    super::print_json(&res);
}
