use quanecon_core::qfinance;

pub fn run(s0: f64, k: f64, r: f64, sigma: f64, t: f64, steps: usize) {
    let res = qfinance::binomial_call(s0, k, r, sigma, t, steps);
    super::print_json(&res);
}
