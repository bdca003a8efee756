use quanecon_core::hilbert;

pub fn run(p_a: f64, p_b_given_a: f64, p_a_given_b: f64) {
    let res = hilbert::fit_phase(p_a, p_b_given_a, p_a_given_b, hilbert::DEFAULT_RESOLUTION);
    super::print_json(&res);
}
