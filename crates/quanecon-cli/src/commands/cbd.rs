use quanecon_core::cbd;

#[allow(clippy::too_many_arguments)]
pub fn run(e11: f64, e21: f64, e22: f64, e12: f64, m_a1: f64, m_a2: f64, m_b1: f64, m_b2: f64) {
    let res = cbd::check(e11, e21, e22, e12, m_a1, m_a2, m_b1, m_b2);
    super::print_json(&res);
}
