use quanecon_core::qgame;

pub fn run(r: f64, s: f64, t: f64, p: f64, gamma: f64) {
    let res = qgame::solve(r, s, t, p, gamma);
    super::print_json(&res);
}
