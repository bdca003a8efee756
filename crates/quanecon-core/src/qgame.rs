//! Eisert-Wilkens-Lewenstein quantized prisoner's dilemma.
//!
//! Both players pick from the discrete strategy set {C, D, Q} and the game
//! is played through the EWL entangling gate J = exp(iγ D̂⊗D̂/2). At γ = 0
//! the game is the classical one; at γ = π/2 the quantum strategy Q breaks
//! the classical dilemma. Payoffs use the usual (R, S, T, P) table.

use serde::Serialize;

/// The three discrete EWL strategies.
const STRATEGIES: [&str; 3] = ["C", "D", "Q"];

/// Expected payoffs for one strategy profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePayoff {
    pub a: String,
    pub b: String,
    pub payoff_a: f64,
    pub payoff_b: f64,
}

/// One full sweep over the 3×3 strategy profiles.
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub ok: bool,
    /// All nine profiles in (C, D, Q) × (C, D, Q) order.
    pub payoffs: Vec<ProfilePayoff>,
    /// Highest joint payoff (payoff_a + payoff_b) over all profiles.
    pub best_value: f64,
    /// Every profile reaching `best_value` (within 1e-9).
    pub best_profiles: Vec<ProfilePayoff>,
}

#[derive(Debug, Clone, Copy)]
struct C64 {
    re: f64,
    im: f64,
}

impl C64 {
    const ZERO: C64 = C64 { re: 0.0, im: 0.0 };

    fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn add(self, o: C64) -> C64 {
        C64::new(self.re + o.re, self.im + o.im)
    }

    fn mul(self, o: C64) -> C64 {
        C64::new(
            self.re * o.re - self.im * o.im,
            self.re * o.im + self.im * o.re,
        )
    }

    fn scale(self, s: f64) -> C64 {
        C64::new(self.re * s, self.im * s)
    }

    fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

type Unitary = [[C64; 2]; 2];

fn strategy_unitary(name: &str) -> Unitary {
    let z = C64::ZERO;
    let one = C64::new(1.0, 0.0);
    let i = C64::new(0.0, 1.0);
    match name {
        // D = iσy, the full defection flip.
        "D" => [[z, one], [C64::new(-1.0, 0.0), z]],
        // Q = iσz, the phase strategy that exploits entanglement.
        "Q" => [[i, z], [z, C64::new(0.0, -1.0)]],
        // C = identity.
        _ => [[one, z], [z, one]],
    }
}

/// Apply (U ⊗ V) to a two-qubit state.
fn apply_kron(u: &Unitary, v: &Unitary, s: &[C64; 4]) -> [C64; 4] {
    let mut out = [C64::ZERO; 4];
    for ia in 0..2 {
        for ib in 0..2 {
            let mut acc = C64::ZERO;
            for ja in 0..2 {
                for jb in 0..2 {
                    acc = acc.add(u[ia][ja].mul(v[ib][jb]).mul(s[ja * 2 + jb]));
                }
            }
            out[ia * 2 + ib] = acc;
        }
    }
    out
}

/// Outcome probabilities for one profile at entanglement `gamma`.
fn outcome_probs(a: &Unitary, b: &Unitary, gamma: f64) -> [f64; 4] {
    let d = strategy_unitary("D");
    let (cos_g, sin_g) = ((gamma / 2.0).cos(), (gamma / 2.0).sin());

    // J|00> = cos(γ/2)|00> + i sin(γ/2)|11>.
    let mut state = [C64::ZERO; 4];
    state[0] = C64::new(cos_g, 0.0);
    state[3] = C64::new(0.0, sin_g);

    let moved = apply_kron(a, b, &state);

    // J† = cos(γ/2) I − i sin(γ/2) (D⊗D).
    let flipped = apply_kron(&d, &d, &moved);
    let mut final_state = [C64::ZERO; 4];
    for k in 0..4 {
        final_state[k] = moved[k]
            .scale(cos_g)
            .add(flipped[k].mul(C64::new(0.0, -sin_g)));
    }

    let mut probs = [0.0; 4];
    for k in 0..4 {
        probs[k] = final_state[k].norm_sq();
    }
    probs
}

/// Sweep all 3×3 strategy profiles of the EWL game.
///
/// `r`, `s`, `t`, `p` are the classical payoff entries (reward, sucker,
/// temptation, punishment); `gamma` is the entanglement angle, clamped to
/// [0, π/2].
pub fn solve(r: f64, s: f64, t: f64, p: f64, gamma: f64) -> GameResult {
    if ![r, s, t, p, gamma].iter().all(|v| v.is_finite()) {
        return GameResult {
            ok: false,
            payoffs: Vec::new(),
            best_value: 0.0,
            best_profiles: Vec::new(),
        };
    }
    let gamma = gamma.clamp(0.0, std::f64::consts::FRAC_PI_2);

    let mut payoffs = Vec::with_capacity(9);
    for a_name in STRATEGIES {
        for b_name in STRATEGIES {
            let probs = outcome_probs(
                &strategy_unitary(a_name),
                &strategy_unitary(b_name),
                gamma,
            );
            // Basis order: |CC>, |CD>, |DC>, |DD>.
            let payoff_a = r * probs[0] + s * probs[1] + t * probs[2] + p * probs[3];
            let payoff_b = r * probs[0] + t * probs[1] + s * probs[2] + p * probs[3];
            payoffs.push(ProfilePayoff {
                a: a_name.to_string(),
                b: b_name.to_string(),
                payoff_a,
                payoff_b,
            });
        }
    }

    let best_value = payoffs
        .iter()
        .map(|pp| pp.payoff_a + pp.payoff_b)
        .fold(f64::NEG_INFINITY, f64::max);
    let best_profiles = payoffs
        .iter()
        .filter(|pp| (pp.payoff_a + pp.payoff_b - best_value).abs() < 1e-9)
        .cloned()
        .collect();

    GameResult {
        ok: true,
        payoffs,
        best_value,
        best_profiles,
    }
}
