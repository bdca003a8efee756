//! Cox-Ross-Rubinstein binomial pricing for a European call.

use serde::Serialize;

/// Binomial call price.
#[derive(Debug, Clone, Serialize)]
pub struct CallPrice {
    pub ok: bool,
    pub binomial_price: f64,
}

/// Price a European call on the CRR lattice.
///
/// `s0` spot, `k` strike, `r` continuously-compounded rate, `sigma`
/// volatility, `t` maturity in years, `steps` lattice depth.
pub fn binomial_call(s0: f64, k: f64, r: f64, sigma: f64, t: f64, steps: usize) -> CallPrice {
    let valid = s0 > 0.0
        && k >= 0.0
        && sigma > 0.0
        && t > 0.0
        && steps >= 1
        && [s0, k, r, sigma, t].iter().all(|v| v.is_finite());
    if !valid {
        return CallPrice {
            ok: false,
            binomial_price: 0.0,
        };
    }

    let dt = t / steps as f64;
    let up = (sigma * dt.sqrt()).exp();
    let down = 1.0 / up;
    let discount = (-r * dt).exp();
    let q = (((r * dt).exp() - down) / (up - down)).clamp(0.0, 1.0);

    // Terminal payoffs, then backward induction.
    let mut values: Vec<f64> = (0..=steps)
        .map(|j| {
            let price = s0 * up.powi(j as i32) * down.powi((steps - j) as i32);
            (price - k).max(0.0)
        })
        .collect();
    for step in (0..steps).rev() {
        for j in 0..=step {
            values[j] = discount * (q * values[j + 1] + (1.0 - q) * values[j]);
        }
    }

    CallPrice {
        ok: true,
        binomial_price: values[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_the_money_price_is_positive() {
        let r = binomial_call(100.0, 100.0, 0.01, 0.2, 1.0, 50);
        assert!(r.ok);
        assert!(r.binomial_price >= 0.0);
        // ATM 20%-vol one-year call is worth roughly 8-9.
        assert!(r.binomial_price > 5.0 && r.binomial_price < 12.0);
    }

    #[test]
    fn deep_in_the_money_approaches_intrinsic() {
        let r = binomial_call(200.0, 100.0, 0.0, 0.1, 0.5, 100);
        assert!(r.binomial_price >= 100.0 - 1e-6);
    }

    #[test]
    fn worthless_when_strike_unreachable() {
        let r = binomial_call(1.0, 1_000.0, 0.0, 0.05, 0.1, 50);
        assert!(r.ok);
        assert!(r.binomial_price < 1e-9);
    }

    #[test]
    fn price_converges_with_depth() {
        let coarse = binomial_call(100.0, 100.0, 0.01, 0.2, 1.0, 50).binomial_price;
        let fine = binomial_call(100.0, 100.0, 0.01, 0.2, 1.0, 400).binomial_price;
        assert!((coarse - fine).abs() < 0.5);
    }

    #[test]
    fn invalid_inputs_fail() {
        assert!(!binomial_call(0.0, 100.0, 0.01, 0.2, 1.0, 50).ok);
        assert!(!binomial_call(100.0, 100.0, 0.01, 0.0, 1.0, 50).ok);
        assert!(!binomial_call(100.0, 100.0, 0.01, 0.2, 0.0, 50).ok);
        assert!(!binomial_call(100.0, 100.0, 0.01, 0.2, 1.0, 0).ok);
    }
}
