//! Contextuality-by-Default check for a cyclic-4 system.
//!
//! Takes the four pairwise correlation means E_xy and the four marginal
//! means of a two-party, two-question design. `S_odd` is the maximum of
//! ±E11 ± E12 ± E21 ± E22 over sign patterns with an odd number of minus
//! signs; `ICC` (inconsistently-connected correction) is
//! |mA1 − mA2| + |mB1 − mB2|. The system counts as contextual when S_odd
//! exceeds the classical bound 2 plus the correction.

use serde::Serialize;

/// Contextuality check result.
#[derive(Debug, Clone, Serialize)]
pub struct CbdResult {
    pub ok: bool,
    #[serde(rename = "S_odd")]
    pub s_odd: f64,
    #[serde(rename = "ICC")]
    pub icc: f64,
    pub contextual: bool,
}

/// Evaluate the CbD criterion from the eight means. Pure function; `ok` is
/// false only when an input is not finite.
#[allow(clippy::too_many_arguments)]
pub fn check(
    e11: f64,
    e21: f64,
    e22: f64,
    e12: f64,
    m_a1: f64,
    m_a2: f64,
    m_b1: f64,
    m_b2: f64,
) -> CbdResult {
    let inputs = [e11, e21, e22, e12, m_a1, m_a2, m_b1, m_b2];
    if inputs.iter().any(|v| !v.is_finite()) {
        return CbdResult {
            ok: false,
            s_odd: 0.0,
            icc: 0.0,
            contextual: false,
        };
    }

    let correlations = [e11, e12, e21, e22];
    let mut s_odd = f64::NEG_INFINITY;
    for pattern in 0..16u8 {
        if pattern.count_ones() % 2 == 0 {
            continue;
        }
        let combo: f64 = correlations
            .iter()
            .enumerate()
            .map(|(i, e)| if pattern & (1 << i) != 0 { -e } else { *e })
            .sum();
        if combo > s_odd {
            s_odd = combo;
        }
    }

    let icc = (m_a1 - m_a2).abs() + (m_b1 - m_b2).abs();

    CbdResult {
        ok: true,
        s_odd,
        icc,
        contextual: s_odd > 2.0 + icc,
    }
}
