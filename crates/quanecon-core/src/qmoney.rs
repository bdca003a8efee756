//! Deterministic household/deposit/loan money-flow simulation.
//!
//! A toy stock-flow model: household wealth H drives consumption, deposits D
//! earn interest r_d, loans L cost r_l, and a small coupling term links the
//! deposit-loan gap back into wealth. One trajectory point per period.

use serde::Serialize;

/// Simulation parameters with the model's reference defaults.
#[derive(Debug, Clone)]
pub struct MoneyParams {
    /// Number of periods.
    pub periods: usize,
    /// Autonomous consumption.
    pub c0: f64,
    /// Marginal propensity to consume out of wealth.
    pub c1: f64,
    /// Deposit interest rate.
    pub r_d: f64,
    /// Loan interest rate.
    pub r_l: f64,
    /// Per-period investment drawing on loans.
    pub inv0: f64,
    /// Share of deposits held as cash, clamped to [0, 1].
    pub cash_share: f64,
    /// Deposit-loan coupling strength, clamped to [0, 1].
    pub corr: f64,
    /// Initial household wealth.
    pub h0: f64,
    /// Initial deposits.
    pub d0: f64,
    /// Initial loans.
    pub l0: f64,
}

impl Default for MoneyParams {
    fn default() -> Self {
        Self {
            periods: 40,
            c0: 1.0,
            c1: 0.05,
            r_d: 0.01,
            r_l: 0.03,
            inv0: 0.5,
            cash_share: 0.5,
            corr: 0.2,
            h0: 100.0,
            d0: 50.0,
            l0: 20.0,
        }
    }
}

/// Per-series trajectory, one value per simulated period.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Trajectory {
    #[serde(rename = "H")]
    pub wealth: Vec<f64>,
    #[serde(rename = "D")]
    pub deposits: Vec<f64>,
    #[serde(rename = "L")]
    pub loans: Vec<f64>,
    #[serde(rename = "C")]
    pub consumption: Vec<f64>,
    #[serde(rename = "Y")]
    pub income: Vec<f64>,
    pub cash: Vec<f64>,
    pub account: Vec<f64>,
}

/// Simulation result.
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResult {
    pub ok: bool,
    pub trajectory: Trajectory,
}

/// Run the simulation for `params.periods` steps.
pub fn simulate(params: &MoneyParams) -> MoneyResult {
    let cash_share = params.cash_share.clamp(0.0, 1.0);
    let corr = params.corr.clamp(0.0, 1.0);

    let mut wealth = params.h0;
    let mut deposits = params.d0;
    let mut loans = params.l0;

    let mut out = Trajectory::default();
    for _ in 0..params.periods {
        let consumption = params.c0 + params.c1 * wealth;
        let income = consumption;

        let next_wealth = wealth + income - consumption + params.r_d * deposits
            - params.r_l * loans
            + corr * (deposits - loans) * 0.01;
        let next_deposits = deposits + income - consumption;
        let next_loans = (loans + params.inv0 - (income - consumption)).max(0.0);

        let cash = cash_share * next_deposits;
        let account = (1.0 - cash_share) * next_deposits;

        wealth = next_wealth;
        deposits = next_deposits;
        loans = next_loans;

        out.wealth.push(wealth);
        out.deposits.push(deposits);
        out.loans.push(loans);
        out.consumption.push(consumption);
        out.income.push(income);
        out.cash.push(cash);
        out.account.push(account);
    }

    MoneyResult {
        ok: true,
        trajectory: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trajectory_length_matches_periods() {
        let r = simulate(&MoneyParams {
            periods: 10,
            ..MoneyParams::default()
        });
        assert!(r.ok);
        assert_eq!(r.trajectory.wealth.len(), 10);
        assert_eq!(r.trajectory.account.len(), 10);
    }

    #[test]
    fn loans_never_go_negative() {
        let r = simulate(&MoneyParams {
            periods: 100,
            inv0: -5.0,
            ..MoneyParams::default()
        });
        assert!(r.trajectory.loans.iter().all(|l| *l >= 0.0));
    }

    #[test]
    fn cash_and_account_split_deposits() {
        let r = simulate(&MoneyParams::default());
        for i in 0..r.trajectory.deposits.len() {
            let total = r.trajectory.cash[i] + r.trajectory.account[i];
            assert!((total - r.trajectory.deposits[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_periods_is_empty() {
        let r = simulate(&MoneyParams {
            periods: 0,
            ..MoneyParams::default()
        });
        assert!(r.ok);
        assert!(r.trajectory.wealth.is_empty());
    }
}
