//! CLI for quanecon — quantum-cognition statistics for plain spreadsheets.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quanecon")]
#[command(about = "quanecon — quantum-cognition statistics for plain spreadsheets")]
#[command(version = quanecon_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit an interference phase to a one-vs-rest conditional probability triple
    Hilbert {
        /// Marginal probability P(A)
        #[arg(long = "pA")]
        p_a: f64,

        /// Conditional probability P(B|A)
        #[arg(long = "pB_given_A")]
        p_b_given_a: f64,

        /// Observed reverse conditional P(A|B) the fit must reproduce
        #[arg(long = "pA_given_B")]
        p_a_given_b: f64,
    },

    /// Weight a prospect set: softmax utility factor plus quarter-law attraction
    Qdt {
        /// JSON array or @file.json: [{name, utility, freq?}, ...]
        #[arg(long)]
        prospects: String,

        /// Softmax temperature
        #[arg(long, default_value_t = 1.0)]
        tau: f64,

        /// Attraction strength toward observed frequencies
        #[arg(long, default_value_t = 0.25)]
        quarter: f64,
    },

    /// Contextuality-by-Default cyclic-4 check from correlations and marginals
    Cbd {
        #[arg(long = "E11")]
        e11: f64,
        #[arg(long = "E21")]
        e21: f64,
        #[arg(long = "E22")]
        e22: f64,
        #[arg(long = "E12")]
        e12: f64,
        #[arg(long = "mA1")]
        m_a1: f64,
        #[arg(long = "mA2")]
        m_a2: f64,
        #[arg(long = "mB1")]
        m_b1: f64,
        #[arg(long = "mB2")]
        m_b2: f64,
    },

    /// Solve the EWL quantum prisoner's dilemma over the C/D/Q strategy set
    Qgame {
        /// Reward payoff (mutual cooperation)
        #[arg(long = "R", default_value_t = 3.0)]
        r: f64,

        /// Sucker payoff
        #[arg(long = "S", default_value_t = 0.0)]
        s: f64,

        /// Temptation payoff
        #[arg(long = "T", default_value_t = 5.0)]
        t: f64,

        /// Punishment payoff (mutual defection)
        #[arg(long = "P", default_value_t = 1.0)]
        p: f64,

        /// Entanglement angle in radians, clamped to [0, pi/2]
        #[arg(long, default_value_t = 0.6)]
        gamma: f64,
    },

    /// Price a European call with a CRR binomial tree
    Qfinance {
        /// Spot price
        #[arg(long = "S0")]
        s0: f64,

        /// Strike
        #[arg(long = "K")]
        k: f64,

        /// Risk-free rate (annualized)
        #[arg(long)]
        r: f64,

        /// Volatility (annualized)
        #[arg(long)]
        sigma: f64,

        /// Time to maturity in years
        #[arg(long = "T")]
        t: f64,

        /// Tree depth
        #[arg(long, default_value_t = 150)]
        steps: usize,
    },

    /// Simulate the deterministic money-flow model
    Qmoney {
        /// Number of periods
        #[arg(long = "T", default_value_t = 40)]
        periods: usize,

        /// Autonomous consumption
        #[arg(long, default_value_t = 1.0)]
        c0: f64,

        /// Marginal propensity to consume out of wealth
        #[arg(long, default_value_t = 0.05)]
        c1: f64,

        /// Deposit rate
        #[arg(long = "rD", default_value_t = 0.01)]
        r_d: f64,

        /// Loan rate
        #[arg(long = "rL", default_value_t = 0.03)]
        r_l: f64,

        /// Investment level
        #[arg(long, default_value_t = 0.5)]
        inv0: f64,

        /// Share of new deposits held as cash
        #[arg(long, default_value_t = 0.5)]
        cash_share: f64,

        /// Wealth sensitivity to the deposit-loan gap
        #[arg(long, default_value_t = 0.2)]
        corr: f64,

        /// Initial household wealth
        #[arg(long = "H0", default_value_t = 100.0)]
        h0: f64,

        /// Initial deposits
        #[arg(long = "D0", default_value_t = 50.0)]
        d0: f64,

        /// Initial loans
        #[arg(long = "L0", default_value_t = 20.0)]
        l0: f64,
    },

    /// Run every applicable analysis over a CSV or XLSX dataset
    Auto {
        /// CSV or XLSX dataset
        data_path: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Hilbert {
            p_a,
            p_b_given_a,
            p_a_given_b,
        } => commands::hilbert::run(p_a, p_b_given_a, p_a_given_b),
        Commands::Qdt {
            prospects,
            tau,
            quarter,
        } => commands::qdt::run(&prospects, tau, quarter),
        Commands::Cbd {
            e11,
            e21,
            e22,
            e12,
            m_a1,
            m_a2,
            m_b1,
            m_b2,
        } => commands::cbd::run(e11, e21, e22, e12, m_a1, m_a2, m_b1, m_b2),
        Commands::Qgame { r, s, t, p, gamma } => commands::qgame::run(r, s, t, p, gamma),
        Commands::Qfinance {
            s0,
            k,
            r,
            sigma,
            t,
            steps,
        } => commands::qfinance::run(s0, k, r, sigma, t, steps),
        Commands::Qmoney {
            periods,
            c0,
            c1,
            r_d,
            r_l,
            inv0,
            cash_share,
            corr,
            h0,
            d0,
            l0,
        } => commands::qmoney::run(quanecon_core::qmoney::MoneyParams {
            periods,
            c0,
            c1,
            r_d,
            r_l,
            inv0,
            cash_share,
            corr,
            h0,
            d0,
            l0,
        }),
        Commands::Auto { data_path } => commands::auto::run(&data_path),
    }
}
