//! # quanecon-core
//!
//! **Quantum-cognition statistics for plain spreadsheets.**
//!
//! `quanecon-core` loads untyped tabular data (CSV or XLSX) and applies a
//! family of quantum-cognition and quantum-econ models to it: Hilbert-space
//! phase fitting over column pairs, Quantum Decision Theory prospect
//! weighting, Contextuality-by-Default cyclic-4 checks, plus the
//! quantum-game, option-pricing, and money-flow kernels used by the CLI.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quanecon_core::auto::AutoRunner;
//! use quanecon_core::dataset::Dataset;
//!
//! let ds = Dataset::from_path("survey.csv")?;
//! for run in AutoRunner::new(ds).run_all() {
//!     println!("{}", run.summary);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Dataset (strings) → AutoRunner (detection + grouping) → kernels → envelopes
//!
//! Every analysis returns a [`auto::RunEnvelope`]: an `ok` flag, a one-line
//! human-readable summary, and named string tables whose first row is the
//! header. Unusable input yields `ok: false` with an explanatory summary,
//! never a panic; [`auto::AutoRunner::run_all`] additionally converts any
//! kernel panic into a failed envelope so one analysis cannot take down the
//! rest of a batch.
//!
//! The kernels themselves ([`hilbert`], [`qdt`], [`cbd`], [`qgame`],
//! [`qfinance`], [`qmoney`]) are pure functions over plain numbers and can
//! be used without the dataset layer.

pub mod auto;
pub mod cbd;
pub mod dataset;
pub mod hilbert;
pub mod qdt;
pub mod qfinance;
pub mod qgame;
pub mod qmoney;
mod xlsx;

pub use auto::{AutoRunner, RunEnvelope};
pub use dataset::Dataset;

/// Library version, from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
