//! Automatic analysis of untyped tabular datasets.
//!
//! Turns a raw string-valued [`Dataset`] into well-formed inputs for the
//! three statistical kernels and wraps each outcome in a [`RunEnvelope`]:
//!
//! - categorical/boolean column detection feeding the pairwise phase fit,
//! - experiment-keyed prospect grouping feeding the QDT weighting,
//! - ±1 series extraction feeding the CbD contextuality check.
//!
//! The three entry points are independent, synchronous, and side-effect
//! free; a failure in one never affects the others. Malformed data policy
//! differs by analysis on purpose: the prospect path drops bad rows, the
//! CbD path zero-fills bad cells and keeps the row.

use serde::Serialize;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::cbd;
use crate::dataset::Dataset;
use crate::hilbert;
use crate::qdt::{self, Prospect};

/// Maximum distinct non-empty values for a column to count as categorical.
pub const DEFAULT_MAX_UNIQUE: usize = 10;

/// Default cap on analyzed column pairs per sweep.
pub const DEFAULT_PAIR_LIMIT: usize = 200;

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

/// Classification of one column's raw string values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnClass {
    /// Ordered domain of distinct non-empty trimmed values (first-seen
    /// order, possibly empty), or `["True", "False"]` when every non-empty
    /// value coerces to a boolean.
    Categorical(Vec<String>),
    NotCategorical,
}

impl ColumnClass {
    /// The categorical domain, if this column has one.
    pub fn domain(&self) -> Option<&[String]> {
        match self {
            ColumnClass::Categorical(d) => Some(d),
            ColumnClass::NotCategorical => None,
        }
    }
}

/// Case-insensitive boolean coercion: yes/y/true/t/1 and no/n/false/f/0.
pub fn to_boolish(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "t" | "1" => Some(true),
        "no" | "n" | "false" | "f" | "0" => Some(false),
        _ => None,
    }
}

/// Classify a column from its raw values.
///
/// Trims, drops empties, dedups preserving first occurrence. At most
/// `max_unique` distinct values ⇒ that list is the domain (a column with no
/// non-empty values is categorical with an empty domain). Otherwise, if
/// every non-empty value boolean-coerces, the domain is `["True","False"]`.
pub fn classify_column(values: &[&str], max_unique: usize) -> ColumnClass {
    let mut uniq: Vec<&str> = Vec::new();
    for v in values {
        let t = v.trim();
        if t.is_empty() || uniq.contains(&t) {
            continue;
        }
        uniq.push(t);
    }
    if uniq.len() <= max_unique {
        return ColumnClass::Categorical(uniq.into_iter().map(String::from).collect());
    }
    if uniq.iter().all(|v| to_boolish(v).is_some()) {
        return ColumnClass::Categorical(vec!["True".to_string(), "False".to_string()]);
    }
    ColumnClass::NotCategorical
}

/// Modal raw value among non-empty cells; ties break to the first value
/// reaching the maximum count in scan order. `None` when every cell is
/// empty after trimming.
fn modal_value<'a>(cells: &[&'a str]) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for v in cells {
        if v.trim().is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(k, _)| k == v) {
            Some((_, c)) => *c += 1,
            None => counts.push((v, 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (v, c) in counts {
        if best.is_none_or(|(_, bc)| c > bc) {
            best = Some((v, c));
        }
    }
    best.map(|(v, _)| v)
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Uniform result envelope for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunEnvelope {
    pub ok: bool,
    pub summary: String,
    /// Named string tables; the first row of each table is its header.
    pub tables: BTreeMap<String, Vec<Vec<String>>>,
}

impl RunEnvelope {
    fn failure(summary: impl Into<String>) -> Self {
        Self {
            ok: false,
            summary: summary.into(),
            tables: BTreeMap::new(),
        }
    }

    fn table(ok: bool, summary: String, name: &str, rows: Vec<Vec<String>>) -> Self {
        let mut tables = BTreeMap::new();
        tables.insert(name.to_string(), rows);
        Self {
            ok,
            summary,
            tables,
        }
    }
}

/// One analyzed column pair: one-vs-rest contingency counts plus the
/// fitted interference parameters.
#[derive(Debug, Clone, Serialize)]
pub struct PairRecord {
    pub a: String,
    pub b: String,
    pub a_yes: String,
    pub b_yes: String,
    pub n: usize,
    pub n_a: usize,
    pub n_b: usize,
    pub n_ab: usize,
    pub p_a: f64,
    pub p_b_given_a: f64,
    pub p_a_given_b: f64,
    pub phi: f64,
    pub theta: f64,
}

impl PairRecord {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.a.clone(),
            self.a_yes.clone(),
            self.b.clone(),
            self.b_yes.clone(),
            self.n.to_string(),
            self.n_a.to_string(),
            self.n_b.to_string(),
            self.n_ab.to_string(),
            format!("{:.4}", self.p_a),
            format!("{:.4}", self.p_b_given_a),
            format!("{:.4}", self.p_a_given_b),
            format!("{:.4}", self.phi),
            format!("{:.4}", self.theta),
        ]
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Runs the three analyses over one immutable dataset snapshot.
pub struct AutoRunner {
    ds: Dataset,
}

impl AutoRunner {
    pub fn new(ds: Dataset) -> Self {
        Self { ds }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.ds
    }

    /// All cells of one column by index, empty string for ragged rows.
    fn column_cells(&self, index: usize) -> Vec<&str> {
        self.ds
            .rows
            .iter()
            .map(|r| r.get(index).map(String::as_str).unwrap_or(""))
            .collect()
    }

    /// Sweep ordered pairs of categorical columns and fit each pair.
    ///
    /// Enumeration is header order with i < j, and stops mid-sweep as soon
    /// as `limit_pairs` records exist: the result is deliberately
    /// non-exhaustive for datasets with many categorical columns.
    pub fn pair_records(&self, limit_pairs: usize) -> Vec<PairRecord> {
        let mut cat_columns: Vec<(&str, Vec<&str>)> = Vec::new();
        for (idx, header) in self.ds.headers.iter().enumerate() {
            let cells = self.column_cells(idx);
            match classify_column(&cells, DEFAULT_MAX_UNIQUE) {
                ColumnClass::Categorical(domain) if !domain.is_empty() => {
                    cat_columns.push((header, cells));
                }
                _ => log::debug!("column '{header}' excluded from pair analysis"),
            }
        }

        let mut records = Vec::new();
        'sweep: for i in 0..cat_columns.len() {
            for j in (i + 1)..cat_columns.len() {
                let (a_name, a_cells) = &cat_columns[i];
                let (b_name, b_cells) = &cat_columns[j];
                // Reference value: the modal raw value of each column.
                let Some(a_yes) = modal_value(a_cells) else {
                    continue;
                };
                let Some(b_yes) = modal_value(b_cells) else {
                    continue;
                };

                let (mut n, mut n_a, mut n_b, mut n_ab) = (0usize, 0usize, 0usize, 0usize);
                for (a, b) in a_cells.iter().zip(b_cells.iter()) {
                    // A row counts only when both sides are present.
                    if a.trim().is_empty() || b.trim().is_empty() {
                        continue;
                    }
                    n += 1;
                    let a_hit = *a == a_yes;
                    let b_hit = *b == b_yes;
                    if a_hit {
                        n_a += 1;
                    }
                    if b_hit {
                        n_b += 1;
                    }
                    if a_hit && b_hit {
                        n_ab += 1;
                    }
                }
                if n == 0 || n_a == 0 || n_b == 0 {
                    continue;
                }

                let p_a = n_a as f64 / n as f64;
                let p_b_given_a = n_ab as f64 / n_a as f64;
                let p_a_given_b = n_ab as f64 / n_b as f64;
                let fit =
                    hilbert::fit_phase(p_a, p_b_given_a, p_a_given_b, hilbert::DEFAULT_RESOLUTION);

                records.push(PairRecord {
                    a: a_name.to_string(),
                    b: b_name.to_string(),
                    a_yes: a_yes.to_string(),
                    b_yes: b_yes.to_string(),
                    n,
                    n_a,
                    n_b,
                    n_ab,
                    p_a,
                    p_b_given_a,
                    p_a_given_b,
                    phi: fit.phi,
                    theta: fit.theta,
                });
                if records.len() >= limit_pairs {
                    break 'sweep;
                }
            }
        }
        records
    }

    /// Pairwise phase-fit sweep over all categorical column pairs.
    pub fn run_hilbert_all(&self, limit_pairs: usize) -> RunEnvelope {
        let records = self.pair_records(limit_pairs);
        if records.is_empty() {
            return RunEnvelope::failure("Hilbert Auto: no suitable categorical column pairs found.");
        }
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len() + 1);
        rows.push(
            [
                "A_col", "A_yes", "B_col", "B_yes", "N", "nA", "nB", "nAB", "pA", "pB|A", "pA|B",
                "phi", "theta",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        );
        rows.extend(records.iter().map(PairRecord::to_row));
        RunEnvelope::table(
            true,
            format!(
                "Hilbert Auto: analyzed {} column-pairs (one-vs-rest).",
                records.len()
            ),
            "hilbert_pairs",
            rows,
        )
    }

    /// Experiment-grouped QDT prospect weighting.
    pub fn run_qdt_all(&self) -> RunEnvelope {
        let (Some(prospect_col), Some(utility_col)) =
            (self.ds.column("prospect"), self.ds.column("utility"))
        else {
            return RunEnvelope::failure(
                "QDT Auto: dataset needs 'prospect' and 'utility' columns (optional: 'freq','experiment').",
            );
        };
        let freq_col = self.ds.column("freq");
        let experiment_idx = self.ds.header_index("experiment");

        // Buckets keep first-seen key order.
        let mut buckets: Vec<(String, Vec<Prospect>)> = Vec::new();
        for row in 0..self.ds.row_count() {
            let name = prospect_col.get(row);
            let utility_raw = utility_col.get(row);
            if name.trim().is_empty() || utility_raw.trim().is_empty() {
                continue;
            }
            // Parse failures drop the row entirely; nothing is substituted.
            let Ok(utility) = utility_raw.trim().parse::<f64>() else {
                log::debug!("qdt auto: row {row} dropped, unparseable utility '{utility_raw}'");
                continue;
            };
            let freq = match freq_col.map(|c| c.get(row)) {
                None | Some("") => None,
                Some(raw) => match raw.trim().parse::<f64>() {
                    Ok(f) => Some(f),
                    Err(_) => {
                        log::debug!("qdt auto: row {row} dropped, unparseable freq '{raw}'");
                        continue;
                    }
                },
            };
            // A ragged row without the experiment cell falls back to the
            // default group; an empty cell stays its own key.
            let key = match experiment_idx {
                Some(idx) => self.ds.rows[row]
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| "default".to_string()),
                None => "default".to_string(),
            };

            let prospect = Prospect::new(name, utility, freq);
            match buckets.iter_mut().find(|(k, _)| *k == key) {
                Some((_, list)) => list.push(prospect),
                None => buckets.push((key, vec![prospect])),
            }
        }
        if buckets.is_empty() {
            return RunEnvelope::failure("QDT Auto: no valid rows parsed.");
        }

        let mut rows: Vec<Vec<String>> = vec![
            ["experiment", "prospect", "utility", "utility_factor", "final_P"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ];
        for (key, prospects) in &buckets {
            let res = qdt::compute(prospects, 1.0, 0.25);
            if !res.ok {
                log::warn!("qdt auto: experiment group '{key}' failed weighting, skipped");
                continue;
            }
            for (i, name) in res.names.iter().enumerate() {
                rows.push(vec![
                    key.clone(),
                    name.clone(),
                    format!("{:.4}", prospects[i].utility),
                    format!("{:.4}", res.utility_factor[i]),
                    format!("{:.4}", res.probabilities[i]),
                ]);
            }
        }
        if rows.len() == 1 {
            return RunEnvelope::failure("QDT Auto: no experiment group produced a weighting.");
        }
        RunEnvelope::table(
            true,
            format!("QDT Auto: processed {} experiment group(s).", buckets.len()),
            "qdt_all",
            rows,
        )
    }

    /// CbD contextuality check over the A1/A2/B1/B2 outcome columns.
    pub fn run_cbd_all(&self) -> RunEnvelope {
        let columns: Option<Vec<_>> = ["A1", "A2", "B1", "B2"]
            .iter()
            .map(|h| self.ds.column(h))
            .collect();
        let Some(columns) = columns else {
            return RunEnvelope::failure("CbD Auto: needs columns A1,A2,B1,B2 with ±1 values.");
        };

        // Zero-fill policy: unparseable cells become 0.0 and the row stays
        // aligned; only the ±1 filters below exclude it from specific means.
        let series: Vec<Vec<f64>> = columns
            .iter()
            .map(|c| {
                c.iter()
                    .map(|cell| cell.trim().parse::<f64>().unwrap_or(0.0))
                    .collect()
            })
            .collect();
        let (a1, a2, b1, b2) = (&series[0], &series[1], &series[2], &series[3]);

        let res = cbd::check(
            signed_product_mean(a1, b1),
            signed_product_mean(a2, b1),
            signed_product_mean(a2, b2),
            signed_product_mean(a1, b2),
            signed_mean(a1),
            signed_mean(a2),
            signed_mean(b1),
            signed_mean(b2),
        );

        let rows = vec![
            vec!["Metric".to_string(), "Value".to_string()],
            vec!["S_odd".to_string(), format!("{:.4}", res.s_odd)],
            vec!["ICC".to_string(), format!("{:.4}", res.icc)],
            vec!["Threshold".to_string(), format!("{:.4}", 2.0 + res.icc)],
            vec!["Contextual?".to_string(), res.contextual.to_string()],
        ];
        RunEnvelope::table(
            res.ok,
            "CbD Auto: computed S_odd and ICC.".to_string(),
            "cbd",
            rows,
        )
    }

    /// Run all three analyses, each behind its own failure boundary: a
    /// panic inside one analysis becomes a failed envelope and the
    /// remaining analyses still run.
    pub fn run_all(&self) -> Vec<RunEnvelope> {
        vec![
            guard(|| self.run_hilbert_all(DEFAULT_PAIR_LIMIT)),
            guard(|| self.run_qdt_all()),
            guard(|| self.run_cbd_all()),
        ]
    }
}

/// Convert a panic into a failed envelope carrying its description.
fn guard(f: impl FnOnce() -> RunEnvelope) -> RunEnvelope {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(envelope) => envelope,
        Err(payload) => {
            let desc = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "analysis panicked".to_string());
            RunEnvelope::failure(format!("Error: {desc}"))
        }
    }
}

/// Mean over values exactly equal to ±1.0; 0.0 when none qualify.
fn signed_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
        if v == 1.0 || v == -1.0 {
            sum += v;
            count += 1;
        }
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Mean of products over row indices where both sides are exactly ±1.0.
fn signed_product_mean(a: &[f64], b: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (&x, &y) in a.iter().zip(b.iter()) {
        if (x == 1.0 || x == -1.0) && (y == 1.0 || y == -1.0) {
            sum += x * y;
            count += 1;
        }
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}
