//! Aggregation of regret traces into per-policy summaries.

use indexmap::IndexMap;
use ndarray::{Array1, Array2, Axis};
use ordered_float::OrderedFloat;

use crate::error::{BanditError, Result};
use crate::harness::RegretTrace;

/// Number of quantile levels: 0, 0.05, ..., 1
pub const N_QUANTILES: usize = 21;

/// The quantile levels reported in [`PolicySummary::quantiles`]
pub fn quantile_levels() -> [f64; N_QUANTILES] {
    std::array::from_fn(|i| i as f64 / (N_QUANTILES - 1) as f64)
}

/// Aggregated regret statistics of one policy
#[derive(Clone, Debug, PartialEq)]
pub struct PolicySummary {
    /// Mean cumulative regret after each round
    pub mean_regret: Vec<f64>,
    /// Quantiles of the final cumulative regret across trials, at [`quantile_levels`]
    pub quantiles: Vec<f64>,
    /// Mean final cumulative regret
    pub mean: f64,
    /// Population standard deviation of the final cumulative regret
    pub std: f64,
    /// Mean information ratio per round, when every trace carries one
    pub information_ratio: Option<Vec<f64>>,
    /// Degenerate IDS rounds summed over trials
    pub degenerate_rounds: usize,
    /// Raw cumulative regret, one row per trial
    pub regret: Array2<f64>,
}

impl PolicySummary {
    /// Summarize a batch of traces of equal length
    pub fn from_traces(traces: &[RegretTrace]) -> Result<Self> {
        let regret = regret_matrix(traces)?;
        let horizon = regret.ncols();

        let mean_regret = column_means(&regret)?;
        let final_regret: Vec<f64> = regret.column(horizon - 1).to_vec();
        let quantiles = quantiles(&final_regret, &quantile_levels())?;
        let final_regret = Array1::from(final_regret);
        let mean = final_regret
            .mean()
            .ok_or_else(|| BanditError::invalid("cannot summarize an empty batch"))?;
        let std = final_regret.std(0.0);

        let information_ratio = information_ratio_curve(traces, horizon)?;
        let degenerate_rounds = traces.iter().map(|t| t.degenerate_rounds).sum();

        Ok(Self {
            mean_regret,
            quantiles,
            mean,
            std,
            information_ratio,
            degenerate_rounds,
            regret,
        })
    }

    pub fn n_trials(&self) -> usize {
        self.regret.nrows()
    }

    pub fn horizon(&self) -> usize {
        self.regret.ncols()
    }
}

/// Per-policy summaries in registration order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExperimentResult {
    policies: IndexMap<String, PolicySummary>,
}

impl ExperimentResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, label: String, summary: PolicySummary) {
        self.policies.insert(label, summary);
    }

    pub fn get(&self, label: &str) -> Option<&PolicySummary> {
        self.policies.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PolicySummary)> {
        self.policies
            .iter()
            .map(|(label, summary)| (label.as_str(), summary))
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// Stack traces into an `n_trials × horizon` matrix
pub fn regret_matrix(traces: &[RegretTrace]) -> Result<Array2<f64>> {
    let horizon = common_horizon(traces)?;
    let mut matrix = Array2::zeros((traces.len(), horizon));
    for (mut row, trace) in matrix.axis_iter_mut(Axis(0)).zip(traces) {
        row.assign(&Array1::from(trace.cumulative.clone()));
    }
    Ok(matrix)
}

/// Quantiles of `values` at each of `levels`, interpolating linearly between
/// order statistics
pub fn quantiles(values: &[f64], levels: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(BanditError::invalid("cannot take quantiles of no values"));
    }
    if let Some(level) = levels.iter().find(|l| !(0.0..=1.0).contains(*l)) {
        return Err(BanditError::invalid(format!(
            "quantile level must be in [0, 1], got {level}"
        )));
    }

    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort();
    let last = sorted.len() - 1;

    Ok(levels
        .iter()
        .map(|&level| {
            let position = level * last as f64;
            let lo = (position.floor() as usize).min(last);
            let hi = (position.ceil() as usize).min(last);
            let fraction = position - lo as f64;
            sorted[lo].0 + fraction * (sorted[hi].0 - sorted[lo].0)
        })
        .collect())
}

fn common_horizon(traces: &[RegretTrace]) -> Result<usize> {
    let first = traces
        .first()
        .ok_or_else(|| BanditError::invalid("cannot summarize an empty batch"))?;
    let horizon = first.len();
    if horizon == 0 {
        return Err(BanditError::invalid("cannot summarize empty traces"));
    }
    if let Some(trace) = traces.iter().find(|t| t.len() != horizon) {
        return Err(BanditError::invalid(format!(
            "traces have unequal lengths {horizon} and {}",
            trace.len()
        )));
    }
    Ok(horizon)
}

fn column_means(matrix: &Array2<f64>) -> Result<Vec<f64>> {
    matrix
        .mean_axis(Axis(0))
        .map(|means| means.to_vec())
        .ok_or_else(|| BanditError::invalid("cannot summarize an empty batch"))
}

fn information_ratio_curve(traces: &[RegretTrace], horizon: usize) -> Result<Option<Vec<f64>>> {
    let Some(rows) = traces
        .iter()
        .map(|t| t.information_ratio.as_ref())
        .collect::<Option<Vec<_>>>()
    else {
        return Ok(None);
    };
    if rows.iter().any(|r| r.len() != horizon) {
        return Err(BanditError::invalid(
            "information ratio traces do not match the horizon",
        ));
    }

    let mut matrix = Array2::zeros((rows.len(), horizon));
    for (mut row, ratios) in matrix.axis_iter_mut(Axis(0)).zip(rows) {
        row.assign(&Array1::from(ratios.clone()));
    }
    column_means(&matrix).map(Some)
}
