//! Interval forecasting: an ARIMA model over inter-event gaps.
//!
//! The forecaster turns an irregular sequence of historical occurrence
//! timestamps into a gap series (fractional days between consecutive
//! occurrences), fits ARIMA(p,d,q) to that series by conditional sum
//! of squares, forecasts the next `steps` gaps, and reconstructs
//! absolute timestamps by cumulative-summing the forecast gaps onto
//! the last known occurrence.
//!
//! The fit is plain f64 arithmetic: a coordinate-descent minimizer over
//! the intercept and AR/MA coefficients. Forecast output is not clamped
//! to be positive or monotonic; an unstable gap forecast flows through
//! to the caller as-is.

use crate::types::{CadenceError, EpochMs, MS_PER_DAY, PredictionEntry};

/// Minimum number of history points required to fit the model.
pub const MIN_HISTORY_POINTS: usize = 3;

/// Default number of forecast steps per run.
pub const DEFAULT_STEPS: usize = 10;

const MAX_SWEEPS: usize = 200;
const INITIAL_STEP: f64 = 0.1;
const STEP_TOLERANCE: f64 = 1e-7;
/// Stationarity/invertibility guard on AR and MA coefficients.
const COEFF_LIMIT: f64 = 0.99;

// ─── Order ────────────────────────────────────────────────────────

/// ARIMA model order (autoregressive, differencing, moving-average).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self { p: 1, d: 1, q: 1 }
    }
}

// ─── Forecaster ───────────────────────────────────────────────────

/// Forecasts future occurrence timestamps from a history of past ones.
///
/// Pure function of its input and configured order; no side effects.
#[derive(Debug, Clone, Default)]
pub struct IntervalForecaster {
    order: ArimaOrder,
}

impl IntervalForecaster {
    pub fn new(order: ArimaOrder) -> Self {
        Self { order }
    }

    /// Forecast the next `steps` occurrences.
    ///
    /// Requires at least [`MIN_HISTORY_POINTS`] distinct timestamps.
    /// Returns entries in forecast order with `predicted: true`.
    pub fn forecast_timestamps(
        &self,
        history: &[EpochMs],
        steps: usize,
    ) -> Result<Vec<PredictionEntry>, CadenceError> {
        let mut sorted: Vec<EpochMs> = history.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        if sorted.len() < MIN_HISTORY_POINTS {
            return Err(CadenceError::InsufficientData {
                points: sorted.len(),
                required: MIN_HISTORY_POINTS,
            });
        }

        let gaps: Vec<f64> = sorted
            .windows(2)
            .map(|w| (w[1] - w[0]) as f64 / MS_PER_DAY as f64)
            .collect();
        if gaps.len() < 2 {
            return Err(CadenceError::InsufficientData {
                points: gaps.len(),
                required: 2,
            });
        }

        let model = fit(&gaps, self.order)?;
        let gap_forecast = model.forecast(steps);

        let last = sorted[sorted.len() - 1];
        let mut cumulative = 0.0;
        let mut out = Vec::with_capacity(steps);
        for gap in gap_forecast {
            cumulative += gap;
            let timestamp = last + (cumulative * MS_PER_DAY as f64).round() as EpochMs;
            out.push(PredictionEntry::new(timestamp));
        }
        Ok(out)
    }
}

// ─── Fit ──────────────────────────────────────────────────────────

/// A fitted ARIMA model, carrying everything the forecast recursion
/// needs: parameters, the differenced series, its in-sample residuals,
/// and the last value at each differencing level for integration.
struct FittedArima {
    order: ArimaOrder,
    /// `[intercept, ar_1..ar_p, ma_1..ma_q]`.
    params: Vec<f64>,
    diffed: Vec<f64>,
    residuals: Vec<f64>,
    /// Last value of each differencing level, innermost (original
    /// gap scale) first.
    level_tails: Vec<f64>,
}

fn fit(gaps: &[f64], order: ArimaOrder) -> Result<FittedArima, CadenceError> {
    let mut diffed = gaps.to_vec();
    let mut level_tails = Vec::with_capacity(order.d);
    for _ in 0..order.d {
        if diffed.len() < 2 {
            return Err(CadenceError::ModelFit(format!(
                "series of {} gaps cannot be differenced {} times",
                gaps.len(),
                order.d
            )));
        }
        level_tails.push(diffed[diffed.len() - 1]);
        diffed = diffed.windows(2).map(|w| w[1] - w[0]).collect();
    }

    let params = minimize_css(&diffed, order.p, order.q)?;
    let (_, residuals) = css(&diffed, order.p, order.q, &params);

    Ok(FittedArima {
        order,
        params,
        diffed,
        residuals,
        level_tails,
    })
}

/// Conditional-sum-of-squares objective for ARMA(p,q) with intercept.
///
/// Pre-sample values and residuals are treated as zero. Returns the
/// squared-residual sum and the in-sample residual sequence.
fn css(w: &[f64], p: usize, q: usize, params: &[f64]) -> (f64, Vec<f64>) {
    let c = params[0];
    let ar = &params[1..1 + p];
    let ma = &params[1 + p..1 + p + q];

    let mut residuals = vec![0.0; w.len()];
    let mut cost = 0.0;
    for t in 0..w.len() {
        let mut pred = c;
        for (i, phi) in ar.iter().enumerate() {
            if t > i {
                pred += phi * w[t - 1 - i];
            }
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                pred += theta * residuals[t - 1 - j];
            }
        }
        let eps = w[t] - pred;
        residuals[t] = eps;
        cost += eps * eps;
    }
    (cost, residuals)
}

/// Coordinate descent over `[c, ar.., ma..]` with shrinking step sizes.
///
/// Deterministic: starts from `c = mean(w)`, zero coefficients, and
/// only accepts strictly improving finite steps. A non-finite objective
/// at the starting point is a fit failure.
fn minimize_css(w: &[f64], p: usize, q: usize) -> Result<Vec<f64>, CadenceError> {
    let n_params = 1 + p + q;
    let mut params = vec![0.0; n_params];
    if !w.is_empty() {
        params[0] = w.iter().sum::<f64>() / w.len() as f64;
    }

    let (mut best, _) = css(w, p, q, &params);
    if !best.is_finite() {
        return Err(CadenceError::ModelFit(
            "non-finite objective at initial parameters".into(),
        ));
    }

    let mut step = INITIAL_STEP;
    for _ in 0..MAX_SWEEPS {
        let mut improved = false;
        for k in 0..n_params {
            for direction in [1.0, -1.0] {
                let mut candidate = params.clone();
                candidate[k] += direction * step;
                if k > 0 {
                    candidate[k] = candidate[k].clamp(-COEFF_LIMIT, COEFF_LIMIT);
                }
                let (cost, _) = css(w, p, q, &candidate);
                if cost.is_finite() && cost < best {
                    best = cost;
                    params = candidate;
                    improved = true;
                    break;
                }
            }
        }
        if !improved {
            step *= 0.5;
            if step < STEP_TOLERANCE {
                break;
            }
        }
    }

    Ok(params)
}

impl FittedArima {
    /// Forecast `steps` values ahead on the original gap scale.
    ///
    /// Future residuals are zero; each differenced forecast is
    /// integrated back through the differencing levels.
    fn forecast(&self, steps: usize) -> Vec<f64> {
        let p = self.order.p;
        let q = self.order.q;
        let c = self.params[0];
        let ar = &self.params[1..1 + p];
        let ma = &self.params[1 + p..1 + p + q];

        let mut w = self.diffed.clone();
        let mut residuals = self.residuals.clone();
        let mut tails = self.level_tails.clone();

        let mut out = Vec::with_capacity(steps);
        for _ in 0..steps {
            let t = w.len();
            let mut next = c;
            for (i, phi) in ar.iter().enumerate() {
                if t > i {
                    next += phi * w[t - 1 - i];
                }
            }
            for (j, theta) in ma.iter().enumerate() {
                if t > j {
                    next += theta * residuals[t - 1 - j];
                }
            }
            w.push(next);
            residuals.push(0.0);

            let mut value = next;
            for tail in tails.iter_mut().rev() {
                value += *tail;
                *tail = value;
            }
            out.push(value);
        }
        out
    }
}

// ─── Tests ────────────────────────────────────────────────────────
