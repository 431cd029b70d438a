use crate::tzlib::{metrics, ObservationSet, TaroneError};
use serde::Serialize;

pub const METHOD: &str = "Tarone's Z test";
pub const NULL_HYPOTHESIS: &str =
    "successes follow a binomial distribution with a single shared probability";
pub const ALTERNATIVE: &str = "greater";

/// Outcome of Tarone's Z test for one locus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaroneResult {
    pub pooled_proportion: f64,
    pub z_statistic: f64,
    pub p_value: f64,
    pub samples: usize,
    pub method: &'static str,
    pub null_hypothesis: &'static str,
    pub alternative: &'static str,
}

impl TaroneResult {
    /// True when z is finite and strictly above the threshold
    pub fn is_overdispersed(&self, min_z: f64) -> bool {
        self.z_statistic.is_finite() && self.z_statistic > min_z
    }
}

/// Tarone's (1979) Z test for overdispersion of binomial counts.
///
/// Compares the spread of the per-sample proportions `successes[i] / trials[i]`
/// against what a single pooled binomial probability would give.
///
/// # Parameters
/// - `trials`: Read depth per sample. Whole numbers >= 1.
/// - `successes`: Alternate allele reads per sample, positionally paired with `trials`.
///
/// # Returns
/// A `TaroneResult` holding the pooled proportion, the Z score and the
/// two-sided p-value `2 * Phi(-|z|)`. The p-value is two-sided even though only
/// positive Z indicates overdispersion.
///
/// The Z score is not guaranteed finite: when every trial count is 1 the
/// denominator is zero, and when no sample has a success every residual is 0/0.
/// Both surface as NaN rather than an error.
///
/// # Errors
/// Input validation happens before any arithmetic, in order: matching lengths,
/// at least one observation, valid trials, valid successes, then
/// `successes[i] <= trials[i]`.
pub fn run(trials: &[f64], successes: &[f64]) -> Result<TaroneResult, TaroneError> {
    validate(trials, successes)?;

    let sum_n: f64 = trials.iter().sum();
    let sum_m: f64 = successes.iter().sum();
    let p_hat = sum_m / sum_n;

    let s = if p_hat == 1.0 {
        sum_n
    } else {
        let var = p_hat * (1.0 - p_hat);
        trials
            .iter()
            .zip(successes.iter())
            .map(|(&n, &m)| (m - n * p_hat).powi(2) / var)
            .sum()
    };

    let pairs: f64 = trials.iter().map(|&n| n * (n - 1.0)).sum();
    let z_statistic = (s - sum_n) / (2.0 * pairs).sqrt();
    debug!(
        "tarone n={} p_hat={} S={} z={}",
        trials.len(),
        p_hat,
        s,
        z_statistic
    );

    Ok(TaroneResult {
        pooled_proportion: p_hat,
        z_statistic,
        p_value: metrics::two_sided_pvalue(z_statistic),
        samples: trials.len(),
        method: METHOD,
        null_hypothesis: NULL_HYPOTHESIS,
        alternative: ALTERNATIVE,
    })
}

/// Integer flavored entry point for callers holding raw counts
pub fn run_counts(trials: &[u32], successes: &[u32]) -> Result<TaroneResult, TaroneError> {
    ObservationSet::from_counts(trials, successes)?.tarone()
}

fn validate(trials: &[f64], successes: &[f64]) -> Result<(), TaroneError> {
    if trials.len() != successes.len() {
        return Err(TaroneError::ShapeMismatch {
            trials: trials.len(),
            successes: successes.len(),
        });
    }

    if trials.is_empty() {
        return Err(TaroneError::EmptyInput);
    }

    if let Some((index, &value)) = trials
        .iter()
        .enumerate()
        .find(|&(_, &n)| !(metrics::is_whole(n) && n >= 1.0))
    {
        return Err(TaroneError::InvalidTrials { index, value });
    }

    if let Some((index, &value)) = successes
        .iter()
        .enumerate()
        .find(|&(_, &m)| !(metrics::is_whole(m) && m >= 0.0))
    {
        return Err(TaroneError::InvalidSuccesses { index, value });
    }

    if let Some((index, (&n, &m))) = trials
        .iter()
        .zip(successes.iter())
        .enumerate()
        .find(|&(_, (&n, &m))| m > n)
    {
        return Err(TaroneError::SuccessesExceedTrials {
            index,
            successes: m,
            trials: n,
        });
    }

    Ok(())
}
