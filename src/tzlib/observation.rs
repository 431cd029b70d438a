use crate::tzlib::{tarone, TaroneError, TaroneResult};
use serde::Serialize;

/// One sample's read counts at a locus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub sample: Option<String>,
    /// Total read depth
    pub trials: u32,
    /// Reads supporting the alternate allele
    pub successes: u32,
}

impl Observation {
    pub fn new(trials: u32, successes: u32) -> Self {
        Self {
            sample: None,
            trials,
            successes,
        }
    }

    pub fn named(sample: &str, trials: u32, successes: u32) -> Self {
        Self {
            sample: Some(sample.to_string()),
            trials,
            successes,
        }
    }
}

/// All samples' observations for a single locus and alternate allele.
/// Built per locus, consumed by the test and thrown away.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObservationSet {
    observations: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Pair up two parallel count slices. Lengths must match.
    pub fn from_counts(trials: &[u32], successes: &[u32]) -> Result<Self, TaroneError> {
        if trials.len() != successes.len() {
            return Err(TaroneError::ShapeMismatch {
                trials: trials.len(),
                successes: successes.len(),
            });
        }
        Ok(Self::new(
            trials
                .iter()
                .zip(successes.iter())
                .map(|(&n, &m)| Observation::new(n, m))
                .collect(),
        ))
    }

    pub fn push(&mut self, obs: Observation) {
        self.observations.push(obs);
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn trials(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.trials as f64).collect()
    }

    pub fn successes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.successes as f64).collect()
    }

    pub fn total_trials(&self) -> u64 {
        self.observations.iter().map(|o| o.trials as u64).sum()
    }

    pub fn total_successes(&self) -> u64 {
        self.observations.iter().map(|o| o.successes as u64).sum()
    }

    /// Run Tarone's Z test over this set
    pub fn tarone(&self) -> Result<TaroneResult, TaroneError> {
        tarone::run(&self.trials(), &self.successes())
    }
}

impl FromIterator<Observation> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
