use crate::tzlib::{vcf_traits::value_to_counts, ExtractError, LocusVcf, Observation, ObservationSet};
use noodles_vcf::variant::RecordBuf;

/// Per-sample counts for one alternate allele of a record, plus the tally of
/// samples that were left out
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleObservations {
    pub allele_index: usize,
    pub alt_allele: String,
    pub observations: ObservationSet,
    /// Samples with a '.' depth or alternate count
    pub missing: usize,
    /// Samples with a depth of 0
    pub zero_depth: usize,
}

/// Pulls depth and alternate allele counts out of multi-sample records.
/// Samples are resolved to columns once; FORMAT fields are found by name on
/// every record.
#[derive(Debug, Clone)]
pub struct LocusExtractor {
    samples: Vec<(String, usize)>,
    depth_field: String,
    alt_field: String,
}

impl LocusExtractor {
    /// `header_samples` are the header's sample columns in order. `selection`
    /// restricts the test to the named samples, otherwise all are used.
    pub fn new<S: AsRef<str>>(
        header_samples: &[String],
        selection: Option<&[S]>,
        depth_field: &str,
        alt_field: &str,
    ) -> Result<Self, ExtractError> {
        let samples = match selection {
            None => header_samples
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect(),
            Some(names) => names
                .iter()
                .map(|name| {
                    let name = name.as_ref();
                    header_samples
                        .iter()
                        .position(|s| s == name)
                        .map(|i| (name.to_string(), i))
                        .ok_or_else(|| ExtractError::UnknownSample(name.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self {
            samples,
            depth_field: depth_field.to_string(),
            alt_field: alt_field.to_string(),
        })
    }

    pub fn sample_names(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|(name, _)| name.as_str())
    }

    /// One `AlleleObservations` per ALT allele of the record. Multi-allelic
    /// records are split using the per-allele alternate counts.
    pub fn extract(&self, record: &RecordBuf) -> Result<Vec<AlleleObservations>, ExtractError> {
        let fmt = record.format_map();
        let dp_idx = *fmt
            .get(&self.depth_field)
            .ok_or_else(|| ExtractError::MissingField(self.depth_field.clone()))?;
        let ao_idx = *fmt
            .get(&self.alt_field)
            .ok_or_else(|| ExtractError::MissingField(self.alt_field.clone()))?;

        let alts = record.alt_alleles();
        let mut ret: Vec<AlleleObservations> = alts
            .iter()
            .enumerate()
            .map(|(allele_index, alt)| AlleleObservations {
                allele_index,
                alt_allele: alt.clone(),
                observations: ObservationSet::default(),
                missing: 0,
                zero_depth: 0,
            })
            .collect();

        for (name, col) in &self.samples {
            let depth = self.read_field(record, name, *col, dp_idx, &self.depth_field)?;
            let depth = depth.first().copied().flatten();
            let alt_counts = self.read_field(record, name, *col, ao_idx, &self.alt_field)?;
            if alt_counts.len() < ret.len() && alt_counts.iter().any(Option::is_some) {
                warn!(
                    "{}:{} sample {} has {} {} values for {} ALT alleles",
                    record.reference_sequence_name(),
                    record.position(),
                    name,
                    alt_counts.len(),
                    self.alt_field,
                    ret.len()
                );
            }

            for (allele, entry) in ret.iter_mut().enumerate() {
                let alt_count = alt_counts.get(allele).copied().flatten();
                match (depth, alt_count) {
                    (Some(dp), Some(ao)) if ao > dp => {
                        return Err(ExtractError::AltExceedsDepth {
                            sample: name.clone(),
                            alt: ao,
                            depth: dp,
                        });
                    }
                    (Some(0), _) => entry.zero_depth += 1,
                    (Some(dp), Some(ao)) => {
                        entry.observations.push(Observation::named(name, dp, ao));
                    }
                    _ => {
                        debug!(
                            "{}:{} sample {} missing {}/{}",
                            record.reference_sequence_name(),
                            record.position(),
                            name,
                            self.depth_field,
                            self.alt_field
                        );
                        entry.missing += 1;
                    }
                }
            }
        }

        Ok(ret)
    }

    /// Decode a sample's field into non-negative counts, '.' kept as None
    fn read_field(
        &self,
        record: &RecordBuf,
        sample: &str,
        col: usize,
        field_idx: usize,
        field: &str,
    ) -> Result<Vec<Option<u32>>, ExtractError> {
        let raw = value_to_counts(record.sample_field(col, field_idx)).map_err(|value| {
            ExtractError::InvalidValue {
                sample: sample.to_string(),
                field: field.to_string(),
                value,
            }
        })?;

        raw.into_iter()
            .map(|v| match v {
                None => Ok(None),
                Some(n) if n < 0 => Err(ExtractError::NegativeValue {
                    sample: sample.to_string(),
                    field: field.to_string(),
                    value: n,
                }),
                Some(n) => u32::try_from(n).map(Some).map_err(|_| ExtractError::InvalidValue {
                    sample: sample.to_string(),
                    field: field.to_string(),
                    value: n.to_string(),
                }),
            })
            .collect()
    }
}
