use noodles_vcf::{
    variant::record::Filters,
    variant::record_buf::samples::sample::value::{Array, Value},
    variant::RecordBuf,
    Header,
};
use std::collections::HashMap;

/// FORMAT key name to its column in the sample fields
pub type FormatMap = HashMap<String, usize>;

pub trait LocusVcf {
    fn position(&self) -> u64;
    fn alt_alleles(&self) -> &[String];
    fn format_map(&self) -> FormatMap;
    fn sample_field(&self, sample_idx: usize, field_idx: usize) -> Option<&Value>;
    fn is_filtered(&self, header: &Header) -> bool;
}

impl LocusVcf for RecordBuf {
    /// 1-based start of the entry, 0 if unset
    fn position(&self) -> u64 {
        self.variant_start()
            .map(|p| usize::from(p) as u64)
            .unwrap_or(0)
    }

    fn alt_alleles(&self) -> &[String] {
        self.alternate_bases().as_ref()
    }

    /// FORMAT order differs between callers, so fields are found by name
    fn format_map(&self) -> FormatMap {
        self.samples()
            .keys()
            .as_ref()
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect()
    }

    fn sample_field(&self, sample_idx: usize, field_idx: usize) -> Option<&Value> {
        self.samples()
            .get_index(sample_idx)
            .and_then(|s| s.values().get(field_idx))
            .and_then(|v| v.as_ref())
    }

    /// checks if an entry's FILTER is '.' or PASS, true if it is filtered
    fn is_filtered(&self, header: &Header) -> bool {
        !(self.filters().is_empty()
            || self.filters().iter(header).any(|res| match res {
                Ok(s) => s == "PASS",
                Err(_) => false,
            }))
    }
}

/// Read a FORMAT value as a list of optional integers, one per element.
/// '.' elements become None. Floats must hold whole numbers and strings
/// must parse as comma separated integers.
pub fn value_to_counts(value: Option<&Value>) -> Result<Vec<Option<i64>>, String> {
    let value = match value {
        None => return Ok(vec![None]),
        Some(v) => v,
    };

    match value {
        Value::Integer(n) => Ok(vec![Some(*n as i64)]),
        Value::Float(f) => Ok(vec![Some(float_count(*f)?)]),
        Value::String(s) => s.split(',').map(parse_count).collect(),
        Value::Array(Array::Integer(vals)) => Ok(vals.iter().map(|v| v.map(i64::from)).collect()),
        Value::Array(Array::Float(vals)) => vals
            .iter()
            .map(|v| v.map(float_count).transpose())
            .collect(),
        Value::Array(Array::String(vals)) => vals
            .iter()
            .map(|v| match v {
                Some(s) => parse_count(s),
                None => Ok(None),
            })
            .collect(),
        other => Err(format!("{:?}", other)),
    }
}

fn float_count(f: f32) -> Result<i64, String> {
    if f.is_finite() && f.trunc() == f {
        Ok(f as i64)
    } else {
        Err(f.to_string())
    }
}

fn parse_count(s: &str) -> Result<Option<i64>, String> {
    match s.trim() {
        "." | "" => Ok(None),
        t => t.parse::<i64>().map(Some).map_err(|_| t.to_string()),
    }
}
