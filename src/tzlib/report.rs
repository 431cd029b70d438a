use crate::tzlib::{AlleleObservations, TaroneResult};
use itertools::Itertools;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// One tested alternate allele at a locus
#[derive(Debug, Clone, Serialize)]
pub struct LocusReport {
    pub chrom: String,
    pub pos: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub allele_index: usize,
    pub samples: usize,
    pub missing: usize,
    pub zero_depth: usize,
    pub total_depth: u64,
    pub total_alt: u64,
    pub pooled_proportion: f64,
    pub z_statistic: f64,
    pub p_value: f64,
    pub overdispersed: bool,
    pub error: Option<String>,
}

impl LocusReport {
    pub fn new(
        chrom: &str,
        pos: u64,
        ref_allele: &str,
        allele: &AlleleObservations,
        result: Result<&TaroneResult, String>,
        min_z: f64,
    ) -> Self {
        let (pooled_proportion, z_statistic, p_value, overdispersed, error) = match result {
            Ok(r) => (
                r.pooled_proportion,
                r.z_statistic,
                r.p_value,
                r.is_overdispersed(min_z),
                None,
            ),
            Err(e) => (f64::NAN, f64::NAN, f64::NAN, false, Some(e)),
        };

        Self {
            chrom: chrom.to_string(),
            pos,
            ref_allele: ref_allele.to_string(),
            alt_allele: allele.alt_allele.clone(),
            allele_index: allele.allele_index,
            samples: allele.observations.len(),
            missing: allele.missing,
            zero_depth: allele.zero_depth,
            total_depth: allele.observations.total_trials(),
            total_alt: allele.observations.total_successes(),
            pooled_proportion,
            z_statistic,
            p_value,
            overdispersed,
            error,
        }
    }

    pub fn tsv_header() -> &'static str {
        "chrom\tpos\tref\talt\tallele_index\tsamples\tmissing\tzero_depth\ttotal_depth\ttotal_alt\tpooled_proportion\tz_statistic\tp_value\toverdispersed\terror"
    }

    pub fn to_tsv(&self) -> String {
        [
            self.chrom.clone(),
            self.pos.to_string(),
            self.ref_allele.clone(),
            self.alt_allele.clone(),
            self.allele_index.to_string(),
            self.samples.to_string(),
            self.missing.to_string(),
            self.zero_depth.to_string(),
            self.total_depth.to_string(),
            self.total_alt.to_string(),
            self.pooled_proportion.to_string(),
            self.z_statistic.to_string(),
            self.p_value.to_string(),
            self.overdispersed.to_string(),
            self.error.clone().unwrap_or_else(|| ".".to_string()),
        ]
        .iter()
        .join("\t")
    }
}

/// Writes reports as a TSV table or as JSON lines.
/// NaN statistics become `null` in JSON.
pub struct ReportWriter {
    writer: BufWriter<Box<dyn Write>>,
    json: bool,
    header_written: bool,
    pub written: u64,
    pub overdispersed: u64,
}

impl ReportWriter {
    /// Output to a file, or stdout when no path is given
    pub fn new(out_path: &Option<PathBuf>, json: bool) -> io::Result<Self> {
        let out: Box<dyn Write> = match out_path {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout()),
        };
        Ok(Self::from_writer(out, json))
    }

    pub fn from_writer(out: Box<dyn Write>, json: bool) -> Self {
        Self {
            writer: BufWriter::new(out),
            json,
            header_written: false,
            written: 0,
            overdispersed: 0,
        }
    }

    pub fn write(&mut self, report: &LocusReport) -> io::Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.writer, report)?;
            writeln!(self.writer)?;
        } else {
            if !self.header_written {
                writeln!(self.writer, "{}", LocusReport::tsv_header())?;
                self.header_written = true;
            }
            writeln!(self.writer, "{}", report.to_tsv())?;
        }
        self.written += 1;
        if report.overdispersed {
            self.overdispersed += 1;
        }
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tzlib::{Observation, ObservationSet};
    use std::sync::{Arc, Mutex};

    /// Write sink tests can read back
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn allele() -> AlleleObservations {
        AlleleObservations {
            allele_index: 0,
            alt_allele: "T".to_string(),
            observations: ObservationSet::new(vec![
                Observation::named("s1", 10, 2),
                Observation::named("s2", 20, 18),
            ]),
            missing: 1,
            zero_depth: 0,
        }
    }

    #[test]
    fn test_report_from_result() {
        let a = allele();
        let res = a.observations.tarone().unwrap();
        let rep = LocusReport::new("chr1", 100, "C", &a, Ok(&res), 3.0);
        assert_eq!(rep.samples, 2);
        assert_eq!(rep.total_depth, 30);
        assert_eq!(rep.total_alt, 20);
        assert!(rep.overdispersed);
        assert!(rep.error.is_none());
        let line = rep.to_tsv();
        assert!(line.starts_with("chr1\t100\tC\tT\t0\t2\t1\t0\t30\t20\t"));
        assert!(line.ends_with("\ttrue\t."));
        assert_eq!(
            line.split('\t').count(),
            LocusReport::tsv_header().split('\t').count()
        );
    }

    #[test]
    fn test_report_from_error() {
        let mut a = allele();
        a.observations = ObservationSet::default();
        let err = a.observations.tarone().unwrap_err();
        let rep = LocusReport::new("chr1", 100, "C", &a, Err(err.to_string()), 3.0);
        assert!(rep.z_statistic.is_nan());
        assert!(!rep.overdispersed);
        assert_eq!(rep.error.as_deref(), Some("no observations supplied"));
    }

    #[test]
    fn test_writer_formats() {
        let a = allele();
        let res = a.observations.tarone().unwrap();
        let rep = LocusReport::new("chr1", 100, "C", &a, Ok(&res), 3.0);

        let buf = SharedBuf::default();
        let mut w = ReportWriter::from_writer(Box::new(buf.clone()), false);
        w.write(&rep).unwrap();
        w.write(&rep).unwrap();
        assert_eq!(w.written, 2);
        assert_eq!(w.overdispersed, 2);
        w.finish().unwrap();
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], LocusReport::tsv_header());

        let buf = SharedBuf::default();
        let mut w = ReportWriter::from_writer(Box::new(buf.clone()), true);
        w.write(&rep).unwrap();
        w.finish().unwrap();
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["chrom"], "chr1");
        assert_eq!(parsed["overdispersed"], true);
        assert_eq!(parsed["error"], serde_json::Value::Null);
    }

    #[test]
    fn test_writer_failed_row() {
        let mut a = allele();
        a.observations = ObservationSet::default();
        let err = a.observations.tarone().unwrap_err();
        let rep = LocusReport::new("chr1", 100, "C", &a, Err(err.to_string()), 3.0);

        let buf = SharedBuf::default();
        let mut w = ReportWriter::from_writer(Box::new(buf.clone()), true);
        w.write(&rep).unwrap();
        assert_eq!(w.overdispersed, 0);
        w.finish().unwrap();
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["pooled_proportion"], serde_json::Value::Null);
        assert_eq!(parsed["z_statistic"], serde_json::Value::Null);
        assert_eq!(parsed["p_value"], serde_json::Value::Null);
        assert_eq!(parsed["overdispersed"], false);
        assert_eq!(parsed["error"], "no observations supplied");
        assert_eq!(parsed["missing"], 1);

        let line = rep.to_tsv();
        assert!(line.contains("\tNaN\tNaN\tNaN\tfalse\t"));
    }
}
