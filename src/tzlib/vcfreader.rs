use crate::tzlib::{LocusParseError, LocusVcf};
use noodles_vcf::{self as vcf, variant::RecordBuf};
use serde::Serialize;
use std::io::{self, BufRead, ErrorKind};
use std::str::FromStr;

/// A 1-based, inclusive genomic span. A single position has start == end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locus {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Locus {
    pub fn contains(&self, chrom: &str, pos: u64) -> bool {
        self.chrom == chrom && self.start <= pos && pos <= self.end
    }
}

impl FromStr for Locus {
    type Err = LocusParseError;

    /// chrom:pos or chrom:start-end. The last ':' splits so contig names
    /// holding colons still parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || LocusParseError(s.to_string());
        let (chrom, span) = s.trim().rsplit_once(':').ok_or_else(err)?;
        if chrom.is_empty() {
            return Err(err());
        }

        let parse_pos = |p: &str| p.replace(',', "").parse::<u64>().map_err(|_| err());
        let (start, end) = match span.split_once('-') {
            Some((a, b)) => (parse_pos(a)?, parse_pos(b)?),
            None => {
                let p = parse_pos(span)?;
                (p, p)
            }
        };

        if start == 0 || end < start {
            return Err(err());
        }

        Ok(Locus {
            chrom: chrom.to_string(),
            start,
            end,
        })
    }
}

impl std::fmt::Display for Locus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}:{}", self.chrom, self.start)
        } else {
            write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
        }
    }
}

/// Streams a VCF and returns the records whose start falls on one of the
/// requested loci
pub struct LocusReader<R: BufRead> {
    pub m_vcf: vcf::io::Reader<R>,
    pub m_header: vcf::Header,
    loci: Vec<Locus>,
    hits: Vec<u64>,
    passonly: bool,
    pub read_count: u64,
    pub match_count: u64,
    pub skip_count: u64,
    /// Set when reading stopped on an I/O error rather than end of file
    pub error: Option<io::Error>,
}

impl<R: BufRead> LocusReader<R> {
    pub fn new(
        m_vcf: vcf::io::Reader<R>,
        m_header: vcf::Header,
        loci: Vec<Locus>,
        passonly: bool,
    ) -> Self {
        let hits = vec![0; loci.len()];
        Self {
            m_vcf,
            m_header,
            loci,
            hits,
            passonly,
            read_count: 0,
            match_count: 0,
            skip_count: 0,
            error: None,
        }
    }

    /// Each requested locus with the number of records yielded for it
    pub fn loci_hits(&self) -> impl Iterator<Item = (&Locus, u64)> {
        self.loci.iter().zip(self.hits.iter().copied())
    }

    /// Checks if entry is on a requested locus and, with --passonly, unfiltered
    fn filter_entry(&mut self, entry: &RecordBuf) -> bool {
        let chrom = entry.reference_sequence_name();
        let pos = entry.position();
        let matched: Vec<usize> = self
            .loci
            .iter()
            .enumerate()
            .filter(|(_, l)| l.contains(chrom, pos))
            .map(|(i, _)| i)
            .collect();
        if matched.is_empty() {
            return false;
        }

        if self.passonly && entry.is_filtered(&self.m_header) {
            debug!("{}:{} is filtered", chrom, pos);
            return false;
        }

        for i in matched {
            self.hits[i] += 1;
        }
        true
    }
}

impl<R: BufRead> Iterator for LocusReader<R> {
    type Item = RecordBuf;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() {
            return None;
        }
        let mut entry = RecordBuf::default();

        loop {
            match self.m_vcf.read_record_buf(&self.m_header, &mut entry) {
                Ok(0) => {
                    info!(
                        "{} records read, {} on requested loci",
                        self.read_count, self.match_count
                    );
                    if self.skip_count != 0 {
                        warn!("{} records skipped as unparsable", self.skip_count);
                    }
                    return None;
                }
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    error!("skipping invalid VCF entry {:?}", e);
                    self.skip_count += 1;
                    continue;
                }
                Err(e) => {
                    error!("unable to read VCF {:?}", e);
                    self.error = Some(e);
                    return None;
                }
                Ok(_) => {
                    self.read_count += 1;
                    if self.filter_entry(&entry) {
                        self.match_count += 1;
                        return Some(entry);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_position() {
        let l: Locus = "chr1:12345".parse().unwrap();
        assert_eq!(
            l,
            Locus {
                chrom: "chr1".to_string(),
                start: 12345,
                end: 12345
            }
        );
        assert_eq!(l.to_string(), "chr1:12345");
        assert!(l.contains("chr1", 12345));
        assert!(!l.contains("chr1", 12346));
        assert!(!l.contains("chr2", 12345));
    }

    #[test]
    fn test_parse_span() {
        let l: Locus = "chr17:7,673,700-7,673,800".parse().unwrap();
        assert_eq!(l.start, 7_673_700);
        assert_eq!(l.end, 7_673_800);
        assert!(l.contains("chr17", 7_673_750));
        assert_eq!(l.to_string(), "chr17:7673700-7673800");
    }

    #[test]
    fn test_parse_colon_contig() {
        let l: Locus = "HLA-A*01:01:01:01:100".parse().unwrap();
        assert_eq!(l.chrom, "HLA-A*01:01:01:01");
        assert_eq!(l.start, 100);
    }

    #[test]
    fn test_parse_bad() {
        for bad in ["chr1", "chr1:", ":100", "chr1:0", "chr1:50-10", "chr1:abc"] {
            assert!(bad.parse::<Locus>().is_err(), "{} should fail", bad);
        }
    }
}
