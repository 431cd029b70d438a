use crate::tzlib::Locus;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Clone, Debug)]
#[command(name = "tarone")]
#[command(about = "Tarone's Z test for overdispersion of alternate allele counts across samples")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

pub trait TaroneParams: std::fmt::Debug {
    fn validate(&self) -> bool;
    fn debug(&self) -> bool;
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Test literal per-sample counts")]
    Counts(CountsArgs),

    #[command(about = "Test the record(s) at VCF loci")]
    Locus(LocusArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct CountsArgs {
    /// Comma separated read depth per sample
    #[arg(short = 'n', long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    pub trials: Vec<f64>,

    /// Comma separated alternate allele reads per sample
    #[arg(short = 'm', long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    pub successes: Vec<f64>,

    #[command(flatten)]
    pub test: TestParams,
}

impl TaroneParams for CountsArgs {
    fn debug(&self) -> bool {
        self.test.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = self.test.validate();

        if self.trials.is_empty() {
            error!("--trials is empty");
            is_ok = false;
        }

        if self.successes.is_empty() {
            error!("--successes is empty");
            is_ok = false;
        }

        is_ok
    }
}

#[derive(Parser, Debug, Clone)]
pub struct LocusArgs {
    #[command(flatten)]
    pub io: IOParams,

    #[command(flatten)]
    pub fields: FieldParams,

    #[command(flatten)]
    pub test: TestParams,
}

#[derive(clap::Args, Clone, Debug)]
pub struct IOParams {
    /// Multi-sample VCF (plain or bgzipped)
    #[arg(short, long, help_heading = "I/O")]
    pub input: PathBuf,

    /// Locus to test as chrom:pos or chrom:start-end (repeatable)
    #[arg(short, long, required = true, help_heading = "I/O")]
    pub locus: Vec<String>,

    /// Comma separated samples to test (default all)
    #[arg(short, long, value_delimiter = ',', help_heading = "I/O")]
    pub samples: Option<Vec<String>>,

    /// Output report (default stdout)
    #[arg(short, long, help_heading = "I/O")]
    pub output: Option<PathBuf>,

    /// Only test records with PASS FILTER
    #[arg(long, default_value_t = false, help_heading = "I/O")]
    pub passonly: bool,
}

#[derive(clap::Args, Clone, Debug)]
pub struct FieldParams {
    /// FORMAT field holding total read depth
    #[arg(long, default_value = "DP", help_heading = "Fields")]
    pub depth_field: String,

    /// FORMAT field holding alternate allele read counts
    #[arg(long, default_value = "AO", help_heading = "Fields")]
    pub alt_field: String,
}

#[derive(clap::Args, Clone, Debug)]
pub struct TestParams {
    /// Z above which a locus is reported as overdispersed
    #[arg(long, default_value_t = 3.0, allow_negative_numbers = true, help_heading = "Test")]
    pub min_z: f64,

    /// Write JSON lines instead of TSV
    #[arg(long, default_value_t = false, help_heading = "Test")]
    pub json: bool,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl TestParams {
    fn validate(&self) -> bool {
        if !self.min_z.is_finite() {
            error!("--min-z must be a finite number");
            return false;
        }
        true
    }
}

impl LocusArgs {
    /// Parsed --locus values. Call after `validate`.
    pub fn loci(&self) -> Vec<Locus> {
        self.io.locus.iter().filter_map(|l| l.parse().ok()).collect()
    }
}

impl TaroneParams for LocusArgs {
    fn debug(&self) -> bool {
        self.test.debug
    }

    /// Validate command line arguments
    fn validate(&self) -> bool {
        let mut is_ok = self.test.validate();

        is_ok &= validate_file(&self.io.input, "--input");

        if self.io.locus.is_empty() {
            error!("at least one --locus is required");
            is_ok = false;
        }

        for locus in &self.io.locus {
            if let Err(e) = locus.parse::<Locus>() {
                error!("--locus {}", e);
                is_ok = false;
            }
        }

        if let Some(samples) = &self.io.samples {
            if samples.is_empty() || samples.iter().any(|s| s.is_empty()) {
                error!("--samples contains an empty name");
                is_ok = false;
            }
        }

        if self.fields.depth_field.is_empty() || self.fields.alt_field.is_empty() {
            error!("--depth-field and --alt-field must be non-empty");
            is_ok = false;
        }

        if self.fields.depth_field == self.fields.alt_field {
            warn!(
                "--depth-field and --alt-field are both {}",
                self.fields.depth_field
            );
        }

        is_ok
    }
}

/// Helper function to validate a file's existence and type
fn validate_file(path: &Path, label: &str) -> bool {
    if !path.exists() {
        error!("{} does not exist", label);
        return false;
    }
    if !path.is_file() {
        error!("{} is not a file", label);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_args() {
        let cli = Cli::try_parse_from([
            "tarone",
            "counts",
            "--trials",
            "10,20,30",
            "--successes",
            "1,2,3",
            "--min-z",
            "2.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Counts(args) => {
                assert_eq!(args.trials, vec![10.0, 20.0, 30.0]);
                assert_eq!(args.successes, vec![1.0, 2.0, 3.0]);
                assert_eq!(args.test.min_z, 2.5);
                assert!(!args.test.json);
                assert!(args.validate());
            }
            _ => panic!("expected counts"),
        }
    }

    #[test]
    fn test_counts_keeps_fractions_for_the_test() {
        let cli = Cli::try_parse_from([
            "tarone",
            "counts",
            "-n",
            "10.5,20",
            "-m",
            "3,-5",
        ])
        .unwrap();
        match cli.command {
            Commands::Counts(args) => {
                assert_eq!(args.trials, vec![10.5, 20.0]);
                assert_eq!(args.successes, vec![3.0, -5.0]);
            }
            _ => panic!("expected counts"),
        }
    }

    #[test]
    fn test_locus_args_defaults() {
        let cli = Cli::try_parse_from([
            "tarone",
            "locus",
            "-i",
            "does_not_exist.vcf",
            "-l",
            "chr1:100",
            "-l",
            "chr2:5-10",
            "--samples",
            "a,b",
        ])
        .unwrap();
        match cli.command {
            Commands::Locus(args) => {
                assert_eq!(args.fields.depth_field, "DP");
                assert_eq!(args.fields.alt_field, "AO");
                assert_eq!(args.test.min_z, 3.0);
                assert_eq!(args.loci().len(), 2);
                assert_eq!(
                    args.io.samples,
                    Some(vec!["a".to_string(), "b".to_string()])
                );
                // input is missing on disk
                assert!(!args.validate());
            }
            _ => panic!("expected locus"),
        }
    }

    #[test]
    fn test_locus_required() {
        assert!(Cli::try_parse_from(["tarone", "locus", "-i", "x.vcf"]).is_err());
    }
}
