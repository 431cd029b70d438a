mod cli;
pub use crate::tzlib::cli::{Cli, Commands, CountsArgs, LocusArgs, TaroneParams};

mod errors;
pub use crate::tzlib::errors::{ExtractError, LocusParseError, TaroneError};

mod extractor;
pub use crate::tzlib::extractor::{AlleleObservations, LocusExtractor};

pub mod metrics;

mod observation;
pub use crate::tzlib::observation::{Observation, ObservationSet};

mod report;
pub use crate::tzlib::report::{LocusReport, ReportWriter};

pub mod tarone;
pub use crate::tzlib::tarone::{run, run_counts, TaroneResult};

mod vcf_traits;
pub use crate::tzlib::vcf_traits::LocusVcf;

mod vcfreader;
pub use crate::tzlib::vcfreader::{Locus, LocusReader};
