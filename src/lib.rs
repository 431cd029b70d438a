#[macro_use]
extern crate log;

mod tzlib;
pub use self::{
    tzlib::metrics, tzlib::run, tzlib::run_counts, tzlib::tarone, tzlib::AlleleObservations,
    tzlib::Cli, tzlib::Commands, tzlib::CountsArgs, tzlib::ExtractError, tzlib::Locus,
    tzlib::LocusArgs, tzlib::LocusExtractor, tzlib::LocusParseError, tzlib::LocusReader,
    tzlib::LocusReport, tzlib::LocusVcf, tzlib::Observation, tzlib::ObservationSet,
    tzlib::ReportWriter, tzlib::TaroneError, tzlib::TaroneParams, tzlib::TaroneResult,
};
