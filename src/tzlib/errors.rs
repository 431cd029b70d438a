/// Precondition failures of the Tarone test. Each is raised before any
/// arithmetic and names the offending index and value where there is one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaroneError {
    #[error("trials ({trials}) and successes ({successes}) differ in length")]
    ShapeMismatch { trials: usize, successes: usize },

    #[error("no observations supplied")]
    EmptyInput,

    #[error("trials[{index}] = {value} is not a positive integer")]
    InvalidTrials { index: usize, value: f64 },

    #[error("successes[{index}] = {value} is not a non-negative integer")]
    InvalidSuccesses { index: usize, value: f64 },

    #[error("successes[{index}] = {successes} exceeds trials[{index}] = {trials}")]
    SuccessesExceedTrials {
        index: usize,
        successes: f64,
        trials: f64,
    },
}

/// Problems turning a VCF record into per-sample observations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("FORMAT field {0} not present in record")]
    MissingField(String),

    #[error("sample {sample} field {field} has unusable value {value}")]
    InvalidValue {
        sample: String,
        field: String,
        value: String,
    },

    #[error("sample {sample} field {field} is negative ({value})")]
    NegativeValue {
        sample: String,
        field: String,
        value: i64,
    },

    #[error("sample {sample} alternate count {alt} exceeds depth {depth}")]
    AltExceedsDepth { sample: String, alt: u32, depth: u32 },

    #[error("sample {0} not found in VCF header")]
    UnknownSample(String),
}

/// Malformed `chrom:pos` or `chrom:start-end` strings
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid locus '{0}', expected chrom:pos or chrom:start-end (1-based)")]
pub struct LocusParseError(pub String);
