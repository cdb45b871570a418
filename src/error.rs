use thiserror::Error;

use crate::distance::DistanceUnit;

#[derive(Debug, Error)]
pub enum FolioError {
    #[error("cannot convert a distance from '{from}' to '{to}'")]
    UnitConversion { from: DistanceUnit, to: DistanceUnit },

    #[error("incompatible distance operands: {0}")]
    IncompatibleUnits(String),

    #[error("cannot divide a distance by zero")]
    DivisionByZero,

    #[error("distance arithmetic overflowed")]
    Overflow,

    #[error("cannot fix {bound} to the smaller distance {value}")]
    FixTooSmall { bound: String, value: String },

    #[error("may only fix a distance to a concrete distance, got {0}")]
    FixToFitToSpace(String),

    #[error("'{0}' is not a distance measurement")]
    ParseDistance(String),

    #[error("not enough space for '{frame}': needs {needed}, offered {offered}")]
    InsufficientSpace {
        frame: String,
        needed: String,
        offered: String,
    },

    #[error("layout strategy returned {actual} regions for {expected} frames")]
    RegionCountMismatch { expected: usize, actual: usize },

    #[error("container '{0}' cannot be modified between measure and draw")]
    MutationDuringLayout(String),

    #[error("no page layout named '{0}'")]
    MissingPageLayout(String),

    #[error("pagination exceeded the limit of {0} pages")]
    PageLimitExceeded(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown paper size '{0}'")]
    UnknownPaper(String),

    #[error("unrecognized value '{0}'")]
    UnknownDirection(String),

    #[error("pdf error: {0}")]
    Pdf(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for FolioError {
    fn from(value: lopdf::Error) -> Self {
        FolioError::Pdf(value.to_string())
    }
}
