use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClauseError {
    #[error("No data supplied")]
    EmptyInput,

    #[error("Minimum ({lower}) can't be greater than maximum ({upper})")]
    RangeConflict { lower: i64, upper: i64 },
}
