//! Record validation: field counts, numeric casting, ranges and generic
//! string rules.

mod caster;
mod generic;
mod validator;
mod verdict;

pub use caster::{CastError, cast, cast_in_range};
pub use generic::check_field;
pub use validator::RecordValidator;
pub use verdict::{FailureKind, FieldFailure, Verdict};
