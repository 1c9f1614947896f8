//! tally-ingest: bank/credit-card CSV export detection and normalization into
//! `date,description,amount` rows for a single month.

pub mod error;
pub mod formats;
pub mod month;
pub mod pipeline;
pub mod resolve;
pub mod source;
pub mod types;
pub mod validate;

pub use error::{ExtractError, InvalidMonth, ResolveError, UnknownFormat};
pub use formats::{FormatDescriptor, FormatKind, PreambleStep};
pub use month::{MonthFilter, TargetMonth};
pub use resolve::{Conversion, Outcome, Probe, probe, resolve};
pub use source::InputSource;
pub use types::{CanonicalRow, Row};
pub use validate::{is_canonical, is_valid_output};
