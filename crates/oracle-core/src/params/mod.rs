//! Oracle deployment parameters.
//!
//! Parameters are the raw constructor arguments of an oracle. They are parsed
//! from YAML/JSON as-is; validation and normalization happen in
//! [`Oracle::deploy`](crate::Oracle::deploy).

mod date;
mod parser;

pub use date::parse_resolution_date;
pub use parser::{OracleParams, ParamsError};
