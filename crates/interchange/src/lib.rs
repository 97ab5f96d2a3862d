//! glosa-interchange: Shared wire-contract JSON types and decoding.
//!
//! Provides typed structs for every record exchanged with the grammar
//! backend (`ParseResult`, `VerifyLoopResponse`, `XRayResponse`, the
//! experiment records) plus the closed display-metadata tables shared
//! by all consumers.
//!
//! glosa-analyze and glosa-cli depend on this crate for decoding;
//! neither re-declares wire shapes.

pub mod deserialize;
pub mod tags;
pub mod types;

pub use deserialize::{from_json_str, from_jsonl_str, InterchangeError};
pub use types::*;
