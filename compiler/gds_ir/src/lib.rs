//! GDS IR - shared vocabulary for the grammar engine.
//!
//! This crate contains the data types every rule in `gds_grammar` speaks:
//! - [`Kind`]: the record-kind tag a leaf rule compares against
//! - [`Token`]: one record from the decoded stream (kind + opaque payload)
//! - [`Collected`]: the semantic side-channel gathered by matching rules
//!
//! The binary record decoder that produces tokens lives outside this
//! workspace. Anything that can report a kind and hand over a payload can
//! drive the engine.

mod collected;
mod token;

pub use collected::Collected;
pub use token::{Kind, Token};
