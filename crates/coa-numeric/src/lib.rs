//! Numeric interpretation of free-text microbiology results.
//!
//! Everything in this crate is pure and stateless: parsing never fails
//! (unparseable text yields `None`), formatting falls back to the input text,
//! and classification falls back to [`Classification::Neutral`].

pub mod numeric;

pub use numeric::classify::*;
pub use numeric::dilution::*;
pub use numeric::format::*;
pub use numeric::parse::*;
