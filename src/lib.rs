//! Pedigree: procedural generation of fictional family trees.
//!
//! Grows a multi-generational family from a single founder: people are
//! born, marry or take lovers, bear children and die according to
//! stochastic rules loosely modelled on pre-modern demography, with
//! noble houses, legitimacy and crisis years shaping each line.

pub mod core;
pub mod schema;
