//! Working with quotes after they are computed: term comparison grids and
//! saved simulation records.

pub mod comparison;
pub mod record;
