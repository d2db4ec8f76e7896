//! Core comparison algorithms for navigation-record datasets: record and
//! field models, temporal alignment, WGS-84 geodesy, and the stateless
//! metric calculator family.

pub mod align;
pub mod fields;
pub mod geodesy;
pub mod metrics;
pub mod psd;
pub mod record;
pub mod stats;

pub use align::{Alignment, ToleranceConfig};
pub use fields::FieldPath;
pub use record::{Category, Dataset, Record};
