pub mod error;
pub mod reference;
pub mod stats;
pub mod traits;
pub mod types;

pub use error::*;
pub use reference::{ReferenceData, SectorGroup};
pub use traits::*;
pub use types::*;
