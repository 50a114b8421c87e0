pub mod promoter;
pub mod promoter_set;
pub mod tad;
pub mod tad_set;

// re-export for cleaner imports
pub use self::promoter::{Promoter, Strand};
pub use self::promoter_set::{ClusterScheme, PromoterSet};
pub use self::tad::{DensityCategory, Tad};
pub use self::tad_set::TadSet;
