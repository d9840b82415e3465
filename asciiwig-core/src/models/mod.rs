pub mod mapping;
pub mod region;
pub mod scores;

// re-export for cleaner imports
pub use self::mapping::{GenomeToScreenMapping, Viewport, closest_index};
pub use self::region::Region;
pub use self::scores::ScreenScores;
