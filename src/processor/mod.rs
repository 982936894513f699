//! The functional core: turn a decoded map into its two outputs.
pub mod tileless;

pub use tileless::{Compass, StripReport, strip_tiles};

use tracing::info;

use crate::model::MapDocument;
use crate::writer::lua;

/// Everything the writers need.
pub struct ProcessedMap {
    /// Rebuild script holding the original frames.
    pub script: String,
    /// Copy of the input with its frames stripped.
    pub tileless: MapDocument,
    pub report: StripReport,
}

/// Render the rebuild script from the untouched map, then strip a copy.
/// `map` itself is left as it was.
pub fn run(map: &MapDocument) -> ProcessedMap {
    let script = lua::render(map.width, map.height, &map.tile_frame);
    info!("rebuild script covers {} cells", map.tile_frame.len());

    let mut tileless = map.clone();
    let report = strip_tiles(&mut tileless);
    info!(
        "stripped {} tile frames, kept {} under modifiers",
        report.cleared, report.kept
    );

    ProcessedMap {
        script,
        tileless,
        report,
    }
}
