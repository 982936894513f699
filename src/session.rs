//! One loaded map at a time, with explicit load and unload.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::MapDocument;
use crate::parser;
use crate::processor::{StripReport, strip_tiles};
use crate::writer::{SignatureClock, bin, lua};

#[derive(Debug, Default)]
pub struct MapSession {
    map: Option<MapDocument>,
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.map.is_some()
    }

    /// Load a map file. A failed decode leaves the session empty.
    pub fn load(&mut self, path: &Path) -> Result<&MapDocument> {
        if self.map.is_some() {
            return Err(Error::AlreadyLoaded);
        }
        let map = parser::load(path)?;
        info!("loaded {}", path.display());
        Ok(self.map.insert(map))
    }

    pub fn load_bytes(&mut self, data: &[u8]) -> Result<&MapDocument> {
        if self.map.is_some() {
            return Err(Error::AlreadyLoaded);
        }
        let map = parser::decode(data)?;
        Ok(self.map.insert(map))
    }

    /// Drop the loaded map, handing it back to the caller.
    pub fn unload(&mut self) -> Result<MapDocument> {
        let map = self.map.take().ok_or(Error::NotLoaded)?;
        debug!("unloaded map");
        Ok(map)
    }

    pub fn map(&self) -> Result<&MapDocument> {
        self.map.as_ref().ok_or(Error::NotLoaded)
    }

    /// Rebuild script for the frames as they are now. Call before
    /// [`MapSession::strip_tiles`].
    pub fn script(&self) -> Result<String> {
        let map = self.map()?;
        Ok(lua::render(map.width, map.height, &map.tile_frame))
    }

    pub fn strip_tiles(&mut self) -> Result<StripReport> {
        let map = self.map.as_mut().ok_or(Error::NotLoaded)?;
        Ok(strip_tiles(map))
    }

    pub fn save(&self, path: &Path, clock: &impl SignatureClock) -> Result<()> {
        bin::emit(self.map()?, path, clock)?;
        info!("saved {}", path.display());
        Ok(())
    }
}
