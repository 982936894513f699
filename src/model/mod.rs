use serde::Serialize;

pub mod grid;
pub mod modifier;

pub use grid::Grid;
pub use modifier::{ModifierRecord, TileModifier};

/// First line of every map file.
pub const HEADER_MAGIC: &str = "Unreal Software's Counter-Strike 2D Map File (max)";
/// Check line that follows the settings block.
pub const FOOTER_MAGIC: &str = "ed.erawtfoslaernu";

/// Offset the editor adds to a registered author id.
pub const AUTHOR_ID_OFFSET: i32 = 51;

/// Number of (int, string) setting pairs carried by every entity.
pub const ENTITY_SETTINGS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub trigger: String,
    pub kind: u8,
    pub x: i32,
    pub y: i32,
    pub int_settings: [i32; ENTITY_SETTINGS],
    pub string_settings: [String; ENTITY_SETTINGS],
}

/// A fully decoded map.
///
/// Both grids span `0..=width` × `0..=height`, so they hold
/// `(width + 1) * (height + 1)` cells. `modifiers` is `Some` exactly when
/// `use_modifiers` is set, and `tile_types` has
/// `required_tile_type_count + 1` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDocument {
    pub scroll_like_tiles: bool,
    pub use_modifiers: bool,
    pub up_time: i32,
    /// Stored without the editor's +51 offset. The encoder writes it back
    /// as-is.
    pub author_id: i32,
    pub author_name: String,
    pub tileset_file: String,
    pub background_file: String,
    pub required_tile_type_count: u8,
    pub width: i32,
    pub height: i32,
    pub scroll_speed_x: i32,
    pub scroll_speed_y: i32,
    pub background_color: Rgb,
    pub tile_types: Vec<u8>,
    pub tile_frame: Grid<u8>,
    pub modifiers: Option<Grid<TileModifier>>,
    pub entities: Vec<Entity>,
}

impl MapDocument {
    /// Blank map with zeroed grids and no modifiers.
    pub fn new(width: i32, height: i32, required_tile_type_count: u8) -> Self {
        Self {
            scroll_like_tiles: false,
            use_modifiers: false,
            up_time: 0,
            author_id: 0,
            author_name: String::new(),
            tileset_file: String::new(),
            background_file: String::new(),
            required_tile_type_count,
            width,
            height,
            scroll_speed_x: 0,
            scroll_speed_y: 0,
            background_color: Rgb::default(),
            tile_types: vec![0; usize::from(required_tile_type_count) + 1],
            tile_frame: Grid::spanning(width, height),
            modifiers: None,
            entities: Vec::new(),
        }
    }

    /// Turns the modifier layer on or off, keeping the flag and the grid in
    /// step. Enabling starts from an all-`None` grid.
    pub fn set_modifiers_enabled(&mut self, enabled: bool) {
        self.use_modifiers = enabled;
        self.modifiers = enabled.then(|| Grid::spanning(self.width, self.height));
    }

    pub fn summary(&self) -> MapSummary {
        let mut modifiers = ModifierCounts::default();
        if let Some(grid) = &self.modifiers {
            for m in grid.cells() {
                match m.record() {
                    ModifierRecord::None => modifiers.none += 1,
                    ModifierRecord::Reserved => modifiers.reserved += 1,
                    ModifierRecord::DirectionalFrame { .. } => modifiers.directional_frame += 1,
                    ModifierRecord::ColorOverlay { .. } => modifiers.color_overlay += 1,
                }
            }
        }

        MapSummary {
            author_name: self.author_name.clone(),
            author_id: self.author_id,
            up_time: self.up_time,
            tileset_file: self.tileset_file.clone(),
            background_file: self.background_file.clone(),
            background_color: self.background_color,
            width: self.width,
            height: self.height,
            cells: self.tile_frame.len(),
            required_tile_type_count: self.required_tile_type_count,
            scroll_like_tiles: self.scroll_like_tiles,
            use_modifiers: self.use_modifiers,
            modifiers,
            entities: self.entities.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModifierCounts {
    pub none: usize,
    pub reserved: usize,
    pub directional_frame: usize,
    pub color_overlay: usize,
}

/// What `info` reports about a map.
#[derive(Debug, Clone, Serialize)]
pub struct MapSummary {
    pub author_name: String,
    pub author_id: i32,
    pub up_time: i32,
    pub tileset_file: String,
    pub background_file: String,
    pub background_color: Rgb,
    pub width: i32,
    pub height: i32,
    pub cells: usize,
    pub required_tile_type_count: u8,
    pub scroll_like_tiles: bool,
    pub use_modifiers: bool,
    pub modifiers: ModifierCounts,
    pub entities: usize,
}
