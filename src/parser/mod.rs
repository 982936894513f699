//! Map decoder.
//!
//! The file is a flat sequence of fields with no offsets or lengths to jump
//! by, so decoding is a single forward pass over a [`MapReader`].

pub mod reader;

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::grid::span;
use crate::model::modifier::{DIRECTIONAL_FLAG, SHAPE_FLAGS};
use crate::model::{
    AUTHOR_ID_OFFSET, ENTITY_SETTINGS, Entity, FOOTER_MAGIC, Grid, HEADER_MAGIC, MapDocument,
    ModifierRecord, Rgb, TileModifier,
};

pub use reader::MapReader;

/// Unused slots in the settings block.
pub(crate) const RESERVED_BYTES: usize = 8;
pub(crate) const RESERVED_INTS: usize = 8;
pub(crate) const RESERVED_STRINGS: usize = 9;

/// Read a map file from disk and decode it.
pub fn load(path: &Path) -> Result<MapDocument> {
    let data = std::fs::read(path)?;
    debug!("read {} bytes from {}", data.len(), path.display());
    decode(&data)
}

/// Decode a complete map file.
pub fn decode(data: &[u8]) -> Result<MapDocument> {
    let mut r = MapReader::new(data);

    // An empty file has an empty first line.
    let header = if r.is_empty() { String::new() } else { r.read_line()? };
    if header != HEADER_MAGIC {
        return Err(Error::BadHeader { found: header });
    }

    // ── Settings ─────────────────────────────────────────────────────
    let scroll_like_tiles = r.read_u8()? != 0;
    let use_modifiers = r.read_u8()? == 1;
    r.skip(RESERVED_BYTES)?;

    let up_time = r.read_i32()?;
    let mut author_id = r.read_i32()?;
    if author_id != 0 {
        author_id = author_id.wrapping_sub(AUTHOR_ID_OFFSET);
    }
    r.skip(RESERVED_INTS * 4)?;

    let author_name = r.read_line()?;
    for _ in 0..RESERVED_STRINGS {
        r.read_line()?;
    }

    let signature = r.read_line()?;
    debug!("ignoring signature {signature:?}");
    let tileset_file = r.read_line()?;
    let required_tile_type_count = r.read_u8()?;
    let width = r.read_i32()?;
    let height = r.read_i32()?;
    let background_file = r.read_line()?;
    let scroll_speed_x = r.read_i32()?;
    let scroll_speed_y = r.read_i32()?;
    let background_color = Rgb {
        r: r.read_u8()?,
        g: r.read_u8()?,
        b: r.read_u8()?,
    };

    let footer = r.read_line()?;
    if footer != FOOTER_MAGIC {
        return Err(Error::BadFooter { found: footer });
    }

    // ── Tiles ────────────────────────────────────────────────────────
    let tile_types = r
        .read_bytes(usize::from(required_tile_type_count) + 1)?
        .to_vec();

    let (columns, rows) = (span(width), span(height));
    debug!("map is {columns}x{rows} cells, modifiers: {use_modifiers}");
    let cells = cell_count(&r, columns, rows)?;
    let tile_frame = grid(columns, rows, r.read_bytes(cells)?.to_vec());

    let modifiers = if use_modifiers {
        let mut records = Vec::with_capacity(cells.min(r.remaining()));
        for _ in 0..cells {
            records.push(read_modifier(&mut r)?);
        }
        Some(grid(columns, rows, records))
    } else {
        None
    };

    // ── Entities ─────────────────────────────────────────────────────
    let entity_count = r.read_i32()?;
    if entity_count < 0 {
        warn!("negative entity count {entity_count}, reading none");
    }
    let mut entities = Vec::new();
    for _ in 0..entity_count.max(0) {
        entities.push(read_entity(&mut r)?);
    }
    debug!("decoded {} entities", entities.len());

    if !r.is_empty() {
        debug!("{} trailing bytes after last entity", r.remaining());
    }

    Ok(MapDocument {
        scroll_like_tiles,
        use_modifiers,
        up_time,
        author_id,
        author_name,
        tileset_file,
        background_file,
        required_tile_type_count,
        width,
        height,
        scroll_speed_x,
        scroll_speed_y,
        background_color,
        tile_types,
        tile_frame,
        modifiers,
        entities,
    })
}

/// Cells per layer. A grid too large to even count can't be backed by the
/// remaining input.
fn cell_count(r: &MapReader, columns: usize, rows: usize) -> Result<usize> {
    columns.checked_mul(rows).ok_or(Error::UnexpectedEof {
        offset: r.position(),
        need: usize::MAX,
        have: r.remaining(),
    })
}

fn grid<T>(columns: usize, rows: usize, cells: Vec<T>) -> Grid<T> {
    match Grid::from_cells(columns, rows, cells) {
        Some(grid) => grid,
        None => unreachable!("layer length is columns * rows by construction"),
    }
}

pub(crate) fn read_modifier(r: &mut MapReader) -> Result<TileModifier> {
    let tag = r.read_u8()?;
    let record = match tag & SHAPE_FLAGS {
        0 => ModifierRecord::None,
        SHAPE_FLAGS => {
            r.read_line()?;
            ModifierRecord::Reserved
        }
        DIRECTIONAL_FLAG => ModifierRecord::DirectionalFrame {
            frame: r.read_u8()?,
        },
        _ => ModifierRecord::ColorOverlay {
            r: r.read_u8()?,
            g: r.read_u8()?,
            b: r.read_u8()?,
            overlay_frame: r.read_u8()?,
        },
    };
    Ok(TileModifier::new(tag, record))
}

fn read_entity(r: &mut MapReader) -> Result<Entity> {
    let name = r.read_line()?;
    let kind = r.read_u8()?;
    let x = r.read_i32()?;
    let y = r.read_i32()?;
    let trigger = r.read_line()?;

    let mut int_settings = [0; ENTITY_SETTINGS];
    let mut string_settings: [String; ENTITY_SETTINGS] = Default::default();
    for (int, string) in int_settings.iter_mut().zip(string_settings.iter_mut()) {
        *int = r.read_i32()?;
        *string = r.read_line()?;
    }

    Ok(Entity {
        name,
        trigger,
        kind,
        x,
        y,
        int_settings,
        string_settings,
    })
}
