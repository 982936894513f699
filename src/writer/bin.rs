//! Map encoder: the exact inverse of `parser::decode`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::model::{Entity, FOOTER_MAGIC, HEADER_MAGIC, MapDocument, ModifierRecord, TileModifier};
use crate::parser::{RESERVED_BYTES, RESERVED_INTS, RESERVED_STRINGS};
use crate::writer::signature::{Signature, SignatureClock};

/// Byte buffer with the map file's primitive encodings.
pub struct MapWriter {
    buf: Vec<u8>,
}

impl MapWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Write one byte per char followed by CRLF. Chars outside
    /// `U+0000..=U+00FF` have no byte and become `?`.
    pub fn write_line(&mut self, s: &str) {
        self.buf
            .extend(s.chars().map(|c| u8::try_from(c).unwrap_or(b'?')));
        self.buf.extend_from_slice(b"\r\n");
    }
}

impl Default for MapWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a map. The signature line is freshly generated from `clock`.
pub fn encode(doc: &MapDocument, clock: &impl SignatureClock) -> Vec<u8> {
    let mut w = MapWriter::with_capacity(512 + doc.tile_frame.len() * 2);

    w.write_line(HEADER_MAGIC);

    w.write_bool(doc.scroll_like_tiles);
    w.write_bool(doc.use_modifiers);
    w.write_bytes(&[0; RESERVED_BYTES]);

    w.write_i32(doc.up_time);
    w.write_i32(doc.author_id);
    for _ in 0..RESERVED_INTS {
        w.write_i32(0);
    }

    w.write_line(&doc.author_name);
    for _ in 0..RESERVED_STRINGS {
        w.write_line("");
    }

    let signature = Signature::new(doc.width, doc.height, doc.required_tile_type_count, clock);
    debug!("signing map as {signature}");
    w.write_line(&signature.to_string());
    w.write_line(&doc.tileset_file);
    w.write_u8(doc.required_tile_type_count);
    w.write_i32(doc.width);
    w.write_i32(doc.height);
    w.write_line(&doc.background_file);
    w.write_i32(doc.scroll_speed_x);
    w.write_i32(doc.scroll_speed_y);
    w.write_u8(doc.background_color.r);
    w.write_u8(doc.background_color.g);
    w.write_u8(doc.background_color.b);

    w.write_line(FOOTER_MAGIC);

    // The count byte decides how many entries the reader expects.
    for i in 0..=usize::from(doc.required_tile_type_count) {
        w.write_u8(doc.tile_types.get(i).copied().unwrap_or(0));
    }

    w.write_bytes(doc.tile_frame.cells());

    if doc.use_modifiers {
        match &doc.modifiers {
            Some(grid) => grid.cells().iter().for_each(|m| write_modifier(&mut w, m)),
            None => (0..doc.tile_frame.len()).for_each(|_| w.write_u8(0)),
        }
    }

    let count = entity_count(doc.entities.len());
    if count as usize != doc.entities.len() {
        warn!("{} entities don't fit the count field, writing {count}", doc.entities.len());
    }
    w.write_i32(count);
    for entity in doc.entities.iter().take(count as usize) {
        write_entity(&mut w, entity);
    }

    debug!("encoded map into {} bytes", w.len());
    w.into_vec()
}

/// The count field is an `i32`; entities past `i32::MAX` are dropped so the
/// count always matches what follows it.
fn entity_count(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

fn write_modifier(w: &mut MapWriter, m: &TileModifier) {
    w.write_u8(m.tag());
    match *m.record() {
        ModifierRecord::None => {}
        ModifierRecord::Reserved => w.write_line(""),
        ModifierRecord::DirectionalFrame { frame } => w.write_u8(frame),
        ModifierRecord::ColorOverlay {
            r,
            g,
            b,
            overlay_frame,
        } => w.write_bytes(&[r, g, b, overlay_frame]),
    }
}

fn write_entity(w: &mut MapWriter, e: &Entity) {
    w.write_line(&e.name);
    w.write_u8(e.kind);
    w.write_i32(e.x);
    w.write_i32(e.y);
    w.write_line(&e.trigger);
    for (int, string) in e.int_settings.iter().zip(&e.string_settings) {
        w.write_i32(*int);
        w.write_line(string);
    }
}

/// Encode into any sink.
pub fn write_to(doc: &MapDocument, sink: &mut impl Write, clock: &impl SignatureClock) -> io::Result<()> {
    sink.write_all(&encode(doc, clock))?;
    sink.flush()
}

/// Encode and write to `path`, replacing any existing file.
pub fn emit(doc: &MapDocument, path: &Path, clock: &impl SignatureClock) -> io::Result<()> {
    fs::write(path, encode(doc, clock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgb;
    use crate::model::modifier::{DIRECTIONAL_FLAG, SHAPE_FLAGS};
    use crate::parser::{MapReader, decode, read_modifier};
    use crate::writer::signature::FixedClock;

    fn clock() -> FixedClock {
        FixedClock {
            hhmmss: "235959".into(),
            uptime_millis: 42,
        }
    }

    fn sample() -> MapDocument {
        let mut doc = MapDocument::new(2, 1, 2);
        doc.scroll_like_tiles = true;
        doc.up_time = 99;
        doc.author_id = 1000;
        doc.author_name = "Caf\u{e9}".into();
        doc.tileset_file = "cs2dnorm.bmp".into();
        doc.background_file = "space.jpg".into();
        doc.scroll_speed_x = -1;
        doc.scroll_speed_y = 4;
        doc.background_color = Rgb { r: 1, g: 2, b: 3 };
        doc.tile_types = vec![0, 3, 7];
        doc.tile_frame.cells_mut().copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        doc.set_modifiers_enabled(true);
        let grid = doc.modifiers.as_mut().unwrap();
        grid[(0, 0)] = TileModifier::new(0x11, ModifierRecord::Reserved);
        grid[(1, 0)] = TileModifier::from_record(ModifierRecord::DirectionalFrame { frame: 12 });
        grid[(2, 1)] = TileModifier::from_record(ModifierRecord::ColorOverlay {
            r: 9,
            g: 8,
            b: 7,
            overlay_frame: 6,
        });
        doc.entities.push(Entity {
            name: "Info_T".into(),
            trigger: "door1".into(),
            kind: 0,
            x: 2,
            y: 1,
            int_settings: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            string_settings: Default::default(),
        });
        doc
    }

    #[test]
    fn test_write_line_maps_chars_to_bytes() {
        let mut w = MapWriter::new();
        w.write_line("\u{e9}\u{263a}");
        assert_eq!(w.into_vec(), vec![0xE9, b'?', b'\r', b'\n']);
    }

    #[test]
    fn test_round_trip() {
        let doc = sample();
        let decoded = decode(&encode(&doc, &clock())).unwrap();

        // The decoder takes the editor's offset off a nonzero id.
        assert_eq!(decoded.author_id, doc.author_id - 51);
        let mut expected = doc;
        expected.author_id -= 51;
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_signature_lands_after_reserved_strings() {
        let bytes = encode(&sample(), &clock());
        let mut r = MapReader::new(&bytes);
        r.read_line().unwrap();
        r.skip(2 + RESERVED_BYTES + 8 + RESERVED_INTS * 4).unwrap();
        assert_eq!(r.read_line().unwrap(), "Caf\u{e9}");
        for _ in 0..RESERVED_STRINGS {
            assert_eq!(r.read_line().unwrap(), "");
        }
        assert_eq!(r.read_line().unwrap(), "2x2$235959%42");
    }

    #[test]
    fn test_modifier_payload_sizes() {
        let cases: [(ModifierRecord, usize); 4] = [
            (ModifierRecord::None, 1),
            (ModifierRecord::Reserved, 3),
            (ModifierRecord::DirectionalFrame { frame: 1 }, 2),
            (
                ModifierRecord::ColorOverlay {
                    r: 0,
                    g: 0,
                    b: 0,
                    overlay_frame: 0,
                },
                5,
            ),
        ];

        for (record, size) in cases {
            let mut w = MapWriter::new();
            write_modifier(&mut w, &TileModifier::from_record(record));
            assert_eq!(w.len(), size, "{record:?}");
        }
    }

    #[test]
    fn test_every_tag_reads_back_exactly() {
        for tag in 0..=255u8 {
            let record = match tag & SHAPE_FLAGS {
                0 => ModifierRecord::None,
                SHAPE_FLAGS => ModifierRecord::Reserved,
                DIRECTIONAL_FLAG => ModifierRecord::DirectionalFrame { frame: tag },
                _ => ModifierRecord::ColorOverlay {
                    r: tag,
                    g: 1,
                    b: 2,
                    overlay_frame: 3,
                },
            };
            let modifier = TileModifier::new(tag, record);
            assert_eq!(modifier.tag(), tag);

            let mut w = MapWriter::new();
            write_modifier(&mut w, &modifier);
            let bytes = w.into_vec();
            let mut r = MapReader::new(&bytes);
            assert_eq!(read_modifier(&mut r).unwrap(), modifier, "tag {tag:#04x}");
            assert!(r.is_empty(), "tag {tag:#04x} left {} bytes", r.remaining());
        }
    }

    #[test]
    fn test_entity_count_saturates() {
        assert_eq!(entity_count(3), 3);
        assert_eq!(entity_count(i32::MAX as usize), i32::MAX);
        assert_eq!(entity_count(usize::MAX), i32::MAX);
    }

    #[test]
    fn test_short_tile_types_are_padded() {
        let mut doc = MapDocument::new(0, 0, 3);
        doc.tile_types = vec![5];
        let decoded = decode(&encode(&doc, &clock())).unwrap();
        assert_eq!(decoded.tile_types, vec![5, 0, 0, 0]);
    }

    #[test]
    fn test_write_to_sink() {
        let doc = sample();
        let mut sink = Vec::new();
        write_to(&doc, &mut sink, &clock()).unwrap();
        assert_eq!(sink, encode(&doc, &clock()));
    }
}
