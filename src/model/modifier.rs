//! Per-cell modifier records.
//!
//! A modifier starts with a tag byte. Bits 64 and 128 select one of four
//! payload shapes; the other six bits carry no meaning for us but are kept
//! so a re-encoded map matches its source byte for byte.

/// Tag bit for a directional modification frame.
pub const DIRECTIONAL_FLAG: u8 = 0x40;
/// Tag bit for a colour overlay.
pub const OVERLAY_FLAG: u8 = 0x80;
/// Both shape-selecting bits.
pub const SHAPE_FLAGS: u8 = DIRECTIONAL_FLAG | OVERLAY_FLAG;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModifierRecord {
    /// Neither flag bit set. No payload.
    #[default]
    None,
    /// Both flag bits set. The payload is one string that nothing reads;
    /// frame and colour stay zero.
    Reserved,
    /// Only bit 64 set. One modification-frame byte.
    DirectionalFrame { frame: u8 },
    /// Only bit 128 set. Colour and overlay frame.
    ColorOverlay {
        r: u8,
        g: u8,
        b: u8,
        overlay_frame: u8,
    },
}

impl ModifierRecord {
    pub fn flag_bits(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Reserved => SHAPE_FLAGS,
            Self::DirectionalFrame { .. } => DIRECTIONAL_FLAG,
            Self::ColorOverlay { .. } => OVERLAY_FLAG,
        }
    }

    /// Modification frame, zero for shapes that don't carry one.
    pub fn modification_frame(&self) -> u8 {
        match self {
            Self::DirectionalFrame { frame } => *frame,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileModifier {
    spare_bits: u8,
    record: ModifierRecord,
}

impl TileModifier {
    /// `spare_bits` are the tag bits outside [`SHAPE_FLAGS`]; any flag bits
    /// passed in are dropped since `record` decides them.
    pub fn new(spare_bits: u8, record: ModifierRecord) -> Self {
        Self {
            spare_bits: spare_bits & !SHAPE_FLAGS,
            record,
        }
    }

    pub fn from_record(record: ModifierRecord) -> Self {
        Self::new(0, record)
    }

    /// The tag byte as it appears in the file.
    pub fn tag(&self) -> u8 {
        self.spare_bits | self.record.flag_bits()
    }

    pub fn record(&self) -> &ModifierRecord {
        &self.record
    }

    pub fn is_none(&self) -> bool {
        self.record == ModifierRecord::None
    }

    pub fn modification_frame(&self) -> u8 {
        self.record.modification_frame()
    }
}
