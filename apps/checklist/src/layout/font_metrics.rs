//! Glyph-width measurement for header and item labels.
//!
//! Two sources of advance widths:
//! - static tables for the PDF standard fonts (no file needed, widths from the Adobe AFMs),
//! - the `hmtx` table of a TrueType file, read through `ttf-parser`.
//!
//! Widths are always measured; there is no character-count estimate. All results are in
//! points for the given font size.

use std::collections::HashMap;

use ttf_parser::{Face, FaceParsingError, GlyphId};

// ────────────────────────────────────────────────────────────────────────────
// Metrics trait
// ────────────────────────────────────────────────────────────────────────────

/// Anything that can report the rendered width of a string.
pub trait FontMetrics {
    /// Width of `text` in points when set at `size_pt`.
    fn text_width(&self, text: &str, size_pt: f32) -> f32;
}

// ────────────────────────────────────────────────────────────────────────────
// Standard PDF fonts
// ────────────────────────────────────────────────────────────────────────────

/// PDF standard fonts that can be used without a font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
}

impl StandardFont {
    /// Resolves a settings font identifier (PostScript name) to a standard font.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Helvetica" => Some(StandardFont::Helvetica),
            "Helvetica-Bold" => Some(StandardFont::HelveticaBold),
            "Courier" => Some(StandardFont::Courier),
            _ => None,
        }
    }

    pub fn table(&self) -> &'static StandardWidthTable {
        match self {
            StandardFont::Helvetica => &HELVETICA_TABLE,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_TABLE,
            StandardFont::Courier => &COURIER_TABLE,
        }
    }
}

impl FontMetrics for StandardFont {
    fn text_width(&self, text: &str, size_pt: f32) -> f32 {
        self.table().text_width(text, size_pt)
    }
}

/// Advance widths for ASCII 0x20..=0x7E in 1/1000 em.
/// Index = (char as usize) - 32.
pub struct StandardWidthTable {
    widths: [u16; 95],
    /// Fallback width for characters outside the table.
    pub average_char_width: u16,
}

impl StandardWidthTable {
    /// Sum of advance widths in 1/1000 em.
    pub fn measure_str(&self, s: &str) -> u32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32] as u32
                } else {
                    self.average_char_width as u32
                }
            })
            .sum()
    }

    pub fn text_width(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) as f32 / 1000.0 * size_pt
    }
}

static HELVETICA_TABLE: StandardWidthTable = StandardWidthTable {
    #[rustfmt::skip]
    widths: [
        // sp  !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :   ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A   B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N   O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [   \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a   b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n   o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {   |    }    ~
        334, 260, 334, 584,
    ],
    average_char_width: 556,
};

static HELVETICA_BOLD_TABLE: StandardWidthTable = StandardWidthTable {
    #[rustfmt::skip]
    widths: [
        // sp  !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :   ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A   B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N   O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [   \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a   b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n   o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {   |    }    ~
        389, 280, 389, 584,
    ],
    average_char_width: 611,
};

/// Courier is monospaced: every glyph is 600/1000 em.
static COURIER_TABLE: StandardWidthTable = StandardWidthTable {
    widths: [600; 95],
    average_char_width: 600,
};

// ────────────────────────────────────────────────────────────────────────────
// TrueType fonts
// ────────────────────────────────────────────────────────────────────────────

/// Advance-width metrics read from a TrueType/OpenType file.
///
/// The face is parsed once: advances of every Unicode-mapped character are cached, and
/// the raw bytes are kept so the same data can be embedded into the PDF.
#[derive(Debug, Clone)]
pub struct TrueTypeMetrics {
    data: Vec<u8>,
    units_per_em: u16,
    advances: HashMap<char, u16>,
    /// Unmapped characters render as .notdef (glyph 0).
    notdef_advance: u16,
}

impl TrueTypeMetrics {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FaceParsingError> {
        let (units_per_em, advances, notdef_advance) = {
            let face = Face::parse(&data, 0)?;
            let mut advances = HashMap::new();
            if let Some(cmap) = face.tables().cmap {
                for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
                    subtable.codepoints(|code_point| {
                        let Some(c) = char::from_u32(code_point) else {
                            return;
                        };
                        if let Some(glyph) = face.glyph_index(c) {
                            advances
                                .entry(c)
                                .or_insert_with(|| face.glyph_hor_advance(glyph).unwrap_or(0));
                        }
                    });
                }
            }
            (
                face.units_per_em().max(1),
                advances,
                face.glyph_hor_advance(GlyphId(0)).unwrap_or(0),
            )
        };

        Ok(Self {
            data,
            units_per_em,
            advances,
            notdef_advance,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Advance of `c` in font units.
    fn advance(&self, c: char) -> u16 {
        self.advances.get(&c).copied().unwrap_or(self.notdef_advance)
    }
}

impl FontMetrics for TrueTypeMetrics {
    fn text_width(&self, text: &str, size_pt: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.advance(c) as u32).sum();
        units as f32 / self.units_per_em as f32 * size_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
