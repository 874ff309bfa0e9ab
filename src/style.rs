//! Heading-level and alignment style tokens.
//!
//! Translates parsed markdown block attributes into the styling constants the
//! target document format understands. Both mappings are fixed lookup tables;
//! the only non-table behavior is the documented clamp of over-deep headings.

/// A named heading style tier in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    /// Document title (markdown depth 0).
    Title,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
}

impl HeadingLevel {
    /// The style token the document format expects.
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::Heading1 => "Heading1",
            HeadingLevel::Heading2 => "Heading2",
            HeadingLevel::Heading3 => "Heading3",
            HeadingLevel::Heading4 => "Heading4",
            HeadingLevel::Heading5 => "Heading5",
            HeadingLevel::Heading6 => "Heading6",
        }
    }
}

/// Heading styles indexed by markdown depth.
const LEVELS: [HeadingLevel; 7] = [
    HeadingLevel::Title,
    HeadingLevel::Heading1,
    HeadingLevel::Heading2,
    HeadingLevel::Heading3,
    HeadingLevel::Heading4,
    HeadingLevel::Heading5,
    HeadingLevel::Heading6,
];

/// Map a markdown heading depth to a heading style.
///
/// Depth 0 is the document title; depths 1-6 map to the six heading tiers.
/// Anything deeper clamps to [`HeadingLevel::Heading6`]. `None` means the
/// block carries no heading style at all.
///
/// # Examples
///
/// ```
/// use mdocx::{HeadingLevel, heading_level};
///
/// assert_eq!(heading_level(Some(0)), Some(HeadingLevel::Title));
/// assert_eq!(heading_level(Some(3)), Some(HeadingLevel::Heading3));
/// assert_eq!(heading_level(Some(100)), Some(HeadingLevel::Heading6));
/// assert_eq!(heading_level(None), None);
/// ```
pub fn heading_level(depth: Option<u32>) -> Option<HeadingLevel> {
    let depth = depth? as usize;
    Some(*LEVELS.get(depth).unwrap_or(&HeadingLevel::Heading6))
}

/// A horizontal text-alignment setting in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    /// The alignment token the document format expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Map a markdown alignment keyword to an alignment token.
///
/// Unrecognized or absent keywords mean "no explicit alignment" and
/// return `None`.
pub fn alignment(keyword: Option<&str>) -> Option<Alignment> {
    match keyword? {
        "left" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" => Some(Alignment::Right),
        _ => None,
    }
}
