mod layout;
mod symbols;

pub use layout::{Script, TextAlignment, TextLayout, TextPiece};
pub use symbols::{PLACEHOLDER_GLYPH, resolve_symbol};
