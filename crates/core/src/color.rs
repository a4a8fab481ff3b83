use spriteboard_protocol::Color;

/// Derive a stable color from a client identifier.
///
/// Folds the identifier's UTF-16 code units into a 32-bit rolling hash
/// (`hash = code + ((hash << 5) - hash)`, left to right from 0) using
/// wrapping arithmetic, so every port of this client derives the same
/// color for the same identifier. Negative hashes are normalized into
/// `[0, 360)` before becoming the hue.
///
/// Pure and total: equal identifiers always yield equal colors.
pub fn derive_color(identifier: &str) -> Color {
    let mut hash: i32 = 0;
    for code in identifier.encode_utf16() {
        hash = i32::from(code).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    Color::hsl(hash.rem_euclid(360) as u16)
}
