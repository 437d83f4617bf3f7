use crate::game::constants::COLOR_POOL;

pub const MAX_COLOR_LENGTH: usize = 32;

/// Accepts `#rgb`/`#rrggbb` hex or a bare CSS color keyword; anything else
/// gets a color from the pool picked by `fallback_index`.
pub fn sanitize_color(value: Option<&str>, fallback_index: usize) -> String {
    let fallback = || COLOR_POOL[fallback_index % COLOR_POOL.len()].to_string();
    let Some(value) = value.map(str::trim) else { return fallback() };
    if value.is_empty() || value.len() > MAX_COLOR_LENGTH {
        return fallback();
    }
    if let Some(hex) = value.strip_prefix('#') {
        if matches!(hex.len(), 3 | 6) && hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return value.to_ascii_lowercase();
        }
        return fallback();
    }
    if value.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return value.to_ascii_lowercase();
    }
    fallback()
}
