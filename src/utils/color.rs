/// Default polygon fill color (hex format)
pub const DEFAULT_FILL_COLOR: &str = "#3300FF";
/// Default polygon stroke color (hex format)
pub const DEFAULT_STROKE_COLOR: &str = "#0000FF";
/// Fill used for the shape still being drawn
pub const PREVIEW_FILL_COLOR: &str = "#FF0000";
/// Stroke used for the shape still being drawn
pub const PREVIEW_STROKE_COLOR: &str = "#FF0000";

/// Check a `#RRGGBB` or `#AARRGGBB` color string.
pub fn is_hex_color(color: &str) -> bool {
    color.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// Normalize a color to uppercase with its leading `#`.
pub fn normalize_hex_color(color: &str) -> String {
    color.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(is_hex_color(DEFAULT_FILL_COLOR));
        assert!(is_hex_color(DEFAULT_STROKE_COLOR));
        assert!(is_hex_color(PREVIEW_FILL_COLOR));
    }

    #[test]
    fn test_argb_accepted() {
        assert!(is_hex_color("#803300ff"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_hex_color("3300FF"));
        assert!(!is_hex_color("#33F"));
        assert!(!is_hex_color("#GG00FF"));
        assert!(!is_hex_color(""));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_hex_color(" #3300ff "), "#3300FF");
    }
}
