//! Badge text sanitizing and shields path escaping.

use url::form_urlencoded;

/// Normalizes caller-supplied badge text for display.
///
/// - Drops control characters (including NUL and newlines)
/// - Collapses whitespace runs into a single space
/// - Trims leading/trailing whitespace
///
/// Returns an empty string when nothing printable remains; callers decide
/// which default applies.
#[must_use]
pub fn clean_image_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut prev_space = true;

    for c in label.chars() {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else if c.is_control() {
            continue;
        } else {
            out.push(c);
            prev_space = false;
        }
    }

    if out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Escapes one field of the `label-value-color` badge path.
///
/// The badge service splits the path on single `-` and reads `_` as a space,
/// so literal dashes and underscores are doubled and spaces become `_`. The
/// result is then form-urlencoded, which also covers `/`, `?`, `#` and `,`.
#[must_use]
pub fn badge_path_field(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '-' => escaped.push_str("--"),
            '_' => escaped.push_str("__"),
            ' ' => escaped.push('_'),
            other => escaped.push(other),
        }
    }
    form_urlencoded::byte_serialize(escaped.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(clean_image_label("  total \t\n downloads  "), "total downloads");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(clean_image_label("gem\u{0}\u{7}s"), "gems");
    }

    #[test]
    fn blank_input_yields_empty() {
        assert_eq!(clean_image_label(" \n\t "), "");
    }

    #[test]
    fn keeps_unicode_text() {
        assert_eq!(clean_image_label("téléchargements"), "téléchargements");
    }

    #[test]
    fn path_field_doubles_dashes_and_underscores() {
        assert_eq!(badge_path_field("my-gem_total"), "my--gem__total");
    }

    #[test]
    fn path_field_spaces_become_underscores() {
        assert_eq!(badge_path_field("total downloads"), "total_downloads");
    }

    #[test]
    fn path_field_percent_encodes_delimiters() {
        assert_eq!(badge_path_field("1,234"), "1%2C234");
        assert_eq!(badge_path_field("#ff0000"), "%23ff0000");
        assert_eq!(badge_path_field("a/b?c"), "a%2Fb%3Fc");
    }

    #[test]
    fn path_field_never_contains_single_dash() {
        let field = badge_path_field("a-b-c");
        assert!(!field.replace("--", "").contains('-'));
    }
}
