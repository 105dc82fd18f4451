//! Color canonicalization.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{Document, Element};
use crate::error::ShrinkError;
use crate::rules::Rule;

const COLOR_ATTRS: [&str; 3] = ["fill", "stroke", "color"];

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)\s*$").expect("rgb pattern is valid")
});

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex pattern is valid"));

/// Rewrites `rgb(r,g,b)` colors as lowercase hex and lowercases existing hex
/// colors. Alpha colors and named colors are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertColorsToHex {
    /// Collapse `#aabbcc` to `#abc` where possible.
    pub shorthand: bool,
}

impl Rule for ConvertColorsToHex {
    fn name(&self) -> &'static str {
        "convert-colors-to-hex"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        doc.for_each_element_mut(|elem| self.convert_element(elem));
        Ok(())
    }
}

impl ConvertColorsToHex {
    fn convert_element(&self, elem: &mut Element) {
        for attr in &mut elem.attributes {
            if attr.name.prefix.is_none()
                && COLOR_ATTRS.contains(&attr.name.local.as_str())
                && let Some(hex) = self.convert(&attr.value)
            {
                attr.value = hex;
            }
        }
    }

    /// The canonical form of `color`, or `None` if it must stay as is.
    pub fn convert(&self, color: &str) -> Option<String> {
        let hex = if let Some(caps) = RGB_RE.captures(color) {
            let mut channels = [0u8; 3];
            for (slot, cap) in channels.iter_mut().zip(caps.iter().skip(1)) {
                *slot = cap?.as_str().parse().ok()?;
            }
            format!("#{:02x}{:02x}{:02x}", channels[0], channels[1], channels[2])
        } else if HEX_RE.is_match(color) {
            color.to_ascii_lowercase()
        } else {
            return None;
        };

        if self.shorthand {
            Some(shorten_hex(&hex))
        } else {
            Some(hex)
        }
    }
}

/// `#rrggbb` → `#rgb` when every channel repeats its digit.
fn shorten_hex(hex: &str) -> String {
    let digits = hex.as_bytes();
    if digits.len() == 7 && digits[1] == digits[2] && digits[3] == digits[4] && digits[5] == digits[6] {
        let short = [b'#', digits[1], digits[3], digits[5]];
        return String::from_utf8_lossy(&short).into_owned();
    }
    hex.to_string()
}
