//! Textual cleanup of numbers in geometry attributes.

use crate::ast::{Document, Element};
use crate::error::ShrinkError;
use crate::rules::Rule;

const SHAPES: [&str; 7] = ["path", "rect", "circle", "ellipse", "line", "polyline", "polygon"];

const GEOMETRY_ATTRS: [&str; 15] = [
    "x", "y", "x1", "y1", "x2", "y2", "width", "height", "cx", "cy", "rx", "ry", "r", "points", "d",
];

/// Strips trailing fractional zeros and bare decimal points from geometry
/// attributes on shape elements (`10.500` → `10.5`, `10.0` → `10`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MinifyCoordinates;

impl Rule for MinifyCoordinates {
    fn name(&self) -> &'static str {
        "minify-coordinates"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        doc.for_each_element_mut(minify_element);
        Ok(())
    }
}

fn minify_element(elem: &mut Element) {
    if !SHAPES.contains(&elem.name.local.as_str()) {
        return;
    }
    for attr in &mut elem.attributes {
        if attr.name.prefix.is_none() && GEOMETRY_ATTRS.contains(&attr.name.local.as_str()) {
            let minified = minify_numbers(&attr.value);
            if minified != attr.value {
                attr.value = minified;
            }
        }
    }
}

/// Rewrite every decimal fraction in `s` without changing its value.
///
/// Works on the text only: numbers are never parsed, so magnitude and sign
/// are preserved exactly. Fractions followed by an exponent are untouched.
pub(crate) fn minify_numbers(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'.' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'.' {
                i += 1;
            }
            out.push_str(&s[start..i]);
            continue;
        }

        let frac_start = i + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let next = bytes.get(frac_end).copied();

        if matches!(next, Some(b'e' | b'E')) {
            out.push_str(&s[i..frac_end]);
            i = frac_end;
            continue;
        }

        let digits = s[frac_start..frac_end].trim_end_matches('0');
        if !digits.is_empty() {
            out.push('.');
            out.push_str(digits);
        } else {
            // Digits right before the point only count as an integer part
            // if they are not the fraction of the previous number.
            let mut j = i;
            while j > 0 && bytes[j - 1].is_ascii_digit() {
                j -= 1;
            }
            let has_integer_part = j < i && !(j > 0 && bytes[j - 1] == b'.');
            if !has_integer_part {
                // ".0" on its own is still zero
                if out.as_bytes().last().is_some_and(u8::is_ascii_digit) {
                    out.push(' ');
                }
                out.push('0');
            }
            if next == Some(b'.') {
                // "1.0.5" is two numbers; keep them apart
                out.push(' ');
            }
        }
        i = frac_end;
    }

    out
}
