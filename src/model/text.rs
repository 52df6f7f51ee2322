//! Text codes and glyph placement.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A run of characters sharing one start point (`TextCode`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextCode {
    /// Start x; inherited from the previous code when absent
    pub x: Option<f64>,
    /// Start y (baseline); inherited from the previous code when absent
    pub y: Option<f64>,
    /// Horizontal offsets between consecutive characters
    pub delta_x: Vec<f64>,
    /// Vertical offsets between consecutive characters
    pub delta_y: Vec<f64>,
    /// Unicode text
    pub text: String,
}

/// A character at its resolved position in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    pub x: f64,
    pub y: f64,
}

impl TextCode {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Upper bound on the number of deltas of one TextCode.
pub const MAX_DELTAS: usize = 1 << 20;

/// Expand a `DeltaX`/`DeltaY` list, resolving the `g <count> <value>`
/// repetition shorthand.
pub fn expand_deltas(s: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    let mut tokens = s.split_whitespace();

    while let Some(token) = tokens.next() {
        if token == "g" {
            let count = tokens
                .next()
                .and_then(|t| t.parse::<usize>().ok())
                .ok_or_else(|| Error::Xml(format!("invalid delta repetition in '{}'", s)))?;
            let value = tokens
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .ok_or_else(|| Error::Xml(format!("invalid delta repetition in '{}'", s)))?;
            if count > MAX_DELTAS - values.len() {
                return Err(Error::Xml(format!(
                    "delta repetition of {} exceeds {} values",
                    count, MAX_DELTAS
                )));
            }
            values.extend(std::iter::repeat(value).take(count));
        } else {
            let value = token
                .parse::<f64>()
                .map_err(|_| Error::Xml(format!("invalid delta value '{}'", token)))?;
            if values.len() == MAX_DELTAS {
                return Err(Error::Xml(format!("more than {} delta values", MAX_DELTAS)));
            }
            values.push(value);
        }
    }

    Ok(values)
}

/// Resolve every character of a text object's codes to its position.
///
/// A code without `X`/`Y` continues from the previous code's start (0 for the
/// first). When a delta list is shorter than the text, its last value is
/// reused for the remaining characters.
pub fn place_glyphs(codes: &[TextCode]) -> Vec<PlacedGlyph> {
    let mut glyphs = Vec::new();
    let mut prev_x = 0.0;
    let mut prev_y = 0.0;

    for code in codes {
        let mut x = code.x.unwrap_or(prev_x);
        let mut y = code.y.unwrap_or(prev_y);

        for (i, ch) in code.text.chars().enumerate() {
            if i > 0 {
                x += delta_at(&code.delta_x, i - 1);
                y += delta_at(&code.delta_y, i - 1);
            }
            glyphs.push(PlacedGlyph { ch, x, y });
        }

        if let Some(cx) = code.x {
            prev_x = cx;
        }
        if let Some(cy) = code.y {
            prev_y = cy;
        }
    }

    glyphs
}

fn delta_at(deltas: &[f64], index: usize) -> f64 {
    deltas
        .get(index)
        .or_else(|| deltas.last())
        .copied()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_deltas() {
        assert_eq!(expand_deltas("1 2.5 3").unwrap(), vec![1.0, 2.5, 3.0]);
        assert!(expand_deltas("").unwrap().is_empty());
    }

    #[test]
    fn test_expand_repetition() {
        assert_eq!(
            expand_deltas("g 3 4.2 1").unwrap(),
            vec![4.2, 4.2, 4.2, 1.0]
        );
        assert_eq!(
            expand_deltas("2 g 2 3").unwrap(),
            vec![2.0, 3.0, 3.0]
        );
    }

    #[test]
    fn test_expand_invalid() {
        assert!(expand_deltas("g 3").is_err());
        assert!(expand_deltas("g x 1").is_err());
        assert!(expand_deltas("1 abc").is_err());
    }

    #[test]
    fn test_expand_oversized_repetition() {
        assert!(matches!(
            expand_deltas("g 18446744073709551615 1"),
            Err(Error::Xml(_))
        ));
        assert!(matches!(
            expand_deltas(&format!("1 g {} 2", MAX_DELTAS)),
            Err(Error::Xml(_))
        ));
        assert_eq!(expand_deltas(&format!("g {} 2", MAX_DELTAS)).unwrap().len(), MAX_DELTAS);
    }

    #[test]
    fn test_place_with_short_deltas() {
        let code = TextCode {
            delta_x: vec![3.0],
            ..TextCode::new(10.0, 20.0, "abc")
        };
        let glyphs = place_glyphs(&[code]);
        let xs: Vec<f64> = glyphs.iter().map(|g| g.x).collect();
        assert_eq!(xs, vec![10.0, 13.0, 16.0]);
        assert!(glyphs.iter().all(|g| g.y == 20.0));
    }

    #[test]
    fn test_place_inherits_missing_coordinates() {
        let first = TextCode::new(5.0, 8.0, "A");
        let second = TextCode {
            x: Some(12.0),
            y: None,
            text: "B".into(),
            ..Default::default()
        };
        let glyphs = place_glyphs(&[first, second]);
        assert_eq!(glyphs[1], PlacedGlyph { ch: 'B', x: 12.0, y: 8.0 });
    }

    #[test]
    fn test_place_vertical_deltas() {
        let code = TextCode {
            delta_y: vec![5.0, 5.0],
            ..TextCode::new(0.0, 0.0, "一二三")
        };
        let ys: Vec<f64> = place_glyphs(&[code]).iter().map(|g| g.y).collect();
        assert_eq!(ys, vec![0.0, 5.0, 10.0]);
    }
}
