//! Path geometry and the `AbbreviatedData` mini-language.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One drawing command of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    /// `S x y` / `M x y`
    MoveTo { x: f64, y: f64 },
    /// `L x y`
    LineTo { x: f64, y: f64 },
    /// `Q x1 y1 x y`
    QuadTo { x1: f64, y1: f64, x: f64, y: f64 },
    /// `B x1 y1 x2 y2 x y`
    CubicTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// `A rx ry angle large_arc sweep x y`
    Arc {
        rx: f64,
        ry: f64,
        /// Rotation of the ellipse x axis, in degrees
        angle: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    /// `C`
    Close,
}

impl PathCommand {
    /// End point of the command, if it moves the current point.
    pub fn end_point(&self) -> Option<(f64, f64)> {
        match *self {
            PathCommand::MoveTo { x, y }
            | PathCommand::LineTo { x, y }
            | PathCommand::QuadTo { x, y, .. }
            | PathCommand::CubicTo { x, y, .. }
            | PathCommand::Arc { x, y, .. } => Some((x, y)),
            PathCommand::Close => None,
        }
    }
}

fn operand_count(command: char) -> Option<usize> {
    match command {
        'S' | 'M' | 'L' => Some(2),
        'Q' => Some(4),
        'B' => Some(6),
        'A' => Some(7),
        'C' => Some(0),
        _ => None,
    }
}

/// Parse `AbbreviatedData` text into commands.
///
/// Operands following a complete command without a new command letter
/// repeat the previous command, except after `C`.
pub fn parse_abbreviated_data(data: &str) -> Result<Vec<PathCommand>> {
    let tokens: Vec<&str> = data.split_whitespace().collect();
    let mut commands = Vec::new();
    let mut current: Option<char> = None;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        let command = match single_letter(token) {
            Some(c) => {
                i += 1;
                c
            }
            None => match current {
                Some(c) if c != 'C' => c,
                _ => {
                    return Err(Error::Xml(format!(
                        "AbbreviatedData: unexpected token '{}'",
                        token
                    )))
                }
            },
        };

        let count = operand_count(command).ok_or_else(|| {
            Error::Xml(format!("AbbreviatedData: unknown command '{}'", command))
        })?;
        if i + count > tokens.len() {
            return Err(Error::Xml(format!(
                "AbbreviatedData: command '{}' expects {} operands",
                command, count
            )));
        }

        let mut n = [0.0f64; 7];
        for (slot, token) in n.iter_mut().zip(&tokens[i..i + count]) {
            *slot = token.parse().map_err(|_| {
                Error::Xml(format!("AbbreviatedData: invalid number '{}'", token))
            })?;
        }
        i += count;

        commands.push(match command {
            'S' | 'M' => PathCommand::MoveTo { x: n[0], y: n[1] },
            'L' => PathCommand::LineTo { x: n[0], y: n[1] },
            'Q' => PathCommand::QuadTo {
                x1: n[0],
                y1: n[1],
                x: n[2],
                y: n[3],
            },
            'B' => PathCommand::CubicTo {
                x1: n[0],
                y1: n[1],
                x2: n[2],
                y2: n[3],
                x: n[4],
                y: n[5],
            },
            'A' => PathCommand::Arc {
                rx: n[0],
                ry: n[1],
                angle: n[2],
                large_arc: n[3] != 0.0,
                sweep: n[4] != 0.0,
                x: n[5],
                y: n[6],
            },
            _ => PathCommand::Close,
        });
        current = Some(command);
    }

    Ok(commands)
}

fn single_letter(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

/// Convert a quadratic Bézier into the equivalent cubic control points.
pub fn quad_to_cubic(x0: f64, y0: f64, x1: f64, y1: f64, x: f64, y: f64) -> [f64; 6] {
    [
        x0 + 2.0 / 3.0 * (x1 - x0),
        y0 + 2.0 / 3.0 * (y1 - y0),
        x + 2.0 / 3.0 * (x1 - x),
        y + 2.0 / 3.0 * (y1 - y),
        x,
        y,
    ]
}

/// Approximate an elliptical arc (SVG endpoint parameterisation) with cubic
/// Béziers, each spanning at most a quarter turn.
///
/// Degenerate arcs (zero radius or coincident end points) become a single
/// straight segment.
#[allow(clippy::too_many_arguments)]
pub fn arc_to_cubics(
    x0: f64,
    y0: f64,
    rx: f64,
    ry: f64,
    angle: f64,
    large_arc: bool,
    sweep: bool,
    x: f64,
    y: f64,
) -> Vec<[f64; 6]> {
    if (x0 - x).abs() < f64::EPSILON && (y0 - y).abs() < f64::EPSILON {
        return Vec::new();
    }
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx < f64::EPSILON || ry < f64::EPSILON {
        return vec![[x0, y0, x, y, x, y]];
    }

    let phi = angle.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    // Endpoint to center parameterisation
    let dx = (x0 - x) / 2.0;
    let dy = (y0 - y) / 2.0;
    let x1p = cos_phi * dx + sin_phi * dy;
    let y1p = -sin_phi * dx + cos_phi * dy;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * -(ry * x1p / rx);
    let cx = cos_phi * cxp - sin_phi * cyp + (x0 + x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (y0 + y) / 2.0;

    let theta1 = vector_angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
    let mut delta = vector_angle(
        (x1p - cxp) / rx,
        (y1p - cyp) / ry,
        (-x1p - cxp) / rx,
        (-y1p - cyp) / ry,
    );
    if !sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    } else if sweep && delta < 0.0 {
        delta += 2.0 * PI;
    }

    let segments = (delta.abs() / (PI / 2.0)).ceil().max(1.0) as usize;
    let step = delta / segments as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let point = |t: f64| -> (f64, f64) {
        let (s, c) = t.sin_cos();
        (
            cx + rx * c * cos_phi - ry * s * sin_phi,
            cy + rx * c * sin_phi + ry * s * cos_phi,
        )
    };
    let derivative = |t: f64| -> (f64, f64) {
        let (s, c) = t.sin_cos();
        (
            -rx * s * cos_phi - ry * c * sin_phi,
            -rx * s * sin_phi + ry * c * cos_phi,
        )
    };

    let mut curves = Vec::with_capacity(segments);
    let mut t = theta1;
    for i in 0..segments {
        let t2 = t + step;
        let (px, py) = point(t);
        let (qx, qy) = if i + 1 == segments { (x, y) } else { point(t2) };
        let (d1x, d1y) = derivative(t);
        let (d2x, d2y) = derivative(t2);
        curves.push([
            px + k * d1x,
            py + k * d1y,
            qx - k * d2x,
            qy - k * d2y,
            qx,
            qy,
        ]);
        t = t2;
    }
    curves
}

fn vector_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let dot = ux * vx + uy * vy;
    let len = (ux * ux + uy * uy).sqrt() * (vx * vx + vy * vy).sqrt();
    let mut angle = (dot / len).clamp(-1.0, 1.0).acos();
    if ux * vy - uy * vx < 0.0 {
        angle = -angle;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        let commands = parse_abbreviated_data("M 10 10 L 20 10 L 20 20 C").unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo { x: 10.0, y: 10.0 },
                PathCommand::LineTo { x: 20.0, y: 10.0 },
                PathCommand::LineTo { x: 20.0, y: 20.0 },
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_parse_start_and_implicit_repeat() {
        let commands = parse_abbreviated_data("S 0 0 L 1 1 2 2").unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], PathCommand::MoveTo { x: 0.0, y: 0.0 });
        assert_eq!(commands[2], PathCommand::LineTo { x: 2.0, y: 2.0 });
    }

    #[test]
    fn test_parse_arc_and_curves() {
        let commands =
            parse_abbreviated_data("M 0 0 Q 5 5 10 0 B 1 2 3 4 5 6 A 5 5 0 1 0 10 10").unwrap();
        assert!(matches!(commands[1], PathCommand::QuadTo { x: 10.0, .. }));
        assert!(matches!(commands[2], PathCommand::CubicTo { y2: 4.0, .. }));
        assert!(matches!(
            commands[3],
            PathCommand::Arc {
                large_arc: true,
                sweep: false,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_abbreviated_data("M 10").is_err());
        assert!(parse_abbreviated_data("X 1 2").is_err());
        assert!(parse_abbreviated_data("M a b").is_err());
        assert!(parse_abbreviated_data("10 10").is_err());
        assert!(parse_abbreviated_data("").unwrap().is_empty());
    }

    #[test]
    fn test_quad_to_cubic() {
        let c = quad_to_cubic(0.0, 0.0, 3.0, 3.0, 6.0, 0.0);
        assert_eq!(c, [2.0, 2.0, 4.0, 2.0, 6.0, 0.0]);
    }

    #[test]
    fn test_half_circle_arc() {
        // Half circle of radius 5 from (0,0) to (10,0)
        let curves = arc_to_cubics(0.0, 0.0, 5.0, 5.0, 0.0, false, true, 10.0, 0.0);
        assert_eq!(curves.len(), 2);
        let last = curves.last().unwrap();
        assert!((last[4] - 10.0).abs() < 1e-9);
        assert!(last[5].abs() < 1e-9);

        // The midpoint of the arc lies on the circle
        let mid = curves[0];
        let dist = ((mid[4] - 5.0).powi(2) + mid[5].powi(2)).sqrt();
        assert!((dist - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_arc() {
        assert!(arc_to_cubics(1.0, 1.0, 5.0, 5.0, 0.0, false, true, 1.0, 1.0).is_empty());
        let line = arc_to_cubics(0.0, 0.0, 0.0, 5.0, 0.0, false, true, 4.0, 0.0);
        assert_eq!(line, vec![[0.0, 0.0, 4.0, 0.0, 4.0, 0.0]]);
    }
}
