//! Easing curves.
//!
//! Names follow the strings page code already uses (`"none"`, `"power2.in"`,
//! `"power3.out"`, `"power2.inOut"`), plus CSS keywords and
//! `cubic-bezier(x1, y1, x2, y2)`. `powerN` maps to an exponent of `N + 1`, so
//! `power1` is quadratic and `power2` is cubic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScrollError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EaseDir {
    In,
    Out,
    InOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    #[default]
    Linear,
    Power {
        power: u8,
        dir: EaseDir,
    },
    /// Control points (x1, y1, x2, y2) of a CSS-style timing curve.
    CubicBezier([f32; 4]),
}

impl Ease {
    pub const fn power_in(power: u8) -> Self {
        Ease::Power {
            power,
            dir: EaseDir::In,
        }
    }

    pub const fn power_out(power: u8) -> Self {
        Ease::Power {
            power,
            dir: EaseDir::Out,
        }
    }

    pub const fn power_in_out(power: u8) -> Self {
        Ease::Power {
            power,
            dir: EaseDir::InOut,
        }
    }

    /// Map linear progress `t` (clamped to [0,1]) through the curve.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Ease::Linear => t,
            Ease::Power { power, dir } => {
                let exp = i32::from(power) + 1;
                match dir {
                    EaseDir::In => t.powi(exp),
                    EaseDir::Out => 1.0 - (1.0 - t).powi(exp),
                    EaseDir::InOut => {
                        if t < 0.5 {
                            (2.0 * t).powi(exp) * 0.5
                        } else {
                            1.0 - (2.0 * (1.0 - t)).powi(exp) * 0.5
                        }
                    }
                }
            }
            Ease::CubicBezier([x1, y1, x2, y2]) => bezier_ease_t(t, x1, y1, x2, y2),
        }
    }
}

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 in [0,1]
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

fn parse_bezier_args(body: &str) -> Option<[f32; 4]> {
    let parts: Vec<f32> = body
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    let [x1, y1, x2, y2]: [f32; 4] = parts.try_into().ok()?;
    if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
        return None;
    }
    Some([x1, y1, x2, y2])
}

impl FromStr for Ease {
    type Err = ScrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || ScrollError::Parse(format!("unknown ease '{s}'"));
        match s {
            "none" | "linear" => return Ok(Ease::Linear),
            "ease" => return Ok(Ease::CubicBezier([0.25, 0.1, 0.25, 1.0])),
            "ease-in" => return Ok(Ease::CubicBezier([0.42, 0.0, 1.0, 1.0])),
            "ease-out" => return Ok(Ease::CubicBezier([0.0, 0.0, 0.58, 1.0])),
            "ease-in-out" => return Ok(Ease::CubicBezier([0.42, 0.0, 0.58, 1.0])),
            _ => {}
        }
        if let Some(body) = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_bezier_args(body).map(Ease::CubicBezier).ok_or_else(bad);
        }
        let rest = s.strip_prefix("power").ok_or_else(bad)?;
        // A bare `powerN` eases out.
        let (num, dir) = rest.split_once('.').unwrap_or((rest, "out"));
        let power: u8 = num.parse().map_err(|_| bad())?;
        if power > 4 {
            return Err(bad());
        }
        let dir = match dir {
            "in" => EaseDir::In,
            "out" => EaseDir::Out,
            "inOut" => EaseDir::InOut,
            _ => return Err(bad()),
        };
        if power == 0 {
            return Ok(Ease::Linear);
        }
        Ok(Ease::Power { power, dir })
    }
}

impl TryFrom<String> for Ease {
    type Error = ScrollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Linear => f.write_str("none"),
            Ease::Power { power, dir } => {
                let dir = match dir {
                    EaseDir::In => "in",
                    EaseDir::Out => "out",
                    EaseDir::InOut => "inOut",
                };
                write!(f, "power{power}.{dir}")
            }
            Ease::CubicBezier([x1, y1, x2, y2]) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.to_string()
    }
}
