/// Easing curve mapping linear progress to eased progress.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Starts slow, ends fast.
    EaseIn,
    /// Starts fast, ends slow.
    EaseOut,
    /// Slow start and end, fast middle.
    EaseInOut,
    /// CSS-style cubic bezier (x1, y1, x2, y2).
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Evaluates the curve at `t`, clamped to `0.0..=1.0`.
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

/// Solves the bezier for `x = t` with Newton-Raphson, then returns `y`.
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let mut u = t;
    for _ in 0..8 {
        let slope = bezier_slope(u, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        u -= (bezier(u, x1, x2) - t) / slope;
    }
    bezier(u, y1, y2)
}

#[inline]
fn bezier(u: f32, p1: f32, p2: f32) -> f32 {
    let mu = 1.0 - u;
    3.0 * mu * mu * u * p1 + 3.0 * mu * u * u * p2 + u * u * u
}

#[inline]
fn bezier_slope(u: f32, p1: f32, p2: f32) -> f32 {
    let mu = 1.0 - u;
    3.0 * mu * mu * p1 + 6.0 * mu * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
}
