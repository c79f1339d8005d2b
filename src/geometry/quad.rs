use crate::foundation::core::{Affine, Canvas, Point, Rect, Vec2};
use crate::foundation::error::{QuadfitError, QuadfitResult};

/// Fraction of the canvas width covered by the default seed box.
pub const SEED_WIDTH_FRAC: f64 = 0.42;
/// Fraction of the canvas height covered by the default seed box.
pub const SEED_HEIGHT_FRAC: f64 = 0.48;
/// Horizontal center of the default seed box, as a fraction of the canvas width.
pub const SEED_CENTER_X_FRAC: f64 = 0.50;
/// Vertical center of the default seed box, as a fraction of the canvas height.
pub const SEED_CENTER_Y_FRAC: f64 = 0.45;

/// Destination quadrilateral, ordered `[top_left, top_right, bottom_right, bottom_left]`.
///
/// Indices 0/2 and 1/3 are diagonal opposites; the warp splits the quad along the 0-2 diagonal.
/// No convexity is enforced: a quad dragged into a bowtie is still a valid value.
///
/// `Quad` is `Copy` and every mutating helper returns a new value, so a caller holding an older
/// quad never observes later edits.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[[f64; 2]; 4]", into = "[[f64; 2]; 4]")]
pub struct Quad {
    points: [Point; 4],
}

impl Quad {
    /// All four vertices at the origin. Used as the "not yet seeded" sentinel.
    pub const ZERO: Self = Self {
        points: [Point::ORIGIN; 4],
    };

    /// Build a quad from its four vertices in `[tl, tr, br, bl]` order.
    pub const fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    /// The axis-aligned quad covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new([
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ])
    }

    /// Default centered box for a canvas: 42% x 48% of the surface, centered at (50%, 45%).
    ///
    /// An empty canvas seeds to [`Quad::ZERO`].
    pub fn seed_for(canvas: Canvas) -> Self {
        if canvas.is_empty() {
            return Self::ZERO;
        }
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let half_w = w * SEED_WIDTH_FRAC / 2.0;
        let half_h = h * SEED_HEIGHT_FRAC / 2.0;
        let cx = w * SEED_CENTER_X_FRAC;
        let cy = h * SEED_CENTER_Y_FRAC;
        Self::from_rect(Rect::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h))
    }

    /// Parse `"x,y x,y x,y x,y"` (whitespace or `;` separated pairs).
    pub fn parse(s: &str) -> QuadfitResult<Self> {
        let pairs: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ';')
            .filter(|p| !p.is_empty())
            .collect();
        if pairs.len() != 4 {
            return Err(QuadfitError::validation(format!(
                "quad needs exactly 4 'x,y' points, got {}",
                pairs.len()
            )));
        }

        let mut points = [Point::ORIGIN; 4];
        for (slot, pair) in points.iter_mut().zip(pairs) {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| QuadfitError::validation(format!("invalid quad point '{pair}'")))?;
            let parse = |v: &str| {
                v.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        QuadfitError::validation(format!("invalid quad coordinate '{v}'"))
                    })
            };
            *slot = Point::new(parse(x)?, parse(y)?);
        }
        Ok(Self::new(points))
    }

    /// The four vertices in `[tl, tr, br, bl]` order.
    pub fn points(&self) -> [Point; 4] {
        self.points
    }

    /// Vertex `i` (0..=3).
    ///
    /// # Panics
    ///
    /// Panics if `i > 3`.
    pub fn vertex(&self, i: usize) -> Point {
        self.points[i]
    }

    /// Return `true` while the quad is still the unseeded sentinel.
    pub fn is_unset(&self) -> bool {
        *self == Self::ZERO
    }

    /// A copy with vertex `i` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `i > 3`.
    pub fn with_vertex(self, i: usize, p: Point) -> Self {
        let mut points = self.points;
        points[i] = p;
        Self { points }
    }

    /// A copy with every vertex shifted by `delta`.
    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            points: self.points.map(|p| p + delta),
        }
    }

    /// Mean of the four vertices. Scale and rotation pivot here.
    pub fn center(&self) -> Point {
        let sum = self
            .points
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        (sum / 4.0).to_point()
    }

    /// A copy with every vertex mapped through `affine`.
    pub fn transformed(self, affine: Affine) -> Self {
        Self {
            points: self.points.map(|p| affine * p),
        }
    }

    /// A copy scaled uniformly by `factor` about [`Quad::center`].
    pub fn scaled_about_center(self, factor: f64) -> Self {
        self.transformed(Affine::scale_about(factor, self.center()))
    }

    /// A copy rotated by `radians` about [`Quad::center`]. Positive angles turn clockwise
    /// on a y-down canvas.
    pub fn rotated_about_center(self, radians: f64) -> Self {
        self.transformed(Affine::rotate_about(radians, self.center()))
    }

    /// A copy with every vertex clamped into `canvas`, each vertex and axis independently.
    ///
    /// This does not preserve the quad's shape: a vertex pushed past an edge is pinned to it
    /// while the others keep moving.
    pub fn clamped_to(self, canvas: Canvas) -> Self {
        Self {
            points: self.points.map(|p| canvas.clamp_point(p)),
        }
    }

    /// Bilinear interpolation over the quad for `u, v` in `[0, 1]`.
    ///
    /// `P(u,v) = lerp(lerp(q0, q1, u), lerp(q3, q2, u), v)`; the corners of the unit square map
    /// exactly onto the four vertices.
    pub fn bilinear(&self, u: f64, v: f64) -> Point {
        let [q0, q1, q2, q3] = self.points;
        let top = q0.lerp(q1, u);
        let bottom = q3.lerp(q2, u);
        top.lerp(bottom, v)
    }

    /// Even-odd (ray casting) point-in-polygon test over the quad outline.
    pub fn contains(&self, p: Point) -> bool {
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Index of the first vertex (in 0..=3 order) within `radius` of `p`.
    pub fn hit_vertex(&self, p: Point, radius: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|v| v.distance_squared(p) <= radius * radius)
    }

    /// Return `true` when every vertex lies inside `canvas` bounds (edges included).
    pub fn within(&self, canvas: Canvas) -> bool {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        self.points
            .iter()
            .all(|p| (0.0..=w).contains(&p.x) && (0.0..=h).contains(&p.y))
    }
}

impl Default for Quad {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[[f64; 2]; 4]> for Quad {
    fn from(raw: [[f64; 2]; 4]) -> Self {
        Self::new(raw.map(|[x, y]| Point::new(x, y)))
    }
}

impl From<Quad> for [[f64; 2]; 4] {
    fn from(q: Quad) -> Self {
        q.points.map(|p| [p.x, p.y])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/quad.rs"]
mod tests;
