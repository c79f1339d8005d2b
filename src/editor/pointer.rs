use crate::foundation::core::Point;

/// Phase of a raw pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// Device disconnect or an interrupted touch; handled exactly like [`PointerKind::Up`].
    Cancel,
}

/// A pointer event in surface pixel coordinates.
///
/// Serialized as `{"kind": "down", "x": 10.0, "y": 20.0, "pointer_id": 1}`; `pointer_id`
/// defaults to `0` so single-pointer scripts can omit it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub pointer_id: u64,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            pointer_id: 0,
        }
    }

    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    pub fn cancel() -> Self {
        Self::new(PointerKind::Cancel, 0.0, 0.0)
    }

    pub fn with_pointer_id(mut self, pointer_id: u64) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Parse a JSON array of events, as written by recording tools.
    pub fn parse_script(json: &str) -> crate::foundation::error::QuadfitResult<Vec<Self>> {
        serde_json::from_str(json).map_err(|e| {
            crate::foundation::error::QuadfitError::serde(format!("pointer script: {e}"))
        })
    }
}
