use serde::{Deserialize, Serialize};

/// Opaque RGB bone color, persisted as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self { Self::new(0, 0, 0) }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self { Self::new(c[0], c[1], c[2]) }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self { [c.r, c.g, c.b] }
}
