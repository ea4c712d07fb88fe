use serde::{Deserialize, Serialize};

/// Glyph drawn at both ends of every measurement line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStyle {
    #[default]
    Arrow,
    TShape,
    Dot,
}

impl EndpointStyle {
    pub const ALL: [Self; 3] = [Self::Arrow, Self::TShape, Self::Dot];
}
