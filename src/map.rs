use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One route record as it appears in a map file.
///
/// `Length` and `Ferries` stay signed so that out-of-range values reach
/// board validation instead of failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteRecord {
    #[serde(alias = "endpoints")]
    pub endpoints: Vec<String>,
    #[serde(alias = "color", default)]
    pub color: String,
    #[serde(alias = "length")]
    pub length: i64,
    #[serde(alias = "tunnel", default)]
    pub tunnel: bool,
    #[serde(alias = "ferries", default)]
    pub ferries: i64,
}

impl RouteRecord {
    pub fn new(a: &str, b: &str, color: &str, length: i64) -> Self {
        Self {
            endpoints: vec![a.to_string(), b.to_string()],
            color: color.to_string(),
            length,
            tunnel: false,
            ferries: 0,
        }
    }

    pub fn tunnel(mut self) -> Self {
        self.tunnel = true;
        self
    }

    pub fn ferries(mut self, n: i64) -> Self {
        self.ferries = n;
        self
    }
}

/// Order-preserving map description. No validation happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapData {
    pub routes: Vec<RouteRecord>,
}

impl MapData {
    #[inline]
    pub fn new(routes: Vec<RouteRecord>) -> Self {
        Self { routes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Debug, Error)]
#[error("failed to decode map JSON: {0}")]
pub struct MapParseError(#[from] serde_json::Error);

/// Decode a JSON array of route records.
pub fn parse_map_json(data: &[u8]) -> Result<MapData, MapParseError> {
    let routes: Vec<RouteRecord> = serde_json::from_slice(data)?;
    Ok(MapData { routes })
}
