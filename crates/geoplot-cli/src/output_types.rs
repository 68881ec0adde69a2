use geoplot_core::config::ConfigSource;
use geoplot_core::models::ShapeKind;
use serde::Serialize;

/// Output for apply command
#[derive(Debug, Serialize)]
pub struct ApplyOutput {
    pub input: String,
    pub coordinate_space: String,
    pub requested: usize,
    pub accepted: usize,
    pub results: Vec<RequestResult>,
    pub counts: Vec<KindCount>,
    pub export_path: Option<String>,
}

/// What happened to one request
#[derive(Debug, Serialize)]
pub struct RequestResult {
    pub index: usize,
    pub kind: ShapeKind,
    pub name: Option<String>,
    pub status: RequestStatus,
    pub id: Option<String>,
    pub area: Option<f64>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Accepted,
    Trimmed,
    Rejected,
}

#[derive(Debug, Serialize)]
pub struct KindCount {
    pub kind: ShapeKind,
    pub count: usize,
    pub limit: usize,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub max_polygons: ConfigEntry<usize>,
    pub max_rectangles: ConfigEntry<usize>,
    pub max_circles: ConfigEntry<usize>,
    pub max_line_strings: ConfigEntry<usize>,
    pub coordinate_space: ConfigEntry<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry<T> {
    pub value: T,
    pub source: ConfigSource,
}
