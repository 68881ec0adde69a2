use crate::error::{GeoplotError, Result};
use crate::models::{CoordinateSpace, ShapeKind, ShapeLimits};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default maximum number of shapes held per kind
pub const DEFAULT_SHAPE_LIMIT: usize = 10;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for GeoPlot
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub max_polygons: ConfigValue<usize>,
    pub max_rectangles: ConfigValue<usize>,
    pub max_circles: ConfigValue<usize>,
    pub max_line_strings: ConfigValue<usize>,
    pub coordinate_space: ConfigValue<CoordinateSpace>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            max_polygons: ConfigValue::new(DEFAULT_SHAPE_LIMIT, ConfigSource::Default),
            max_rectangles: ConfigValue::new(DEFAULT_SHAPE_LIMIT, ConfigSource::Default),
            max_circles: ConfigValue::new(DEFAULT_SHAPE_LIMIT, ConfigSource::Default),
            max_line_strings: ConfigValue::new(DEFAULT_SHAPE_LIMIT, ConfigSource::Default),
            coordinate_space: ConfigValue::new(CoordinateSpace::Geographic, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeoplotError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoplotError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(limit) = file_config.max_polygons {
            self.max_polygons.update(limit, ConfigSource::File);
        }

        if let Some(limit) = file_config.max_rectangles {
            self.max_rectangles.update(limit, ConfigSource::File);
        }

        if let Some(limit) = file_config.max_circles {
            self.max_circles.update(limit, ConfigSource::File);
        }

        if let Some(limit) = file_config.max_line_strings {
            self.max_line_strings.update(limit, ConfigSource::File);
        }

        if let Some(space) = file_config.coordinate_space {
            self.coordinate_space.update(space, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        for kind in ShapeKind::ALL {
            let var = limit_env_var(kind);
            if let Ok(raw) = env::var(var) {
                match raw.parse::<usize>() {
                    Ok(limit) => self.limit_mut(kind).update(limit, ConfigSource::Environment),
                    Err(_) => tracing::warn!(
                        "Invalid {} value '{}': expected a non-negative integer",
                        var,
                        raw
                    ),
                }
            }
        }

        // GEOPLOT_COORDINATE_SPACE
        if let Ok(space_str) = env::var("GEOPLOT_COORDINATE_SPACE") {
            match parse_coordinate_space(&space_str) {
                Ok(space) => self.coordinate_space.update(space, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPLOT_COORDINATE_SPACE value '{}': expected planar or geographic",
                    space_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(limit) = overrides.max_polygons {
            self.max_polygons.update(limit, ConfigSource::Cli);
        }

        if let Some(limit) = overrides.max_rectangles {
            self.max_rectangles.update(limit, ConfigSource::Cli);
        }

        if let Some(limit) = overrides.max_circles {
            self.max_circles.update(limit, ConfigSource::Cli);
        }

        if let Some(limit) = overrides.max_line_strings {
            self.max_line_strings.update(limit, ConfigSource::Cli);
        }

        if let Some(space) = overrides.coordinate_space {
            self.coordinate_space.update(space, ConfigSource::Cli);
        }
    }

    /// The configured limit for one shape kind
    pub fn limit(&self, kind: ShapeKind) -> &ConfigValue<usize> {
        match kind {
            ShapeKind::Polygon => &self.max_polygons,
            ShapeKind::Rectangle => &self.max_rectangles,
            ShapeKind::Circle => &self.max_circles,
            ShapeKind::LineString => &self.max_line_strings,
        }
    }

    fn limit_mut(&mut self, kind: ShapeKind) -> &mut ConfigValue<usize> {
        match kind {
            ShapeKind::Polygon => &mut self.max_polygons,
            ShapeKind::Rectangle => &mut self.max_rectangles,
            ShapeKind::Circle => &mut self.max_circles,
            ShapeKind::LineString => &mut self.max_line_strings,
        }
    }

    /// Build the per-kind limits handed to the feature store
    pub fn shape_limits(&self) -> ShapeLimits {
        ShapeKind::ALL
            .iter()
            .fold(ShapeLimits::unlimited(), |limits, kind| {
                limits.with_limit(*kind, self.limit(*kind).value)
            })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        for kind in ShapeKind::ALL {
            let value = self.limit(kind);
            map.insert(limit_key(kind).to_string(), (value.value.to_string(), value.source));
        }

        map.insert(
            "coordinate_space".to_string(),
            (self.coordinate_space.value.to_string(), self.coordinate_space.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    max_polygons: Option<usize>,
    max_rectangles: Option<usize>,
    max_circles: Option<usize>,
    max_line_strings: Option<usize>,
    coordinate_space: Option<CoordinateSpace>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub max_polygons: Option<usize>,
    pub max_rectangles: Option<usize>,
    pub max_circles: Option<usize>,
    pub max_line_strings: Option<usize>,
    pub coordinate_space: Option<CoordinateSpace>,
}

/// Configuration key holding the limit for a kind
pub fn limit_key(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Polygon => "max_polygons",
        ShapeKind::Rectangle => "max_rectangles",
        ShapeKind::Circle => "max_circles",
        ShapeKind::LineString => "max_line_strings",
    }
}

/// Environment variable holding the limit for a kind
pub fn limit_env_var(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Polygon => "GEOPLOT_MAX_POLYGONS",
        ShapeKind::Rectangle => "GEOPLOT_MAX_RECTANGLES",
        ShapeKind::Circle => "GEOPLOT_MAX_CIRCLES",
        ShapeKind::LineString => "GEOPLOT_MAX_LINE_STRINGS",
    }
}

/// Parse coordinate space from string
pub fn parse_coordinate_space(s: &str) -> Result<CoordinateSpace> {
    match s.to_lowercase().as_str() {
        "planar" | "plane" => Ok(CoordinateSpace::Planar),
        "geographic" | "wgs84" | "lonlat" => Ok(CoordinateSpace::Geographic),
        _ => Err(GeoplotError::ConfigInvalid {
            key: "coordinate_space".to_string(),
            reason: format!("Invalid coordinate space: {}. Use planar or geographic", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.max_polygons.value, DEFAULT_SHAPE_LIMIT);
        assert_eq!(config.max_polygons.source, ConfigSource::Default);
        assert_eq!(config.coordinate_space.value, CoordinateSpace::Geographic);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
max_polygons = 3
max_circles = 0
coordinate_space = "planar"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.max_polygons.value, 3);
        assert_eq!(config.max_polygons.source, ConfigSource::File);
        assert_eq!(config.max_circles.value, 0);
        assert_eq!(config.max_rectangles.source, ConfigSource::Default);
        assert_eq!(config.coordinate_space.value, CoordinateSpace::Planar);
    }

    #[test]
    fn test_load_from_file_rejects_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_polygons = \"many\"").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(GeoplotError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            max_rectangles: Some(1),
            coordinate_space: Some(CoordinateSpace::Planar),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.max_rectangles.value, 1);
        assert_eq!(config.max_rectangles.source, ConfigSource::Cli);
        assert_eq!(config.coordinate_space.source, ConfigSource::Cli);
        assert_eq!(config.max_polygons.source, ConfigSource::Default);
    }

    #[test]
    fn test_shape_limits() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            max_line_strings: Some(2),
            ..Default::default()
        });

        let limits = config.shape_limits();
        assert_eq!(limits.get(ShapeKind::LineString), Some(2));
        assert_eq!(limits.get(ShapeKind::Polygon), Some(DEFAULT_SHAPE_LIMIT));
    }

    #[test]
    fn test_parse_coordinate_space() {
        assert_eq!(parse_coordinate_space("planar").unwrap(), CoordinateSpace::Planar);
        assert_eq!(parse_coordinate_space("WGS84").unwrap(), CoordinateSpace::Geographic);
        assert!(parse_coordinate_space("spherical").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("max_polygons"));
        assert!(map.contains_key("max_line_strings"));

        let (space, source) = &map["coordinate_space"];
        assert_eq!(space, "geographic");
        assert_eq!(*source, ConfigSource::Default);
    }
}
