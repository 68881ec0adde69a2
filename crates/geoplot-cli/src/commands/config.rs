use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use geoplot_core::config::{ConfigValue, LayeredConfig};
use tabled::Tabled;

pub fn execute(layered_config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        let entry = |value: &ConfigValue<usize>| ConfigEntry {
            value: value.value,
            source: value.source,
        };

        return output.result(ConfigOutput {
            max_polygons: entry(&layered_config.max_polygons),
            max_rectangles: entry(&layered_config.max_rectangles),
            max_circles: entry(&layered_config.max_circles),
            max_line_strings: entry(&layered_config.max_line_strings),
            coordinate_space: ConfigEntry {
                value: layered_config.coordinate_space.value.to_string(),
                source: layered_config.coordinate_space.source,
            },
        });
    }

    output.section("Configuration Values");

    #[derive(Tabled)]
    struct ConfigRow {
        #[tabled(rename = "Key")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Source")]
        source: String,
    }

    let mut rows: Vec<ConfigRow> = layered_config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();

    // Sort by key for consistent output
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    output.table(rows);

    output.section("Configuration Precedence");
    output.info("CLI arguments > Environment variables > Config file > Defaults");

    Ok(())
}
