use crate::cli::ApplyArgs;
use crate::output::OutputWriter;
use crate::output_types::{ApplyOutput, KindCount, RequestResult, RequestStatus};
use anyhow::{Context, Result};
use geoplot_core::config::LayeredConfig;
use geoplot_core::formats::read_requests_from_path;
use geoplot_core::models::{ShapeKind, ShapeRequest};
use geoplot_store::{export_shapes, to_geojson_string, FeatureStore};
use std::fs;
use tabled::Tabled;

pub fn execute(args: ApplyArgs, layered_config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let requests = read_requests_from_path(&args.input)
        .with_context(|| format!("Failed to read shape requests from {}", args.input.display()))?;

    let space = layered_config.coordinate_space.value;
    let mut store = FeatureStore::new(layered_config.shape_limits(), space);

    tracing::debug!(count = requests.len(), %space, "Applying shape requests");

    let results: Vec<RequestResult> = requests
        .into_iter()
        .enumerate()
        .map(|(index, request)| apply_request(&mut store, index, request))
        .collect();

    let accepted = results.iter().filter(|r| r.status != RequestStatus::Rejected).count();

    let counts = store.shape_counts();
    let kind_counts: Vec<KindCount> = ShapeKind::ALL
        .iter()
        .map(|kind| KindCount {
            kind: *kind,
            count: counts.get(kind).copied().unwrap_or(0),
            limit: layered_config.limit(*kind).value,
        })
        .collect();

    if let Some(path) = &args.export {
        let document = to_geojson_string(export_shapes(&store))?;
        fs::write(path, document)
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
    }

    if output.is_json() {
        return output.result(ApplyOutput {
            input: args.input.display().to_string(),
            coordinate_space: space.to_string(),
            requested: results.len(),
            accepted,
            results,
            counts: kind_counts,
            export_path: args.export.as_ref().map(|p| p.display().to_string()),
        });
    }

    output.kv("Input", args.input.display());
    output.kv("Coordinate space", space);

    output.section("Requests");

    #[derive(Tabled)]
    struct RequestRow {
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "Kind")]
        kind: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Outcome")]
        outcome: String,
    }

    let requested = results.len();
    let rows: Vec<RequestRow> = results
        .into_iter()
        .map(|r| RequestRow {
            index: r.index,
            kind: r.kind.to_string(),
            name: r.name.unwrap_or_else(|| "-".to_string()),
            outcome: match (r.status, r.reason) {
                (RequestStatus::Rejected, Some(reason)) => format!("rejected: {}", reason),
                (RequestStatus::Trimmed, _) => {
                    format!("trimmed ({:.2})", r.area.unwrap_or_default())
                }
                (status, _) => format!("{:?}", status).to_lowercase(),
            },
        })
        .collect();

    output.table(rows);

    output.section("Shape Counts");

    #[derive(Tabled)]
    struct CountRow {
        #[tabled(rename = "Kind")]
        kind: String,
        #[tabled(rename = "Count")]
        count: usize,
        #[tabled(rename = "Limit")]
        limit: usize,
    }

    let count_rows: Vec<CountRow> = kind_counts
        .into_iter()
        .map(|c| CountRow { kind: c.kind.to_string(), count: c.count, limit: c.limit })
        .collect();

    output.table(count_rows);

    println!();
    output.success(format!("Accepted {} of {} shapes", accepted, requested));
    if accepted < requested {
        output.warning(format!("{} request(s) rejected", requested - accepted));
    }
    if let Some(path) = &args.export {
        output.success(format!("Exported {} shapes to {}", store.len(), path.display()));
    }

    Ok(())
}

fn apply_request(store: &mut FeatureStore, index: usize, request: ShapeRequest) -> RequestResult {
    let kind = request.kind();
    let name = request.name.clone();
    let original = request.geometry.clone();

    match store.add_shape(request) {
        Ok(id) => {
            let trimmed = store.get(id).is_some_and(|shape| shape.geometry != original);
            RequestResult {
                index,
                kind,
                name,
                status: if trimmed { RequestStatus::Trimmed } else { RequestStatus::Accepted },
                id: Some(id.to_string()),
                area: store.area_of(id),
                reason: None,
            }
        }
        Err(rejection) => RequestResult {
            index,
            kind,
            name,
            status: RequestStatus::Rejected,
            id: None,
            area: None,
            reason: Some(rejection.to_string()),
        },
    }
}
