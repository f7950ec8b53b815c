//! services/meter_service/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the meter capture API.
//!
//! Usage: `openapi [PATH]`. The path defaults to `openapi.json`.

use meter_service_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_PATH: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PATH.to_string());

    let api = ApiDoc::openapi();
    std::fs::write(&path, api.to_pretty_json()?)?;
    println!("Wrote {} paths to {}", api.paths.paths.len(), path);
    Ok(())
}
