//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::handlers;
use tonewrite_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tonewrite API",
        version = "0.1.0",
        description = "Rewrites a Word document in the tone of a second reference document using a text-generation backend."
    ),
    paths(
        handlers::convert::convert_tone,
        handlers::download::download_file,
        handlers::health::liveness_check,
    ),
    components(schemas(
        models::ConversionResponse,
        models::AcceptedResponse,
        models::ErrorResponse,
        models::FileRole,
    )),
    tags(
        (name = "conversion", description = "Tone conversion"),
        (name = "files", description = "Generated document retrieval"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let spec = get_openapi_spec();
        for path in [
            "/api/convert-tone",
            "/api/files/download/{file_name}",
            "/health",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
