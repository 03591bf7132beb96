//! Route paths and transport-level messages.

pub const CONVERT_TONE_PATH: &str = "/api/convert-tone";
pub const OPENAPI_PATH: &str = "/api/openapi.json";
pub const HEALTH_PATH: &str = "/health";

pub const NOT_MULTIPART_MESSAGE: &str = "Request must be a multipart request.";
