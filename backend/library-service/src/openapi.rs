/// OpenAPI documentation for the ED-Library Library Service
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ED-Library Library Service API",
        version = "0.1.0",
        description = "Course note feeds for ED-Library. Serves cursor-paginated course posts in timeline (newest first) and pdf (oldest first, flattened) views, post maintenance, and the ad creatives placed between feed content.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "courses", description = "Course lookup and feed pages"),
        (name = "posts", description = "Post edits, image removal, and deletion"),
        (name = "ads", description = "Ad pools, interstitial draws, and view counting"),
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn title() -> &'static str {
        "ED-Library Library Service"
    }

    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
