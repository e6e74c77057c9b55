use utoipa::OpenApi;

use crate::models::{CreateNote, Note, UpdateNote};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Envelope API",
        version = "0.1.0",
        description = "REST backend template with a standardized response envelope. Every JSON response carries `code`, `message` and `data`; callers branch on `code`, not on the HTTP status.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::create_note,
        crate::api::handlers::list_notes,
        crate::api::handlers::get_note,
        crate::api::handlers::update_note,
        crate::api::handlers::delete_note,
    ),
    components(
        schemas(
            Note,
            CreateNote,
            UpdateNote,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "notes", description = "Notes resource with soft delete"),
    )
)]
pub struct ApiDoc;
