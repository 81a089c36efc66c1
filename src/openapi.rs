use utoipa::OpenApi;

use crate::models::{Lesson, LessonDetail};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::list_lessons,
        crate::handlers::get_lesson
    ),
    components(schemas(Lesson, LessonDetail)),
    tags(
        (name = "lessons", description = "Lesson schedule and reservation lookups")
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_lesson_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/lessons"));
        assert!(doc.paths.paths.contains_key("/api/lessons/{id}"));
    }
}
