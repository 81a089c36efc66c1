use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Lesson {
    #[schema(example = "L001")]
    pub lesson_id: String,
    #[schema(example = "2025/10/08")]
    pub date: String,
    #[schema(example = "20:00")]
    pub time: String,
    pub group: String,
    pub location: String,
    pub song: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct LessonDetail {
    pub lesson: Lesson,
    /// Participant names in reservation sheet order, duplicates kept.
    pub participants: Vec<String>,
}
