use crate::error::ApiError;

pub fn missing_lesson_id() -> ApiError {
    ApiError::BadRequest("Lesson ID is required".into())
}

pub fn validate_lesson_id(value: &str) -> Result<&str, ApiError> {
    if value.is_empty() {
        Err(missing_lesson_id())
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_lesson_id() {
        assert_eq!(validate_lesson_id("L001").unwrap(), "L001");
        assert_eq!(validate_lesson_id(" ").unwrap(), " ");
        assert!(matches!(
            validate_lesson_id(""),
            Err(ApiError::BadRequest(_))
        ));
    }
}
