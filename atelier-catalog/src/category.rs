use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Path returned by the file-storage collaborator; the core never touches
    /// the bytes.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Result<Self, CategoryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CategoryError::Validation(
                "category name is required".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            image: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Category names are unique case-insensitively across the store.
pub fn ensure_unique_name(existing: &[Category], name: &str) -> Result<(), CategoryError> {
    let wanted = name.trim().to_lowercase();
    if existing
        .iter()
        .any(|category| category.name.trim().to_lowercase() == wanted)
    {
        return Err(CategoryError::DuplicateName(name.to_string()));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Category validation failed: {0}")]
    Validation(String),

    #[error("Duplicate category name: {0}")]
    DuplicateName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_case_insensitive() {
        let existing = vec![Category::new("Dresses", None).unwrap()];

        assert!(matches!(
            ensure_unique_name(&existing, "dresses"),
            Err(CategoryError::DuplicateName(_))
        ));
        assert!(ensure_unique_name(&existing, "Outerwear").is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(matches!(
            Category::new("   ", None),
            Err(CategoryError::Validation(_))
        ));
    }
}
