use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{notes_table, NoteStore};
use crate::errors::ServiceError;
use crate::models::{Note, UpdateNote};

/// In-memory note store. Backs the integration tests and local runs
/// without a database; mirrors the PostgreSQL store's semantics,
/// including the unique-title constraint.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: RwLock<HashMap<Uuid, Note>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn unique_title_violation() -> ServiceError {
        ServiceError::Integrity(format!(
            "UNIQUE constraint failed: {}.title",
            notes_table()
        ))
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn create(&self, title: String, body: Option<String>) -> Result<Note, ServiceError> {
        let mut notes = self.notes.write().await;

        if notes.values().any(|n| !n.deleted && n.title == title) {
            return Err(Self::unique_title_violation());
        }

        let note = Note::new(title, body);
        notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Note>, i64), ServiceError> {
        let notes = self.notes.read().await;

        let mut active: Vec<Note> = notes.values().filter(|n| !n.deleted).cloned().collect();
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let total = active.len() as i64;
        let page = active
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn retrieve(&self, id: Uuid) -> Result<Option<Note>, ServiceError> {
        let notes = self.notes.read().await;
        Ok(notes.get(&id).filter(|n| !n.deleted).cloned())
    }

    async fn update(&self, id: Uuid, patch: UpdateNote) -> Result<Option<Note>, ServiceError> {
        let mut notes = self.notes.write().await;

        // Existence first, then the constraint, matching the order the
        // PostgreSQL backend reports these in.
        if !notes.get(&id).is_some_and(|n| !n.deleted) {
            return Ok(None);
        }

        if let Some(new_title) = &patch.title {
            let taken = notes
                .values()
                .any(|n| !n.deleted && n.id != id && n.title == *new_title);
            if taken {
                return Err(Self::unique_title_violation());
            }
        }

        let Some(note) = notes.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(body) = patch.body {
            note.body = Some(body);
        }
        note.updated_at = Utc::now();

        Ok(Some(note.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut notes = self.notes.write().await;

        let Some(note) = notes.get_mut(&id).filter(|n| !n.deleted) else {
            return Ok(false);
        };

        note.deleted = true;
        note.updated_at = Utc::now();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_retrieve() {
        let store = MemoryNoteStore::new();
        let note = store
            .create("groceries".to_string(), Some("milk".to_string()))
            .await
            .unwrap();

        let found = store.retrieve(note.id).await.unwrap().unwrap();
        assert_eq!(found.title, "groceries");
        assert_eq!(found.body.as_deref(), Some("milk"));
        assert!(!found.deleted);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_an_integrity_violation() {
        let store = MemoryNoteStore::new();
        store.create("todo".to_string(), None).await.unwrap();

        let err = store.create("todo".to_string(), None).await.unwrap_err();
        match err {
            ServiceError::Integrity(message) => {
                assert!(message.contains("UNIQUE constraint failed"))
            }
            other => panic!("expected integrity violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_soft_delete_hides_note_from_reads() {
        let store = MemoryNoteStore::new();
        let note = store.create("todo".to_string(), None).await.unwrap();

        assert!(store.soft_delete(note.id).await.unwrap());
        assert!(store.retrieve(note.id).await.unwrap().is_none());

        let (page, total) = store.list(0, 10).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(total, 0);

        // A second delete finds nothing to mark.
        assert!(!store.soft_delete(note.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_deleted_title_can_be_reused() {
        let store = MemoryNoteStore::new();
        let note = store.create("todo".to_string(), None).await.unwrap();
        store.soft_delete(note.id).await.unwrap();

        assert!(store.create("todo".to_string(), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let store = MemoryNoteStore::new();
        for i in 0..5 {
            store.create(format!("note {i}"), None).await.unwrap();
        }

        let (page, total) = store.list(2, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title, "note 2");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found_even_with_taken_title() {
        let store = MemoryNoteStore::new();
        store.create("todo".to_string(), None).await.unwrap();

        // Existence wins over the title constraint, as in PostgreSQL,
        // where an update matching zero rows raises nothing.
        let result = store
            .update(
                Uuid::new_v4(),
                UpdateNote {
                    title: Some("todo".to_string()),
                    body: None,
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());

        let note = store.create("other".to_string(), None).await.unwrap();
        store.soft_delete(note.id).await.unwrap();
        let result = store
            .update(
                note.id,
                UpdateNote {
                    title: Some("todo".to_string()),
                    body: None,
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_patches_fields() {
        let store = MemoryNoteStore::new();
        let note = store.create("draft".to_string(), None).await.unwrap();

        let updated = store
            .update(
                note.id,
                UpdateNote {
                    title: None,
                    body: Some("filled in".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "draft");
        assert_eq!(updated.body.as_deref(), Some("filled in"));
    }
}
