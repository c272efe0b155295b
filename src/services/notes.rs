use crate::auth::identity::Caller;
use crate::db::NoteStore;
use crate::types::{AppError, NewNote, Note, NoteId, NoteRequest, NoteUpdate, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Owner-scoped note operations.
///
/// Every method takes the [`Caller`] and passes its id to the store as the
/// owner; the store filters on `(id, owner)` in the query itself. Notes owned
/// by another account are reported exactly like notes that do not exist.
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<Note>> {
        self.store.list_by_owner(caller.id()).await
    }

    pub async fn get(&self, caller: &Caller, id: NoteId) -> Result<Note> {
        self.store
            .get_by_id_and_owner(id, caller.id())
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, caller: &Caller, request: NoteRequest) -> Result<Note> {
        let new_note = NewNote {
            owner: caller.id(),
            title: request.title,
            content: request.content,
            created_at: now(),
        };

        let id = self.store.create_note(&new_note).await?;
        debug!(note_id = %id, owner = %new_note.owner, "note created");

        Ok(Note {
            id,
            user_id: new_note.owner,
            title: new_note.title,
            content: new_note.content,
            created_at: new_note.created_at,
            updated_at: None,
        })
    }

    pub async fn update(&self, caller: &Caller, id: NoteId, request: NoteRequest) -> Result<()> {
        let update = NoteUpdate {
            id,
            owner: caller.id(),
            title: request.title,
            content: request.content,
            updated_at: now(),
        };

        if self.store.update_by_id_and_owner(&update).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    pub async fn delete(&self, caller: &Caller, id: NoteId) -> Result<()> {
        if self.store.delete_by_id_and_owner(id, caller.id()).await? {
            debug!(note_id = %id, "note deleted");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

/// Current time at the millisecond precision the store keeps.
fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

fn not_found(id: NoteId) -> AppError {
    AppError::NotFound(format!("Note {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TursoClient;
    use crate::types::AccountId;

    async fn create_test_service() -> NoteService {
        let db = TursoClient::new_memory().await.expect("in-memory db");
        NoteService::new(Arc::new(db))
    }

    fn request(title: &str, content: &str) -> NoteRequest {
        NoteRequest {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_attaches_caller_as_owner() {
        let service = create_test_service().await;
        let ann = Caller::for_tests(AccountId(1));

        let note = service.create(&ann, request("t", "c")).await.unwrap();

        assert_eq!(note.user_id, AccountId(1));
        assert!(note.updated_at.is_none());
        assert_eq!(service.get(&ann, note.id).await.unwrap(), note);
    }

    #[tokio::test]
    async fn test_other_owner_sees_not_found() {
        let service = create_test_service().await;
        let ann = Caller::for_tests(AccountId(1));
        let bob = Caller::for_tests(AccountId(2));

        let note = service.create(&ann, request("mine", "secret")).await.unwrap();

        assert!(matches!(
            service.get(&bob, note.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update(&bob, note.id, request("x", "y")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&bob, note.id).await,
            Err(AppError::NotFound(_))
        ));

        // Untouched for the owner
        let still_there = service.get(&ann, note.id).await.unwrap();
        assert_eq!(still_there.title, "mine");
        assert_eq!(still_there.content, "secret");
    }

    #[tokio::test]
    async fn test_foreign_and_missing_notes_look_the_same() {
        let service = create_test_service().await;
        let ann = Caller::for_tests(AccountId(1));
        let bob = Caller::for_tests(AccountId(2));

        let note = service.create(&ann, request("t", "c")).await.unwrap();

        let foreign = service.get(&bob, note.id).await.unwrap_err();
        let missing = service.get(&bob, NoteId(note.id.0 + 1000)).await.unwrap_err();

        assert_eq!(foreign.status_code(), missing.status_code());
    }

    #[tokio::test]
    async fn test_update_sets_updated_at() {
        let service = create_test_service().await;
        let ann = Caller::for_tests(AccountId(1));

        let note = service.create(&ann, request("old", "old")).await.unwrap();
        service
            .update(&ann, note.id, request("new", "body"))
            .await
            .unwrap();

        let updated = service.get(&ann, note.id).await.unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.content, "body");
        assert_eq!(updated.user_id, AccountId(1));
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = create_test_service().await;
        let ann = Caller::for_tests(AccountId(1));

        let note = service.create(&ann, request("t", "c")).await.unwrap();
        service.delete(&ann, note.id).await.unwrap();

        assert!(matches!(
            service.get(&ann, note.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&ann, note.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_newest_first() {
        let service = create_test_service().await;
        let ann = Caller::for_tests(AccountId(1));
        let bob = Caller::for_tests(AccountId(2));

        let first = service.create(&ann, request("first", "")).await.unwrap();
        service.create(&bob, request("bob's", "")).await.unwrap();
        let second = service.create(&ann, request("second", "")).await.unwrap();

        let notes = service.list(&ann).await.unwrap();
        let ids: Vec<NoteId> = notes.iter().map(|n| n.id).collect();

        assert_eq!(ids, vec![second.id, first.id]);
        assert!(notes.iter().all(|n| n.user_id == AccountId(1)));
    }
}
