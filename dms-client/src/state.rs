//! Application state: named slices, each produced only by its own reducer

use dms_store::Slice;
use serde::Serialize;

use crate::config::{DOCUMENTS_PAGE_SIZE, USERS_PAGE_SIZE};
use crate::model::{Document, Pagination, Role, SearchResults, User};

/// User administration view: listings, search results and paging
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AllState {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub search: SearchResults,
    pub pagination: Pagination,
}

impl Default for AllState {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            roles: Vec::new(),
            search: SearchResults::Empty,
            pagination: Pagination {
                limit: USERS_PAGE_SIZE,
                offset: 0,
                total_count: 0,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentsState {
    pub all: Vec<Document>,
    pub public: Vec<Document>,
    pub role: Vec<Document>,
    pub search: Vec<Document>,
    pub current: Option<Document>,
    pub pagination: Pagination,
}

impl Default for DocumentsState {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            public: Vec::new(),
            role: Vec::new(),
            search: Vec::new(),
            current: None,
            pagination: Pagination {
                limit: DOCUMENTS_PAGE_SIZE,
                offset: 0,
                total_count: 0,
            },
        }
    }
}

/// The signed-in user and the documents they own
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserState {
    pub profile: Option<User>,
    pub documents: Vec<Document>,
}

/// The whole store
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub all: Slice<AllState>,
    pub documents: Slice<DocumentsState>,
    pub user: Slice<UserState>,
    pub role: Slice<Vec<Role>>,
    pub ajax_status: Slice<bool>,
    pub auth: Slice<bool>,
    pub error_message: Slice<String>,
}

impl AppState {
    /// Whether a user is signed in
    pub fn is_authenticated(&self) -> bool {
        *self.auth.get()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.profile.as_ref()
    }

    /// Documents from the full listing the current user may read
    pub fn visible_documents(&self) -> impl Iterator<Item = &Document> {
        let viewer = self.current_user();
        self.documents
            .all
            .iter()
            .filter(move |doc| doc.access.permits(doc.user_id, viewer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Access;
    use serde_json::json;

    #[test]
    fn test_initial_state() {
        let state = AppState::default();

        assert!(state.all.users.is_empty());
        assert!(state.all.roles.is_empty());
        assert_eq!(state.all.search, SearchResults::Empty);
        assert_eq!(state.all.pagination.limit, USERS_PAGE_SIZE);
        assert_eq!(state.all.pagination.offset, 0);
        assert!(state.documents.current.is_none());
        assert_eq!(state.documents.pagination.limit, DOCUMENTS_PAGE_SIZE);
        assert!(state.user.profile.is_none());
        assert!(state.role.is_empty());
        assert!(!*state.ajax_status);
        assert!(!state.is_authenticated());
        assert_eq!(state.error_message.as_str(), "");
    }

    #[test]
    fn test_state_serializes_with_slice_names() {
        let value = serde_json::to_value(AppState::default()).unwrap();

        assert_eq!(value["ajaxStatus"], json!(false));
        assert_eq!(value["auth"], json!(false));
        assert_eq!(value["errorMessage"], json!(""));
        assert_eq!(value["all"]["search"], json!({ "kind": "empty" }));
        assert_eq!(value["all"]["pagination"]["totalCount"], json!(0));
    }

    #[test]
    fn test_visible_documents_respects_access() {
        let doc = |id, user_id, access| Document {
            id,
            user_id,
            title: format!("doc {}", id),
            content: "content".into(),
            access,
            created_at: None,
            updated_at: None,
        };
        let state = AppState {
            documents: Slice::new(DocumentsState {
                all: vec![
                    doc(1, 1, Access::Public),
                    doc(2, 1, Access::Private),
                    doc(3, 2, Access::Role(5)),
                ],
                ..DocumentsState::default()
            }),
            ..AppState::default()
        };

        let visible: Vec<i64> = state.visible_documents().map(|d| d.id).collect();
        assert_eq!(visible, vec![1]);
    }
}
