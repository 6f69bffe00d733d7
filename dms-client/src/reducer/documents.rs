use dms_store::Slice;

use crate::action::Action;
use crate::model::{Access, Document};
use crate::reducer::{prepend, replace_by_id};
use crate::state::DocumentsState;

/// Reducer for the `documents` slice
pub fn documents(state: Slice<DocumentsState>, action: &Action) -> Slice<DocumentsState> {
    match action {
        Action::DocumentsLoad(docs) => Slice::new(DocumentsState {
            all: docs.clone(),
            ..state.to_inner()
        }),
        Action::PublicDocumentsLoad(docs) => Slice::new(DocumentsState {
            public: docs.clone(),
            ..state.to_inner()
        }),
        Action::RoleDocumentsLoad(docs) => Slice::new(DocumentsState {
            role: docs.clone(),
            ..state.to_inner()
        }),
        Action::SearchDocumentsLoad(docs) => Slice::new(DocumentsState {
            search: docs.clone(),
            ..state.to_inner()
        }),
        Action::CurrentDocumentSet(doc) => Slice::new(DocumentsState {
            current: Some(doc.clone()),
            ..state.to_inner()
        }),
        Action::DocumentsPaginationSet(pagination) => Slice::new(DocumentsState {
            pagination: pagination.clone(),
            ..state.to_inner()
        }),
        Action::DocumentsAdd(doc) => {
            let mut next = state.to_inner();
            next.all = prepend(doc, &state.all);
            match doc.access {
                Access::Public => next.public = prepend(doc, &state.public),
                Access::Role(_) => next.role = prepend(doc, &state.role),
                Access::Private => {}
            }
            Slice::new(next)
        }
        Action::DocumentsUpdate(doc) => {
            let id = |d: &Document| d.id;
            Slice::new(DocumentsState {
                all: replace_by_id(&state.all, doc, id),
                public: replace_by_id(&state.public, doc, id),
                role: replace_by_id(&state.role, doc, id),
                search: replace_by_id(&state.search, doc, id),
                current: match &state.current {
                    Some(current) if current.id == doc.id => Some(doc.clone()),
                    other => other.clone(),
                },
                pagination: state.pagination.clone(),
            })
        }
        Action::DocumentsDelete { id } => {
            let keep = |list: &[Document]| -> Vec<Document> {
                list.iter().filter(|d| !id.matches(d.id)).cloned().collect()
            };
            Slice::new(DocumentsState {
                all: keep(&state.all),
                public: keep(&state.public),
                role: keep(&state.role),
                search: keep(&state.search),
                current: state.current.clone().filter(|d| !id.matches(d.id)),
                pagination: state.pagination.clone(),
            })
        }
        _ => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pagination;

    fn doc(id: i64, access: Access) -> Document {
        Document {
            id,
            user_id: 1,
            title: format!("doc {}", id),
            content: "<p>content</p>".into(),
            access,
            created_at: None,
            updated_at: None,
        }
    }

    fn loaded() -> Slice<DocumentsState> {
        Slice::new(DocumentsState {
            all: vec![doc(1, Access::Public), doc(2, Access::Role(3)), doc(3, Access::Private)],
            public: vec![doc(1, Access::Public)],
            role: vec![doc(2, Access::Role(3))],
            search: vec![doc(2, Access::Role(3))],
            current: Some(doc(2, Access::Role(3))),
            ..DocumentsState::default()
        })
    }

    #[test]
    fn test_unhandled_action_returns_same_snapshot() {
        let state = loaded();
        assert!(documents(state.clone(), &Action::RolesLoad(vec![])).same(&state));
    }

    #[test]
    fn test_load_actions_fill_their_lists() {
        let state = Slice::new(DocumentsState::default());

        let state = documents(state, &Action::DocumentsLoad(vec![doc(1, Access::Public)]));
        let state = documents(state, &Action::PublicDocumentsLoad(vec![doc(1, Access::Public)]));
        let state = documents(state, &Action::RoleDocumentsLoad(vec![]));

        assert_eq!(state.all.len(), 1);
        assert_eq!(state.public.len(), 1);
        assert!(state.role.is_empty());
    }

    #[test]
    fn test_pagination_is_kept_across_edits() {
        let window = Pagination {
            limit: 9,
            offset: 18,
            total_count: 30,
        };
        let state = documents(loaded(), &Action::DocumentsPaginationSet(window.clone()));
        let state = documents(state, &Action::delete_document("1"));
        let state = documents(state, &Action::DocumentsUpdate(doc(2, Access::Role(3))));

        assert_eq!(state.pagination, window);
    }

    #[test]
    fn test_add_prepends_to_matching_lists() {
        let next = documents(loaded(), &Action::DocumentsAdd(doc(9, Access::Public)));

        assert_eq!(next.all[0].id, 9);
        assert_eq!(next.public[0].id, 9);
        assert_eq!(next.role.len(), 1);
    }

    #[test]
    fn test_update_replaces_everywhere() {
        let mut updated = doc(2, Access::Role(3));
        updated.title = "renamed".into();

        let next = documents(loaded(), &Action::DocumentsUpdate(updated.clone()));

        assert_eq!(next.all[1], updated);
        assert_eq!(next.role[0], updated);
        assert_eq!(next.search[0], updated);
        assert_eq!(next.current, Some(updated));
        assert_eq!(next.public, vec![doc(1, Access::Public)]);
    }

    #[test]
    fn test_delete_removes_everywhere_and_clears_current() {
        let next = documents(loaded(), &Action::delete_document("2"));

        assert_eq!(next.all.len(), 2);
        assert!(next.role.is_empty());
        assert!(next.search.is_empty());
        assert!(next.current.is_none());
    }

    #[test]
    fn test_delete_other_document_keeps_current() {
        let next = documents(loaded(), &Action::delete_document(1));

        assert!(next.public.is_empty());
        assert_eq!(next.current.as_ref().map(|d| d.id), Some(2));
    }
}
