use serde::de::IgnoredAny;

use crate::action::Action;
use crate::flows::{Context, Page};
use crate::model::{Access, Document, DocumentChanges, DocumentDraft, IdRef};
use crate::navigate::Route;
use crate::notify::{Notice, Report};

/// Shortest accepted document body, in characters
pub const MIN_CONTENT_LENGTH: usize = 6;

const CONTENT_TOO_SHORT: &str = "Document content must be greater than 6";

/// Reports and returns `false` when `content` is too short to save
fn validate_content(ctx: &Context, content: &str) -> bool {
    if content.trim().chars().count() < MIN_CONTENT_LENGTH {
        ctx.notify(Notice::Error(Report::Message(CONTENT_TOO_SHORT.into())));
        return false;
    }
    true
}

/// `GET /documents/?limit=&offset=`
///
/// Also splits the page into the public and role-restricted lists.
pub async fn get_documents(ctx: Context, offset: u32) {
    let path = format!("/documents/?limit={}&offset={}", ctx.limits.documents, offset);
    let outcome = ctx.get(path).await;
    let Some(page) = ctx.settle::<Page<Document>>(outcome) else {
        return;
    };

    let public = page
        .data
        .iter()
        .filter(|doc| doc.access == Access::Public)
        .cloned()
        .collect();
    let role = page
        .data
        .iter()
        .filter(|doc| matches!(doc.access, Access::Role(_)))
        .cloned()
        .collect();

    ctx.dispatch(Action::DocumentsLoad(page.data));
    ctx.dispatch(Action::PublicDocumentsLoad(public));
    ctx.dispatch(Action::RoleDocumentsLoad(role));
    ctx.dispatch(Action::DocumentsPaginationSet(page.pagination));
}

/// `GET /documents/{id}`
pub async fn get_document(ctx: Context, id: IdRef) {
    let outcome = ctx.get(format!("/documents/{}", id)).await;
    if let Some(document) = ctx.settle::<Document>(outcome) {
        ctx.dispatch(Action::CurrentDocumentSet(document));
    }
}

/// `GET /users/{id}/documents`
pub async fn get_user_documents(ctx: Context, user_id: i64) {
    let outcome = ctx.get(format!("/users/{}/documents", user_id)).await;
    if let Some(documents) = ctx.settle::<Vec<Document>>(outcome) {
        ctx.dispatch(Action::UserDocumentsLoad(documents));
    }
}

/// `POST /documents`
pub async fn create_document(ctx: Context, draft: DocumentDraft) {
    if !validate_content(&ctx, &draft.content) {
        return;
    }

    let outcome = ctx.post("/documents", &draft).await;
    if let Some(document) = ctx.settle::<Document>(outcome) {
        ctx.dispatch(Action::DocumentsAdd(document));
        ctx.notify(Notice::Success("Document created".into()));
        ctx.navigate(Route::Dashboard);
    }
}

/// `PUT /documents/{id}` with the fields that changed
pub async fn update_document(ctx: Context, id: IdRef, changes: DocumentChanges) {
    if let Some(content) = &changes.content {
        if !validate_content(&ctx, content) {
            return;
        }
    }

    let outcome = ctx.put(format!("/documents/{}", id), &changes).await;
    if let Some(document) = ctx.settle::<Document>(outcome) {
        ctx.dispatch(Action::DocumentsUpdate(document));
        ctx.notify(Notice::Success("Document updated".into()));
    }
}

/// `DELETE /documents/{id}`
pub async fn delete_document(ctx: Context, id: IdRef) {
    let outcome = ctx.delete(format!("/documents/{}", id)).await;
    if ctx.settle::<IgnoredAny>(outcome).is_some() {
        ctx.dispatch(Action::DocumentsDelete { id });
        ctx.notify(Notice::Success("Document deleted".into()));
    }
}
