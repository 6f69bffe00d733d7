//! Actions for the document management client
//!
//! Naming follows the store's category convention: the words before the
//! trailing verb name the category (`RolesAdd` -> "roles",
//! `CurrentUserSet` -> "current_user"). Documents and search actions pin
//! their category explicitly where the prefix alone would split them.
//!
//! Every variant is its own plain creator: `Action::RolesAdd(role)` is the
//! action value, nothing else has to be called to build it.

use dms_store::ActionSummary;

use crate::model::{Document, IdRef, Pagination, Role, User};

#[derive(dms_store::Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
pub enum Action {
    // ===== Busy indicator =====
    AjaxCallStart,
    AjaxCallEnd,

    // ===== Authentication =====
    /// The token has already been persisted by the time this is dispatched
    AuthAuthenticate { token: String },
    AuthDeauthenticate,

    // ===== Current user =====
    CurrentUserSet(User),
    CurrentUserLogout,

    // ===== User administration =====
    UsersLoad(Vec<User>),
    UsersDelete { id: IdRef },
    PaginationSet(Pagination),

    // ===== Roles =====
    RolesLoad(Vec<Role>),
    RolesAdd(Role),
    RolesDelete { id: IdRef },

    // ===== Search =====
    #[action(category = "search")]
    SearchUsersLoad(Vec<User>),
    #[action(category = "search")]
    SearchDocumentsLoad(Vec<Document>),

    // ===== Documents =====
    DocumentsLoad(Vec<Document>),
    #[action(category = "documents")]
    PublicDocumentsLoad(Vec<Document>),
    #[action(category = "documents")]
    RoleDocumentsLoad(Vec<Document>),
    #[action(category = "documents")]
    CurrentDocumentSet(Document),
    DocumentsAdd(Document),
    DocumentsUpdate(Document),
    DocumentsDelete { id: IdRef },
    /// Paging window of the document listing, kept apart from the users one
    #[action(category = "documents")]
    DocumentsPaginationSet(Pagination),
    UserDocumentsLoad(Vec<Document>),

    // ===== Error message =====
    ErrorMessageSet(String),
    ErrorMessageClear,
}

impl Action {
    pub fn delete_user(id: impl Into<IdRef>) -> Self {
        Action::UsersDelete { id: id.into() }
    }

    pub fn delete_role(id: impl Into<IdRef>) -> Self {
        Action::RolesDelete { id: id.into() }
    }

    pub fn delete_document(id: impl Into<IdRef>) -> Self {
        Action::DocumentsDelete { id: id.into() }
    }

    /// The server-side action type name, as used by the web client
    pub fn type_tag(&self) -> &'static str {
        match self {
            Action::AjaxCallStart => "AJAX_CALL_START",
            Action::AjaxCallEnd => "AJAX_CALL_END",
            Action::AuthAuthenticate { .. } => "AUTHENTICATE_USER",
            Action::AuthDeauthenticate => "DEAUTHENTICATE_USER",
            Action::CurrentUserSet(_) => "SET_CURRENT_USER",
            Action::CurrentUserLogout => "LOGOUT_CURRENT_USER",
            Action::UsersLoad(_) => "GET_ALL_USERS",
            Action::UsersDelete { .. } => "DELETE_EXISTING_USER",
            Action::PaginationSet(_) => "SET_PAGINATION",
            Action::RolesLoad(_) => "GET_ALL_ROLES",
            Action::RolesAdd(_) => "ADD_NEW_ROLE",
            Action::RolesDelete { .. } => "DELETE_EXISTING_ROLE",
            Action::SearchUsersLoad(_) => "SEARCH_FOR_USERS",
            Action::SearchDocumentsLoad(_) => "SEARCH_FOR_DOCUMENTS",
            Action::DocumentsLoad(_) => "GET_ALL_DOCUMENTS",
            Action::PublicDocumentsLoad(_) => "GET_PUBLIC_DOCUMENTS",
            Action::RoleDocumentsLoad(_) => "GET_ROLE_DOCUMENTS",
            Action::CurrentDocumentSet(_) => "SET_CURRENT_DOCUMENT",
            Action::DocumentsAdd(_) => "ADD_NEW_DOCUMENT",
            Action::DocumentsUpdate(_) => "UPDATE_EXISTING_DOCUMENT",
            Action::DocumentsDelete { .. } => "DELETE_EXISTING_DOCUMENT",
            Action::DocumentsPaginationSet(_) => "SET_DOCUMENTS_PAGINATION",
            Action::UserDocumentsLoad(_) => "GET_USER_DOCUMENTS",
            Action::ErrorMessageSet(_) => "SET_ERROR_MESSAGE",
            Action::ErrorMessageClear => "CLEAR_ERROR_MESSAGE",
        }
    }
}

/// Concise log lines: counts instead of whole lists, no tokens
impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            Action::AuthAuthenticate { .. } => "AuthAuthenticate { token: <redacted> }".into(),
            Action::CurrentUserSet(user) => format!("CurrentUserSet {{ id: {} }}", user.id),
            Action::UsersLoad(users) => format!("UsersLoad({} users)", users.len()),
            Action::RolesLoad(roles) => format!("RolesLoad({} roles)", roles.len()),
            Action::SearchUsersLoad(users) => format!("SearchUsersLoad({} users)", users.len()),
            Action::SearchDocumentsLoad(docs) => {
                format!("SearchDocumentsLoad({} documents)", docs.len())
            }
            Action::DocumentsLoad(docs) => format!("DocumentsLoad({} documents)", docs.len()),
            Action::PublicDocumentsLoad(docs) => {
                format!("PublicDocumentsLoad({} documents)", docs.len())
            }
            Action::RoleDocumentsLoad(docs) => {
                format!("RoleDocumentsLoad({} documents)", docs.len())
            }
            Action::UserDocumentsLoad(docs) => {
                format!("UserDocumentsLoad({} documents)", docs.len())
            }
            Action::CurrentDocumentSet(doc) => format!("CurrentDocumentSet {{ id: {} }}", doc.id),
            Action::DocumentsAdd(doc) => format!("DocumentsAdd {{ id: {} }}", doc.id),
            Action::DocumentsUpdate(doc) => format!("DocumentsUpdate {{ id: {} }}", doc.id),
            _ => format!("{:?}", self),
        }
    }
}
