use crate::action::Action;
use crate::flows::Context;
use crate::model::{Document, User};

fn search_path(resource: &str, query: &str) -> String {
    format!("/search/{}/?q={}", resource, urlencoding::encode(query.trim()))
}

/// `GET /search/users/?q=`
pub async fn search_users(ctx: Context, query: String) {
    let outcome = ctx.get(search_path("users", &query)).await;
    if let Some(users) = ctx.settle::<Vec<User>>(outcome) {
        ctx.dispatch(Action::SearchUsersLoad(users));
    }
}

/// `GET /search/documents/?q=`
pub async fn search_documents(ctx: Context, query: String) {
    let outcome = ctx.get(search_path("documents", &query)).await;
    if let Some(documents) = ctx.settle::<Vec<Document>>(outcome) {
        ctx.dispatch(Action::SearchDocumentsLoad(documents));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_encodes_query() {
        assert_eq!(search_path("users", " ada lovelace "), "/search/users/?q=ada%20lovelace");
        assert_eq!(search_path("documents", "a&b"), "/search/documents/?q=a%26b");
    }
}
