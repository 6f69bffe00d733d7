#![allow(dead_code)]

use serde_json::{json, Value};

pub fn user_json(id: i64, token: Option<&str>) -> Value {
    let mut user = json!({
        "id": id,
        "name": format!("User {}", id),
        "email": format!("user{}@example.com", id),
        "roleId": 2,
    });
    if let Some(token) = token {
        user["token"] = json!(token);
    }
    user
}

pub fn document_json(id: i64, user_id: i64, access: i64) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "title": format!("Document {}", id),
        "content": "<p>Quarterly minutes</p>",
        "access": access,
        "createdAt": "2017-04-01T09:30:00Z",
        "updatedAt": "2017-04-02T09:30:00Z",
    })
}

pub fn role_json(id: i64, title: &str) -> Value {
    json!({ "id": id, "title": title })
}

pub fn page_json(data: Vec<Value>, limit: u32, offset: u32, total: u32) -> Value {
    json!({
        "data": data,
        "pagination": { "limit": limit, "offset": offset, "totalCount": total },
    })
}
