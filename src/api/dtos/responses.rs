use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// `{"success": true, ...data}` — the success envelope every read/update
/// endpoint returns.
pub fn success(data: Value) -> Json<Value> {
    Json(envelope(data))
}

/// Same envelope with a 201 status, for resource creation.
pub fn created(data: Value) -> impl IntoResponse {
    (StatusCode::CREATED, Json(envelope(data)))
}

fn envelope(data: Value) -> Value {
    let mut body = json!({ "success": true });
    if let (Some(obj), Some(data_obj)) = (body.as_object_mut(), data.as_object()) {
        for (key, value) in data_obj {
            obj.insert(key.clone(), value.clone());
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_merges_payload() {
        let body = envelope(json!({"id": "p1", "name": "Apollo"}));
        assert_eq!(body["success"], true);
        assert_eq!(body["id"], "p1");
        assert_eq!(body["name"], "Apollo");
    }
}
