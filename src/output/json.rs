use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ObraError;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &ObraError) -> Value {
    let mut body = json!({
        "code": err.code.as_str(),
        "message": err.message
    });
    if let Some(status) = err.status {
        body["status"] = json!(status);
    }
    json!({
        "success": false,
        "error": body
    })
}

/// Serialize a record for the `data` payload. Records are plain serde
/// structs, so failure here means a bug; it degrades to `null`.
pub fn value<T: Serialize + ?Sized>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

pub fn print(envelope: &Value) {
    match serde_json::to_string_pretty(envelope) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{envelope}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_carries_status() {
        let v = error(&ObraError::rejected(409, "Folio duplicado"));
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "REJECTED");
        assert_eq!(v["error"]["message"], "Folio duplicado");
        assert_eq!(v["error"]["status"], 409);

        let v = error(&ObraError::validation("Name is required"));
        assert!(v["error"].get("status").is_none());
    }
}
