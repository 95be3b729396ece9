use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&success_body(message, data))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a bare value (a token, an id) that scripts can capture
pub fn output_value(output_format: &OutputFormat, key: &str, value: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut body = Map::new();
            body.insert(key.to_string(), json!(value));
            println!("{}", serde_json::to_string_pretty(&success_body("ok", Some(Value::Object(body))))?);
        }
        OutputFormat::Text => {
            println!("{}", value);
        }
    }
    Ok(())
}

fn success_body(message: &str, data: Option<Value>) -> Value {
    let mut response = json!({
        "success": true,
        "message": message
    });

    if let (Some(Value::Object(fields)), Some(target)) = (data, response.as_object_mut()) {
        target.extend(fields);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_fields_are_merged_into_body() {
        let body = success_body("Granted", Some(json!({"user_id": 3})));
        assert_eq!(body["success"], true);
        assert_eq!(body["user_id"], 3);
    }

    #[test]
    fn non_object_data_is_ignored() {
        let body = success_body("Granted", Some(json!([1, 2])));
        assert_eq!(body.as_object().map(|o| o.len()), Some(2));
    }
}
