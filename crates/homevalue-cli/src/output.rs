use homevalue_core::ApiResponse;
use serde_json::Value;

use crate::error::CliError;

pub fn render(response: &ApiResponse<Value>, pretty: bool) -> Result<(), CliError> {
    println!("{}", to_json(response, pretty)?);
    Ok(())
}

fn to_json(response: &ApiResponse<Value>, pretty: bool) -> Result<String, CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_output_is_single_line() {
        let response = ApiResponse::success(serde_json::json!({ "count": 2 }));

        let compact = to_json(&response, false).expect("json");
        let pretty = to_json(&response, true).expect("json");

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert!(compact.contains(r#""status":200"#));
    }
}
