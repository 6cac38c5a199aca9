use std::io::{self, BufRead, Write};

use serde_json::Value;
use vault_client::VaultResponse;

use crate::service::{SecretData, VaultService};

/// Parse `key1=value1,key2=value2` into a secret map.
///
/// Pairs without `=` or with an empty key are skipped.
pub fn parse_key_value_string(kv: &str) -> SecretData {
    kv.split(',')
        .filter_map(split_pair)
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect()
}

/// Read `key=value` lines from `input` until an empty line or EOF
pub fn prompt_for_secrets<R, W>(mut input: R, output: &mut W) -> io::Result<SecretData>
where
    R: BufRead,
    W: Write,
{
    let mut secrets = SecretData::new();
    writeln!(output, "Enter secrets (key=value format, empty line to finish):")?;

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        match split_pair(line) {
            Some((key, value)) => {
                secrets.insert(key.to_string(), Value::String(value.to_string()));
                writeln!(output, "Added secret: {}", key)?;
            }
            None => writeln!(output, "Invalid format. Use key=value")?,
        }
    }

    Ok(secrets)
}

fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (key, value) = pair.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Print the secret map of a read response as `key: value` lines
pub fn write_formatted_secret_data<W: Write>(
    out: &mut W,
    response: Option<&VaultResponse>,
) -> io::Result<()> {
    let Some(response) = response else {
        return writeln!(out, "No response received from Vault");
    };

    let secret_data = match VaultService::extract_secret_data(response) {
        Some(data) if !data.is_empty() => data,
        _ => return writeln!(out, "No secret data found in response"),
    };

    writeln!(out, "\n=== Secret Data ===")?;
    for (key, value) in &secret_data {
        writeln!(out, "{}: {}", key, display_value(value))?;
    }
    writeln!(out, "==================\n")
}

/// Strings print bare, everything else as JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A usable secret path: not blank, no `..` or `//`, no leading or trailing `/`
pub fn is_valid_path(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    if path.contains("..") || path.contains("//") {
        return false;
    }
    !(path.starts_with('/') || path.ends_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_response(data: Value) -> VaultResponse {
        serde_json::from_value(json!({
            "request_id": "r-1",
            "data": {
                "data": data,
                "metadata": {"version": 1, "created_time": "2024-01-01T00:00:00Z"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_key_value_string() {
        let parsed = parse_key_value_string(" user = admin ,password=s3cr=et,broken,=nokey");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["user"], json!("admin"));
        // only the first '=' splits
        assert_eq!(parsed["password"], json!("s3cr=et"));
    }

    #[test]
    fn test_parse_key_value_string_empty() {
        assert!(parse_key_value_string("").is_empty());
        assert!(parse_key_value_string("   ").is_empty());
    }

    #[test]
    fn test_prompt_for_secrets_stops_at_empty_line() {
        let input = b"db_user=admin\nnot-a-pair\ndb_pass = hunter2\n\nignored=yes\n";
        let mut output = Vec::new();

        let secrets = prompt_for_secrets(&input[..], &mut output).unwrap();

        assert_eq!(secrets.len(), 2);
        assert_eq!(secrets["db_pass"], json!("hunter2"));
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Added secret: db_user"));
        assert!(output.contains("Invalid format. Use key=value"));
        assert!(!output.contains("ignored"));
    }

    #[test]
    fn test_prompt_for_secrets_stops_at_eof() {
        let mut output = Vec::new();
        let secrets = prompt_for_secrets(&b"k=v"[..], &mut output).unwrap();
        assert_eq!(secrets["k"], json!("v"));
    }

    #[test]
    fn test_formatted_secret_data() {
        let response = read_response(json!({"username": "admin", "port": 5432}));
        let mut out = Vec::new();
        write_formatted_secret_data(&mut out, Some(&response)).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("=== Secret Data ==="));
        assert!(out.contains("username: admin\n"));
        assert!(out.contains("port: 5432\n"));
    }

    #[test]
    fn test_formatted_secret_data_missing() {
        let mut out = Vec::new();
        write_formatted_secret_data(&mut out, None).unwrap();
        write_formatted_secret_data(&mut out, Some(&read_response(json!({})))).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("No response received from Vault"));
        assert!(out.contains("No secret data found in response"));
    }

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("my/secret/path"));
        assert!(is_valid_path("single"));
        assert!(!is_valid_path(""));
        assert!(!is_valid_path("   "));
        assert!(!is_valid_path("/leading"));
        assert!(!is_valid_path("trailing/"));
        assert!(!is_valid_path("a//b"));
        assert!(!is_valid_path("a/../b"));
    }
}
