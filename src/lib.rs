pub mod blame;

use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON error wrapper for the host-facing surface.
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
struct ErrorResult {
    error: String,
}

fn json_error(msg: &str) -> String {
    serde_json::to_string(&ErrorResult {
        error: msg.to_string(),
    })
    .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", msg))
}

// ---------------------------------------------------------------------------
// WASM-exported functions
// ---------------------------------------------------------------------------

/// Decode raw `svn blame --xml --use-merge-history` output into JSON.
///
/// Input: raw bytes of the svn client's captured standard output.
/// Returns: JSON array of BlameLine objects, one per blamed source line,
/// in file-line order. Lines whose merge history names a different author
/// carry that author; all others repeat the committer.
#[wasm_bindgen]
pub fn parse_merge_blame(raw: &[u8]) -> String {
    let lines = blame::parse_blame_output(raw);
    serde_json::to_string(&lines)
        .unwrap_or_else(|e| json_error(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_merge_blame_wasm() {
        let raw = b"<entry\n   line-number=\"1\">\n<commit\n   revision=\"38858\">\n<author>vpiyanov</author>\n<date>2012-05-03T10:15:22.989855Z</date>\n</commit>\n<merged\n   revision=\"38820\">\n<author>s.zamyslov</author>\n<date>2012-04-21T00:45:24.158572Z</date>\n</merged>\n</entry>\n";
        let result_json = parse_merge_blame(raw);
        let parsed: serde_json::Value = serde_json::from_str(&result_json).unwrap();
        assert!(parsed.is_array());
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["line_number"], 1);
        assert_eq!(parsed[0]["committer_revision"], "38858");
        assert_eq!(parsed[0]["committer"], "vpiyanov");
        assert_eq!(parsed[0]["author"], "s.zamyslov");
        assert!(!parsed[0]["committer_date"].is_null());
    }

    #[test]
    fn test_parse_merge_blame_empty_input() {
        let result_json = parse_merge_blame(b"");
        let parsed: serde_json::Value = serde_json::from_str(&result_json).unwrap();
        assert!(parsed.is_array());
        assert!(parsed.as_array().unwrap().is_empty());
    }
}
