use base64::{Engine, engine::general_purpose::STANDARD};

/// Standard, padded base64 as expected by Gemini `inlineData.data`.
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

// Keeps upstream bodies readable in logs and error messages
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
