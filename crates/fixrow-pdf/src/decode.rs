//! PDF string decoding.

const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Decode the bytes of a PDF string operand.
///
/// UTF-16BE when prefixed with its byte order mark, otherwise UTF-8 when
/// valid, otherwise Latin-1.
#[must_use = "returns the decoded text"]
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&UTF16BE_BOM) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
