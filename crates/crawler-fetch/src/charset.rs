//! Decoding fallback chain: declared charset → utf-8 → latin-1 → cp1252 →
//! utf-8 with replacement. Grounded on the declared-charset-then-utf8-lossy
//! pattern seen in `webfetch::decode_body`, extended with the intermediate
//! single-byte fallbacks the spec calls for.

pub fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let param = param.trim();
        param
            .strip_prefix("charset=")
            .map(|v| v.trim_matches('"').to_string())
    })
}

fn try_declared(bytes: &[u8], label: &str) -> Option<String> {
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes())?;
    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        None
    } else {
        Some(decoded.into_owned())
    }
}

fn try_utf8_strict(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(|s| s.to_string())
}

/// ISO-8859-1: every byte is a valid Latin-1 code point, so this step never
/// actually fails — it is here because the decode order is part of the
/// contract, not because failure is possible.
fn try_latin1(bytes: &[u8]) -> Option<String> {
    Some(bytes.iter().map(|&b| b as char).collect())
}

fn try_cp1252(bytes: &[u8]) -> Option<String> {
    let (decoded, had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
    if had_errors {
        None
    } else {
        Some(decoded.into_owned())
    }
}

/// Decode `bytes` using the declared charset (if any) first, then the
/// fallback chain, returning the decoded text and the encoding label that
/// produced it.
pub fn decode(bytes: &[u8], declared_charset: Option<&str>) -> (String, String) {
    if let Some(label) = declared_charset {
        if let Some(decoded) = try_declared(bytes, label) {
            return (decoded, label.to_string());
        }
    }
    if let Some(decoded) = try_utf8_strict(bytes) {
        return (decoded, "utf-8".to_string());
    }
    if let Some(decoded) = try_latin1(bytes) {
        return (decoded, "latin-1".to_string());
    }
    if let Some(decoded) = try_cp1252(bytes) {
        return (decoded, "cp1252".to_string());
    }
    (String::from_utf8_lossy(bytes).into_owned(), "utf-8-lossy".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_charset_param() {
        assert_eq!(
            extract_charset("text/html; charset=ISO-8859-1"),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn plain_ascii_decodes_as_utf8_without_a_declared_charset() {
        let (decoded, encoding) = decode(b"hello world", None);
        assert_eq!(decoded, "hello world");
        assert_eq!(encoding, "utf-8");
    }

    #[test]
    fn declared_utf8_charset_is_honored() {
        let (decoded, encoding) = decode("héllo".as_bytes(), Some("utf-8"));
        assert_eq!(decoded, "héllo");
        assert_eq!(encoding, "utf-8");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // 0xe9 alone is invalid UTF-8 but a valid Latin-1 'é'.
        let bytes = [0xe9];
        let (decoded, encoding) = decode(&bytes, None);
        assert_eq!(decoded, "é");
        assert_eq!(encoding, "latin-1");
    }
}
