//! Origin extraction for politeness grouping: `scheme://host:port` with
//! default ports normalized away, so `http://example.com` and
//! `http://example.com:80` share one politeness bucket.

pub fn origin_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let scheme = parsed.scheme();
    let host = parsed.host_str()?.to_lowercase();
    let default_port = match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    };

    match parsed.port() {
        Some(port) if Some(port) != default_port => Some(format!("{scheme}://{host}:{port}")),
        _ => Some(format!("{scheme}://{host}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_are_normalized_away() {
        assert_eq!(
            origin_of("http://example.com:80/path"),
            origin_of("http://example.com/path")
        );
        assert_eq!(
            origin_of("https://example.com:443/path"),
            origin_of("https://example.com/path")
        );
    }

    #[test]
    fn non_default_port_is_preserved() {
        assert_eq!(
            origin_of("http://example.com:8080/path"),
            Some("http://example.com:8080".to_string())
        );
    }

    #[test]
    fn host_is_lowercased() {
        assert_eq!(
            origin_of("https://Example.COM/path"),
            Some("https://example.com".to_string())
        );
    }
}
