use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::SecretString;

/// The `name:pass` pair carried by a Basic `Authorization` header.
///
/// Lives for one request. `pass` is wrapped so it cannot leak through
/// `Debug` or logs.
#[derive(Debug)]
pub struct Credentials {
    pub name: String,
    pub pass: SecretString,
}

impl Credentials {
    /// Decode `Authorization: Basic base64(name:pass)`. Returns `None` when
    /// the header is absent or cannot be decoded into a pair.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        Self::parse(value)
    }

    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, encoded) = header.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim_start()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;

        // The user-id may not contain a colon; the password may.
        let (name, pass) = decoded.split_once(':')?;

        Some(Self {
            name: name.to_string(),
            pass: SecretString::from(pass.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use secrecy::ExposeSecret;

    fn encode(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn decodes_name_and_password() {
        let creds = Credentials::parse(&encode("a@x.com:s3cret")).unwrap();
        assert_eq!(creds.name, "a@x.com");
        assert_eq!(creds.pass.expose_secret(), "s3cret");
    }

    #[test]
    fn password_keeps_later_colons() {
        let creds = Credentials::parse(&encode("a@x.com:pa:ss:word")).unwrap();
        assert_eq!(creds.pass.expose_secret(), "pa:ss:word");
    }

    #[test]
    fn allows_empty_password() {
        let creds = Credentials::parse(&encode("a@x.com:")).unwrap();
        assert_eq!(creds.pass.expose_secret(), "");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let header = format!("bAsIc {}", STANDARD.encode("a@x.com:pw"));
        assert!(Credentials::parse(&header).is_some());
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(Credentials::parse("").is_none());
        assert!(Credentials::parse("Basic").is_none());
        assert!(Credentials::parse(&format!("Bearer {}", STANDARD.encode("a:b"))).is_none());
        assert!(Credentials::parse("Basic !!!not-base64!!!").is_none());
        assert!(Credentials::parse(&encode("no-separator")).is_none());
        assert!(Credentials::parse(&format!("Basic {}", STANDARD.encode([0xff, 0x3a, 0xfe]))).is_none());
    }

    #[test]
    fn reads_from_header_map() {
        let mut headers = HeaderMap::new();
        assert!(Credentials::from_headers(&headers).is_none());

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&encode("a@x.com:pw")).unwrap(),
        );
        assert_eq!(Credentials::from_headers(&headers).unwrap().name, "a@x.com");
    }

    #[test]
    fn debug_hides_password() {
        let creds = Credentials::parse(&encode("a@x.com:hunter2")).unwrap();
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
