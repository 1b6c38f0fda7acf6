use axum::http::HeaderValue;
use headers::authorization::Credentials;

/// `Authorization: Token <key>`, the scheme the clinic backend issues.
#[derive(Debug, Clone)]
pub struct Token {
    raw: HeaderValue,
}

impl Token {
    /// Header value to forward upstream unchanged.
    pub fn header_value(&self) -> HeaderValue {
        self.raw.clone()
    }
}

impl Credentials for Token {
    const SCHEME: &'static str = "Token";

    fn decode(value: &HeaderValue) -> Option<Self> {
        let rest = value.to_str().ok()?.strip_prefix(Self::SCHEME)?;
        let key = rest.strip_prefix(' ')?.trim();
        if key.is_empty() {
            return None;
        }
        Some(Token { raw: value.clone() })
    }

    fn encode(&self) -> HeaderValue {
        self.raw.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headers::{Authorization, HeaderMapExt};

    fn decode(raw: &'static str) -> Option<Authorization<Token>> {
        let mut map = axum::http::HeaderMap::new();
        map.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_static(raw));
        map.typed_get::<Authorization<Token>>()
    }

    #[test]
    fn decodes_token_scheme() {
        let auth = decode("Token abc123").unwrap();
        assert_eq!(auth.0.header_value(), "Token abc123");
    }

    #[test]
    fn rejects_other_schemes_and_empty_keys() {
        assert!(decode("Bearer abc123").is_none());
        assert!(decode("Token ").is_none());
        assert!(decode("Token").is_none());
    }
}
