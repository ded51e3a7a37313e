use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::SystemTime;

/// Response cookie as emitted in a `Set-Cookie` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    /// Already cookie-safe (percent-encoded) value
    pub value: String,
    pub path: String,
    pub http_only: bool,
    /// Seconds; 0 omits the attribute (browser-session cookie), negative deletes
    pub max_age: i64,
    pub expires: Option<SystemTime>,
}

impl Cookie {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            path: "/".to_string(),
            http_only: false,
            max_age: 0,
            expires: None,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_expires(mut self, expires: SystemTime) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Whether this cookie tells the browser to discard it
    pub fn is_removal(&self) -> bool {
        self.max_age < 0
    }

    /// Render as a `Set-Cookie` header value
    pub fn to_header_value(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);

        if !self.path.is_empty() {
            header.push_str(&format!("; Path={}", self.path));
        }

        if let Some(expires) = self.expires {
            let expires: DateTime<Utc> = expires.into();
            header.push_str(&format!(
                "; Expires={}",
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            ));
        }

        if self.max_age > 0 {
            header.push_str(&format!("; Max-Age={}", self.max_age));
        } else if self.max_age < 0 {
            header.push_str("; Max-Age=0");
        }

        if self.http_only {
            header.push_str("; HttpOnly");
        }

        header
    }
}

/// Percent-encode a value for use in a cookie
pub fn encode_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Reverse of [`encode_value`]; `None` when the value is not valid UTF-8 after decoding
pub fn decode_value(value: &str) -> Option<String> {
    urlencoding::decode(value).ok().map(|v| v.into_owned())
}

/// Cookies received with a request
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` request header. The first occurrence of a name
    /// wins; pairs without `=` or with an empty name are skipped.
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::new();

        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"');
            jar.cookies
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }

        jar
    }

    /// Add or replace a cookie
    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    /// Raw (still encoded) value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Destination for response cookies
pub trait ResponseSink: Send {
    fn add_cookie(&mut self, cookie: Cookie);
}

impl ResponseSink for Vec<Cookie> {
    fn add_cookie(&mut self, cookie: Cookie) {
        self.push(cookie);
    }
}

/// Response cookies in emission order
#[derive(Debug, Clone, Default)]
pub struct ResponseCookies {
    cookies: Vec<Cookie>,
}

impl ResponseCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cookie emitted under `name`
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().rev().find(|c| c.name == name)
    }

    /// `Set-Cookie` header values in emission order
    pub fn header_values(&self) -> Vec<String> {
        self.cookies.iter().map(Cookie::to_header_value).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cookie> {
        self.cookies.iter()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl ResponseSink for ResponseCookies {
    fn add_cookie(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
    }
}
