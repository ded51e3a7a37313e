// Transport module - Session identifier transport over cookies
pub mod cookie;

pub use cookie::{decode_value, encode_value, Cookie, CookieJar, ResponseCookies, ResponseSink};
