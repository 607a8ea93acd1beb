use base64::Engine;

/// `Authorization` header value for Cin7's HTTP Basic auth
pub fn encode_basic_auth(username: &str, password: &str) -> String {
    let engine = base64::engine::general_purpose::STANDARD;
    format!("Basic {}", engine.encode(format!("{}:{}", username, password)))
}
