// Request pipeline module - per-request context carried through the relay

use std::collections::HashMap;
use uuid::Uuid;

/// Request context that holds all information about an HTTP request
/// as it flows through the relay pipeline
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    query_params: HashMap<String, String>,
}

impl RequestContext {
    /// Create a new RequestContext from HTTP request information
    /// Automatically generates a unique request ID (UUID v4)
    pub fn new(method: String, path: String) -> Self {
        Self::with_query_params(method, path, HashMap::new())
    }

    /// Create a new RequestContext with query parameters
    pub fn with_query_params(
        method: String,
        path: String,
        query_params: HashMap<String, String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            path,
            query_params,
        }
    }

    /// Get the unique request ID
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Get the HTTP method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the query parameters
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_context_new() {
        let ctx = RequestContext::new("GET".to_string(), "/image-proxy".to_string());
        assert_eq!(ctx.method(), "GET");
        assert_eq!(ctx.path(), "/image-proxy");
        assert!(ctx.query_params().is_empty());
    }

    #[test]
    fn test_request_context_with_query_params() {
        let mut params = HashMap::new();
        params.insert("url".to_string(), "https://example.com/a.jpg".to_string());
        let ctx =
            RequestContext::with_query_params("GET".to_string(), "/image-proxy".to_string(), params);
        assert_eq!(
            ctx.query_params().get("url").map(String::as_str),
            Some("https://example.com/a.jpg")
        );
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestContext::new("GET".to_string(), "/".to_string());
        let b = RequestContext::new("GET".to_string(), "/".to_string());
        assert_ne!(a.request_id(), b.request_id());
    }
}
