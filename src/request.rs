use reqwest::Method;

/// One logical API call handed to [`TossPaymentsClient::execute`].
///
/// [`TossPaymentsClient::execute`]: crate::TossPaymentsClient::execute
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    /// API path, starting with `/v1/`.
    pub path: String,
    /// HTTP method.
    pub method: Method,
    /// JSON request body.
    pub body: Option<serde_json::Value>,
    /// Sent as the `Idempotency-Key` header.
    pub idempotency_key: Option<String>,
    /// Overrides [`ClientOptions::timeout_ms`] for this call.
    ///
    /// [`ClientOptions::timeout_ms`]: crate::ClientOptions::timeout_ms
    pub timeout_ms: Option<u64>,
    /// Additional request headers.
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            idempotency_key: None,
            timeout_ms: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Adds a header. `Authorization` cannot be overridden.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use crate::RequestDescriptor;

    #[test]
    fn constructors_set_method_and_path() {
        let get = RequestDescriptor::get("/v1/payments/abc");
        let post = RequestDescriptor::post("/v1/payments/confirm");
        assert_eq!(get.method, Method::GET);
        assert_eq!(post.method, Method::POST);
        assert_eq!(post.path, "/v1/payments/confirm");
        assert!(get.body.is_none());
        assert!(get.idempotency_key.is_none());
    }

    #[test]
    fn builder_accumulates_fields() {
        let descriptor = RequestDescriptor::post("/v1/payments/confirm")
            .with_body(json!({"amount": 1000}))
            .with_idempotency_key("confirm-a-b-1000")
            .with_timeout_ms(2_500)
            .with_header("X-Trace", "1");

        assert_eq!(descriptor.body, Some(json!({"amount": 1000})));
        assert_eq!(descriptor.idempotency_key.as_deref(), Some("confirm-a-b-1000"));
        assert_eq!(descriptor.timeout_ms, Some(2_500));
        assert_eq!(descriptor.headers, vec![("X-Trace".to_owned(), "1".to_owned())]);
    }
}
