//! Request-scoped context passed to every provider and resource call
//!
//! A Context identifies one framework call. Resources use it to open a
//! tracing span so that every log line emitted while serving the call can be
//! correlated.

use std::sync::Arc;
use uuid::Uuid;

/// Context carries the identity of a single framework call.
/// Pass it as the first parameter to every async trait method.
#[derive(Clone, Debug)]
pub struct Context {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    request_id: Uuid,
    terraform_version: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ContextInner {
                request_id: Uuid::new_v4(),
                terraform_version: None,
            }),
        }
    }

    /// Returns a new context for the same request tagged with the Terraform CLI version
    pub fn with_terraform_version(&self, version: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                request_id: self.inner.request_id,
                terraform_version: Some(version.into()),
            }),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.inner.request_id
    }

    pub fn terraform_version(&self) -> Option<&str> {
        self.inner.terraform_version.as_deref()
    }

    /// Opens a span for an operation on a resource type.
    pub fn span(&self, operation: &'static str, type_name: &str) -> tracing::Span {
        tracing::info_span!(
            "tf_request",
            request_id = %self.inner.request_id,
            operation,
            type_name
        )
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
