//! Per-request context shared between the authentication step and the
//! metrics middleware.

use std::sync::{Arc, OnceLock};

use http::Extensions;

/// Typed per-request state stored in the request extensions.
///
/// Clones share the same slot, so a value set by a handler or an inner
/// middleware is visible to the metrics middleware after the handler returns.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    client: Arc<OnceLock<String>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the context already attached to `extensions`, attaching a new
    /// one if there is none.
    pub fn attach(extensions: &mut Extensions) -> RequestContext {
        if let Some(ctx) = extensions.get::<RequestContext>() {
            return ctx.clone();
        }
        let ctx = RequestContext::new();
        extensions.insert(ctx.clone());
        ctx
    }

    pub fn from_extensions(extensions: &Extensions) -> Option<&RequestContext> {
        extensions.get::<RequestContext>()
    }

    /// Stores the authenticated client identifier.
    ///
    /// The first value wins; returns `false` if a client was already set.
    pub fn set_client(&self, client: impl Into<String>) -> bool {
        self.client.set(client.into()).is_ok()
    }

    pub fn client(&self) -> Option<&str> {
        self.client.get().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_reuses_existing_context() {
        let mut extensions = Extensions::new();
        let first = RequestContext::attach(&mut extensions);
        first.set_client("billing");

        let second = RequestContext::attach(&mut extensions);
        assert_eq!(second.client(), Some("billing"));
    }

    #[test]
    fn test_clones_share_the_client_slot() {
        let ctx = RequestContext::new();
        let handle = ctx.clone();
        assert_eq!(handle.client(), None);

        assert!(ctx.set_client("billing"));
        assert_eq!(handle.client(), Some("billing"));
    }

    #[test]
    fn test_first_client_wins() {
        let ctx = RequestContext::new();
        assert!(ctx.set_client("billing"));
        assert!(!ctx.set_client("reports"));
        assert_eq!(ctx.client(), Some("billing"));
    }

    #[test]
    fn test_missing_context_in_extensions() {
        let extensions = Extensions::new();
        assert!(RequestContext::from_extensions(&extensions).is_none());
    }
}
