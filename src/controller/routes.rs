use axum::routing::MethodRouter;

use crate::app::AppContext;

/// A group of handlers sharing a path prefix.
#[derive(Clone, Default)]
pub struct Routes {
    pub prefix: Option<String>,
    pub handlers: Vec<Handler>,
}

#[derive(Clone)]
pub struct Handler {
    pub uri: String,
    pub method: MethodRouter<AppContext>,
}

impl Routes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler to the group.
    ///
    /// # Example
    /// ```rust
    /// use axum::routing::get;
    /// use ontograph::controller::{format, Routes};
    ///
    /// async fn ping() -> ontograph::Result<axum::response::Response> {
    ///     format::empty_json()
    /// }
    /// Routes::new().add("/_ping", get(ping));
    /// ```
    #[must_use]
    pub fn add(mut self, uri: &str, method: MethodRouter<AppContext>) -> Self {
        self.handlers.push(Handler {
            uri: uri.to_owned(),
            method,
        });
        self
    }

    #[must_use]
    pub fn prefix(mut self, uri: &str) -> Self {
        self.prefix = Some(uri.to_owned());
        self
    }
}
