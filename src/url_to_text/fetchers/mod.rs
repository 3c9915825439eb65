mod request;

pub use request::RequestFetcher;

use crate::ImportError;

/// Source of raw page markup.
///
/// [`RequestFetcher`] is the network implementation. Tests and callers that
/// already hold the markup can supply their own.
pub trait HtmlFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, ImportError>;
}
