//! Host capabilities the palette depends on.
//!
//! The palette never talks to the network directly. Listing documents and
//! firing remote actions go through [`Backend`] so the admin shell (or a test)
//! decides how requests are made.

mod augment;
mod http;

pub use augment::{HostAdmin, HostComponents, HostConfig, PROVIDER_PATH, with_command_menu};
pub use http::{HttpBackend, parse_documents};

use crate::Result;
use cmdmenu_types::{Document, HttpMethod};
use serde_json::Value;
use std::future::Future;

/// Listing request for the collection sub-search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub slug: String,
    /// Field whose value becomes the document label
    pub title_field: String,
    /// "contains" filter on `title_field`; `None` lists without filtering
    pub filter: Option<String>,
    pub limit: usize,
}

/// Remote call triggered by an invoke action
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeRequest {
    pub endpoint: String,
    pub method: HttpMethod,
    pub body: Option<serde_json::Map<String, Value>>,
}

pub trait Backend: Send + Sync + 'static {
    /// List documents of a collection, at most `request.limit` of them.
    fn list_documents(
        &self,
        request: ListRequest,
    ) -> impl Future<Output = Result<Vec<Document>>> + Send;

    /// Fire a remote call. The response body is ignored.
    fn invoke(&self, request: InvokeRequest) -> impl Future<Output = Result<()>> + Send;
}
