use super::{Backend, InvokeRequest, ListRequest};
use crate::{Error, Result};
use cmdmenu_types::{Document, HttpMethod};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// [`Backend`] talking to the host's REST API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute URL or the HTTP client
    /// cannot be built.
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base).map_err(|e| Error::Url(format!("{base}: {e}")))?;
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { client, base })
    }

    /// `<base>/api/<slug>?limit=..&where[..][contains]=..&select[..]=true`
    ///
    /// # Errors
    ///
    /// Returns an error if the slug does not form a valid path.
    pub fn list_url(&self, request: &ListRequest) -> Result<Url> {
        let mut url = self.join(&format!("/api/{}", request.slug))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &request.limit.to_string());
            if let Some(filter) = request.filter.as_deref().filter(|f| !f.is_empty()) {
                pairs.append_pair(&format!("where[{}][contains]", request.title_field), filter);
            }
            pairs.append_pair(&format!("select[{}]", request.title_field), "true");
        }
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::Url(format!("{path}: {e}")))
    }
}

impl Backend for HttpBackend {
    async fn list_documents(&self, request: ListRequest) -> Result<Vec<Document>> {
        let url = self.list_url(&request)?;
        debug!("Listing documents: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        Ok(parse_documents(&body, &request.title_field, request.limit))
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<()> {
        let url = self.join(&request.endpoint)?;
        debug!("Invoking {} {}", request.method, url);

        let mut builder = self
            .client
            .request(to_method(request.method), url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Parse a `{"docs": [...]}` listing, keeping at most `limit` documents.
/// Documents without an id are skipped; numeric ids and title values are
/// stringified.
#[must_use]
pub fn parse_documents(body: &Value, title_field: &str, limit: usize) -> Vec<Document> {
    let Some(docs) = body.get("docs").and_then(Value::as_array) else {
        return Vec::new();
    };

    docs.iter()
        .filter_map(|doc| {
            let id = scalar_to_string(doc.get("id")?)?;
            let title = doc.get(title_field).and_then(scalar_to_string);
            Some(Document { id, title })
        })
        .take(limit)
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
