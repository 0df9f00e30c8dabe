//! Gerrit Client
//!
//! Client context shared by every resource service: server URL, optional
//! credentials and the HTTP transport.

use super::auth::Credentials;
use super::http::GerritHttpClient;
use super::projects::ProjectsService;
use anyhow::{Context, Result};
use reqwest::{Method, Request};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Main Gerrit client
#[derive(Clone, Debug)]
pub struct GerritClient {
    base_url: Url,
    credentials: Option<Credentials>,
    pub http: GerritHttpClient,
}

impl GerritClient {
    /// Create a new client for the server at `base_url`
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self> {
        let http = GerritHttpClient::new(false, None)?;
        Self::with_http(base_url, credentials, http)
    }

    /// Create a client that sends requests through an existing transport
    pub fn with_http(
        base_url: &str,
        credentials: Option<Credentials>,
        http: GerritHttpClient,
    ) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid Gerrit URL: {}", base_url))?;

        if base_url.cannot_be_a_base() {
            return Err(anyhow::anyhow!("Gerrit URL cannot be a base: {}", base_url));
        }

        // Relative paths must resolve below the configured path, not beside it
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        base_url.set_query(None);
        base_url.set_fragment(None);

        if let Some(credentials) = &credentials {
            tracing::info!("Authenticating as {}", credentials.username());
        }

        Ok(Self {
            base_url,
            credentials,
            http,
        })
    }

    /// Build a client with the default transport settings overridden
    pub fn builder(base_url: &str) -> GerritClientBuilder {
        GerritClientBuilder {
            base_url: base_url.to_string(),
            credentials: None,
            accept_invalid_certs: false,
            timeout: None,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Projects REST resource
    pub fn projects(&self) -> ProjectsService<'_> {
        ProjectsService::new(self)
    }

    /// Absolute URL for an API path such as `projects/demo`
    ///
    /// Authenticated requests go through Gerrit's `/a/` prefix.
    pub fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        let relative = if self.credentials.is_some() {
            format!("a/{}", path)
        } else {
            path.to_string()
        };

        self.base_url
            .join(&relative)
            .with_context(|| format!("Invalid request path: {}", path))
    }

    /// Build a request for `path`, with an optional JSON body
    pub fn new_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Request> {
        let url = self.url(path)?;

        let mut builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(credentials) = &self.credentials {
            builder = credentials.apply(builder);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder.build().context("Failed to build request")
    }

    /// Send a request and decode the JSON response into `T`
    pub async fn execute<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let body = self.http.execute(request).await?;
        serde_json::from_str(&body).context("Failed to parse response JSON")
    }

    /// Send a request and return the raw response body
    pub async fn execute_text(&self, request: Request) -> Result<String> {
        self.http.execute(request).await
    }

    /// Send a request whose response carries no content
    pub async fn execute_empty(&self, request: Request) -> Result<()> {
        self.http.execute(request).await.map(|_| ())
    }

    /// GET `path` and decode the response
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.new_request::<()>(Method::GET, path, None)?;
        self.execute(request).await
    }

    /// Send `body` with `method` to `path` and decode the response
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.new_request(method, path, Some(body))?;
        self.execute(request).await
    }

    /// DELETE `path`
    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.new_request::<()>(Method::DELETE, path, None)?;
        self.execute_empty(request).await
    }
}

/// Builder for a [`GerritClient`] with custom transport settings
#[derive(Debug)]
pub struct GerritClientBuilder {
    base_url: String,
    credentials: Option<Credentials>,
    accept_invalid_certs: bool,
    timeout: Option<Duration>,
}

impl GerritClientBuilder {
    pub fn credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<GerritClient> {
        let http = GerritHttpClient::new(self.accept_invalid_certs, self.timeout)?;
        GerritClient::with_http(&self.base_url, self.credentials, http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_appends_trailing_slash_to_base() {
        let client = GerritClient::new("https://review.example.com/gerrit", None).unwrap();
        assert_eq!(client.base_url().as_str(), "https://review.example.com/gerrit/");
        assert_eq!(
            client.url("projects/demo").unwrap().as_str(),
            "https://review.example.com/gerrit/projects/demo"
        );
    }

    #[test]
    fn test_url_uses_auth_prefix_with_credentials() {
        let creds = Credentials::new("jdoe", "secret");
        let client = GerritClient::new("https://review.example.com/", creds).unwrap();
        assert!(client.is_authenticated());
        assert_eq!(
            client.url("projects/").unwrap().as_str(),
            "https://review.example.com/a/projects/"
        );
    }

    #[test]
    fn test_url_keeps_encoded_slashes() {
        let client = GerritClient::new("https://review.example.com", None).unwrap();
        assert_eq!(
            client.url("projects/foo/branches/refs%2Fheads%2Fmain").unwrap().path(),
            "/projects/foo/branches/refs%2Fheads%2Fmain"
        );
    }

    #[test]
    fn test_url_keeps_query_string() {
        let client = GerritClient::new("https://review.example.com", None).unwrap();
        let url = client.url("projects/?n=5&p=test").unwrap();
        assert_eq!(url.path(), "/projects/");
        assert_eq!(url.query(), Some("n=5&p=test"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(GerritClient::new("not a url", None).is_err());
        assert!(GerritClient::new("mailto:someone@example.com", None).is_err());
    }

    #[test]
    fn test_new_request_attaches_json_body() {
        let client = GerritClient::new("https://review.example.com", None).unwrap();
        let body = serde_json::json!({"ref": "refs/heads/main"});
        let request = client
            .new_request(Method::PUT, "projects/demo/HEAD", Some(&body))
            .unwrap();
        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );
        let sent = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(sent, br#"{"ref":"refs/heads/main"}"#);
    }

    #[test]
    fn test_new_request_without_body() {
        let client = GerritClient::new("https://review.example.com", None).unwrap();
        let request = client
            .new_request::<()>(Method::GET, "projects/demo", None)
            .unwrap();
        assert!(request.body().is_none());
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_new_request_sets_basic_auth() {
        let client =
            GerritClient::new("https://review.example.com", Credentials::new("jdoe", "secret"))
                .unwrap();
        let request = client
            .new_request::<()>(Method::GET, "projects/demo", None)
            .unwrap();
        let auth = request.headers()[reqwest::header::AUTHORIZATION].to_str().unwrap();
        assert!(auth.starts_with("Basic "));
    }
}
