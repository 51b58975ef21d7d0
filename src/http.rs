use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Method, Proxy,
};
use serde::Serialize;

use crate::{
    constants::APP_ORIGIN,
    error::{ApiError, ApiResult},
};

#[derive(Clone)]
pub struct RequestParams<'a, S: Serialize> {
    pub url: &'a str,
    pub method: Method,
    pub body: Option<S>,
    pub token: Option<&'a str>,
}

impl<'a> RequestParams<'a, ()> {
    pub fn get(url: &'a str, token: &'a str) -> Self {
        Self {
            url,
            method: Method::GET,
            body: None,
            token: Some(token),
        }
    }
}

impl<'a, S: Serialize> RequestParams<'a, S> {
    pub fn post(url: &'a str, body: S, token: Option<&'a str>) -> Self {
        Self {
            url,
            method: Method::POST,
            body: Some(body),
            token,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyKind {
    Http,
    Socks,
}

impl ProxyKind {
    /// Transport for a proxy URL, or `None` when the scheme is not supported.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("http://") {
            Some(Self::Http)
        } else if url.starts_with("socks4://") || url.starts_with("socks5://") {
            Some(Self::Socks)
        } else {
            None
        }
    }
}

fn client_builder(timeout: Duration) -> reqwest::ClientBuilder {
    Client::builder()
        .default_headers(get_headers())
        .timeout(timeout)
}

fn direct_client(timeout: Duration) -> Client {
    client_builder(timeout).no_proxy().build().unwrap_or_else(|err| {
        tracing::error!("Failed to build a client. Error: {err}");
        Client::new()
    })
}

/// Builds a client routed through `proxy`.
///
/// Unsupported schemes and proxies that fail to build fall back to a direct
/// connection instead of failing the account.
pub fn build_client(proxy: Option<&str>, timeout: Duration) -> Client {
    let Some(proxy) = proxy else {
        return direct_client(timeout);
    };

    if ProxyKind::from_url(proxy).is_none() {
        tracing::warn!("Unsupported proxy type: {proxy}");
        return direct_client(timeout);
    }

    Proxy::all(proxy)
        .and_then(|p| client_builder(timeout).proxy(p).build())
        .unwrap_or_else(|err| {
            tracing::error!("Failed to build a client with proxy: {proxy}. Error: {err}");
            direct_client(timeout)
        })
}

/// One client per proxy string, built on first use.
pub struct ClientPool {
    timeout: Duration,
    clients: Mutex<HashMap<Option<String>, Client>>,
}

impl ClientPool {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, proxy: Option<&str>) -> Client {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        clients
            .entry(proxy.map(str::to_string))
            .or_insert_with(|| build_client(proxy, self.timeout))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub async fn send_http_request(
    client: &Client,
    request_params: &RequestParams<'_, impl Serialize>,
) -> ApiResult<String> {
    let mut request = client.request(request_params.method.clone(), request_params.url);

    if let Some(body) = &request_params.body {
        request = request.json(&body);
    }

    if let Some(token) = request_params.token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(ApiError::from_transport)?;

    let status = response.status();
    let text = response.text().await.map_err(ApiError::from_transport)?;

    if !status.is_success() {
        return Err(ApiError::from_status(status, &text));
    }

    Ok(text)
}

pub fn get_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        HeaderName::from_static("accept"),
        HeaderValue::from_static("*/*"),
    );
    headers.insert(
        HeaderName::from_static("accept-language"),
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        HeaderName::from_static("origin"),
        HeaderValue::from_static(APP_ORIGIN),
    );
    headers.insert(
        HeaderName::from_static("referer"),
        HeaderValue::from_static("https://app.depined.org/"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(
            "\"Not/A)Brand\";v=\"99\", \"Google Chrome\";v=\"115\", \"Chromium\";v=\"115\"",
        ),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?0"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static("\"Windows\""),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("user-agent"),
        HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36"),
    );

    headers
}
