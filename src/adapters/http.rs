use crate::config::toml_config::StoreConfig;
use crate::domain::model::{FormPart, Item, ItemForm, ItemId};
use crate::domain::ports::ItemApi;
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const ID_PLACEHOLDER: &str = "{id}";

// id 只會出現在單一路徑段內
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Path templates for the four item endpoints. `{id}` is replaced with the
/// percent-encoded item id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub list: String,
    pub create: String,
    pub update: String,
    pub delete: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            list: "/api/get".to_string(),
            create: "/api/add-item".to_string(),
            update: "/api/items/{id}".to_string(),
            delete: "/api/{id}".to_string(),
        }
    }
}

pub fn render_path(template: &str, id: &ItemId) -> String {
    let encoded = utf8_percent_encode(id.as_str(), PATH_SEGMENT).to_string();
    template.replace(ID_PLACEHOLDER, &encoded)
}

/// 從錯誤回應中取出 `{"error": "..."}`
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// `{ items: [...] }` → items. Missing `items` yields an empty list and entries
/// without an identifier are skipped.
pub fn decode_listing(body: Value) -> Vec<Item> {
    let entries = match body {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                tracing::warn!("Expected an items array, got {}", other);
                return Vec::new();
            }
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Item>(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping malformed item in listing: {}", e);
                None
            }
        })
        .collect()
}

pub fn decode_item(body: Value) -> Option<Item> {
    if body.is_null() {
        return None;
    }
    match serde_json::from_value::<Item>(body) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::warn!("Response is not an item: {}", e);
            None
        }
    }
}

/// `{ updatedItem: {...} }` → item
pub fn decode_updated(body: Value) -> Option<Item> {
    match body {
        Value::Object(mut map) => map.remove("updatedItem").and_then(decode_item),
        _ => None,
    }
}

fn build_multipart(form: ItemForm) -> Result<Form> {
    let mut multipart = Form::new();
    for part in form.into_parts() {
        multipart = match part {
            FormPart::Text { name, value } => multipart.text(name, value),
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let mut file_part = Part::bytes(bytes).file_name(file_name);
                if let Some(content_type) = content_type {
                    file_part = file_part.mime_str(&content_type)?;
                }
                multipart.part(name, file_part)
            }
        };
    }
    Ok(multipart)
}

/// reqwest-backed [`ItemApi`].
#[derive(Debug, Clone)]
pub struct HttpItemApi {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
    headers: HashMap<String, String>,
}

impl HttpItemApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        validate_url("base_url", &base_url)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints: Endpoints::default(),
            headers: HashMap::new(),
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let mut api = Self::with_timeout(config.base_url(), config.timeout())?
            .with_endpoints(config.endpoints());
        for (key, value) in config.headers() {
            api = api.with_header(key, value);
        }
        Ok(api)
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("📡 {} {}", method, url);

        let mut request = self.client.request(method, url);

        // 添加自定義標頭
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        request
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("📡 API response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::BackendError {
            status: status.as_u16(),
            message: extract_error_message(&body),
        })
    }

    /// 空白或無法解析的內容視為 null
    async fn read_body(response: Response) -> Result<Value> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("Response body is not JSON: {}", e);
            Value::Null
        }))
    }
}

#[async_trait]
impl ItemApi for HttpItemApi {
    async fn list_items(&self) -> Result<Vec<Item>> {
        let response = self.request(Method::GET, &self.endpoints.list).send().await?;
        let response = Self::check_status(response).await?;
        Ok(decode_listing(Self::read_body(response).await?))
    }

    async fn create_item(&self, form: ItemForm) -> Result<Option<Item>> {
        let multipart = build_multipart(form)?;
        let response = self
            .request(Method::POST, &self.endpoints.create)
            .multipart(multipart)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(decode_item(Self::read_body(response).await?))
    }

    async fn update_item(&self, id: &ItemId, form: ItemForm) -> Result<Option<Item>> {
        let multipart = build_multipart(form)?;
        let path = render_path(&self.endpoints.update, id);
        let response = self
            .request(Method::PUT, &path)
            .multipart(multipart)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(decode_updated(Self::read_body(response).await?))
    }

    async fn delete_item(&self, id: &ItemId) -> Result<()> {
        let path = render_path(&self.endpoints.delete, id);
        let response = self.request(Method::DELETE, &path).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
