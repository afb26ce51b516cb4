use std::time::Duration;

use anyhow::{Context, Result};

use foodsearch_core::controller::FoodsBackend;
use foodsearch_core::models::{FoodRecord, parse_collection};

/// `FoodsBackend` over HTTP against `{origin}/foods`.
pub struct HttpBackend {
    client: reqwest::Client,
    origin: String,
}

impl HttpBackend {
    pub fn new(origin: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(format!(
            "foodsearch/{} (foods API client)",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn collection_url(&self) -> String {
        format!("{}/foods", self.origin)
    }

    fn item_url(&self, key: &str) -> String {
        format!("{}/foods/{}", self.origin, percent_encode_component(key))
    }
}

impl FoodsBackend for HttpBackend {
    async fn fetch_all(&self) -> Result<Vec<FoodRecord>> {
        let resp = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .context("Failed to reach foods API")?;

        let body = resp
            .bytes()
            .await
            .context("Failed to read foods response")?;

        parse_collection(&body).context("Failed to parse foods response")
    }

    async fn create(&self, payload: &FoodRecord) -> Result<()> {
        self.client
            .post(self.collection_url())
            .json(payload)
            .send()
            .await
            .context("Failed to reach foods API")?
            .error_for_status()
            .context("Foods API rejected create")?;
        Ok(())
    }

    async fn update(&self, key: &str, payload: &FoodRecord) -> Result<()> {
        self.client
            .put(self.item_url(key))
            .json(payload)
            .send()
            .await
            .context("Failed to reach foods API")?
            .error_for_status()
            .with_context(|| format!("Foods API rejected update of '{key}'"))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete(self.item_url(key))
            .send()
            .await
            .context("Failed to reach foods API")?
            .error_for_status()
            .with_context(|| format!("Foods API rejected delete of '{key}'"))?;
        Ok(())
    }
}

/// Percent-encoding for a single path segment, with the same unreserved set as
/// `encodeURIComponent`: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
fn percent_encode_component(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push('%');
                encoded.push(char::from(HEX_CHARS[(byte >> 4) as usize]));
                encoded.push(char::from(HEX_CHARS[(byte & 0x0F) as usize]));
            }
        }
    }
    encoded
}

const HEX_CHARS: [u8; 16] = *b"0123456789ABCDEF";
