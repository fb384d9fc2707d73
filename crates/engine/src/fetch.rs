use std::time::Duration;

use anyhow::Context as _;
use image::DynamicImage;

/// Resolves an asset URL to a decoded image. The engine never inspects the
/// URL; it is an opaque identifier produced by the page atlas.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, url: &str) -> anyhow::Result<DynamicImage>;
}

#[derive(Debug)]
pub struct HttpAssetSource {
    client: reqwest::blocking::Client,
}

impl HttpAssetSource {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl AssetSource for HttpAssetSource {
    fn fetch(&self, url: &str) -> anyhow::Result<DynamicImage> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("fetch {url}"))?;
        let bytes = response
            .bytes()
            .with_context(|| format!("read body of {url}"))?;
        image::load_from_memory(&bytes).with_context(|| format!("decode {url}"))
    }
}
