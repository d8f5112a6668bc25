use std::{fs, path::PathBuf, time::Duration};

use anyhow::Context;
use url::Url;

use crate::{page::RawPage, source::Source};

pub const DEFAULT_USER: &str = "jgle1SAAAAAJ";
pub const DEFAULT_PROXY: &str = "https://r.jina.ai/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
const USER_AGENT: &str = "Mozilla/5.0";

/// A Scholar profile's publication list, rendered as plain text by a reader proxy.
///
/// Scholar itself only serves HTML and is quick to answer scripted clients with an interstitial,
/// so the listing URL is appended verbatim to the proxy prefix and the proxy does the fetching.
pub struct ScholarProxy {
    user: String,
    proxy: String,
    timeout: Duration,
    save_raw: Option<PathBuf>,
}

impl ScholarProxy {
    pub fn new(user: impl Into<String>, proxy: impl Into<String>, timeout: Duration) -> Self {
        let mut proxy = proxy.into();
        if !proxy.ends_with('/') {
            proxy.push('/');
        }
        ScholarProxy {
            user: user.into(),
            proxy,
            timeout,
            save_raw: None,
        }
    }

    /// Also write the fetched bytes to `path` before they are decoded and split into lines.
    pub fn save_raw_to(mut self, path: Option<PathBuf>) -> Self {
        self.save_raw = path;
        self
    }

    pub fn request_url(&self) -> anyhow::Result<String> {
        Ok(format!("{}{}", self.proxy, listing_url(&self.user)?))
    }

    fn fetch_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let url = self.request_url()?;
        let cfg = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build();
        let agent = ureq::Agent::new_with_config(cfg);
        let bytes = agent
            .get(url.as_str())
            .header("User-Agent", USER_AGENT)
            .call()
            .with_context(|| format!("failed request for {url}"))?
            .into_body()
            .read_to_vec()
            .context("failed to read response body")?;
        Ok(bytes)
    }
}

impl Source for ScholarProxy {
    fn load(&self) -> anyhow::Result<RawPage> {
        let bytes = self.fetch_bytes()?;
        if let Some(path) = &self.save_raw {
            fs::write(path, &bytes)
                .with_context(|| format!("failed to save raw page to {}", path.display()))?;
        }
        Ok(RawPage::from_bytes(&bytes))
    }

    fn describe(&self) -> String {
        format!("Scholar profile {}", self.user)
    }
}

/// Public profile URL, as reported alongside the extracted items.
pub fn profile_url(user: &str) -> anyhow::Result<Url> {
    let url = Url::parse_with_params(
        "https://scholar.google.com/citations",
        &[("user", user), ("hl", "en")],
    )?;
    Ok(url)
}

/// The "list works" view of a profile, newest first.
fn listing_url(user: &str) -> anyhow::Result<Url> {
    let url = Url::parse_with_params(
        "http://scholar.google.com/citations",
        &[
            ("user", user),
            ("hl", "en"),
            ("view_op", "list_works"),
            ("sortby", "pubdate"),
        ],
    )?;
    Ok(url)
}
