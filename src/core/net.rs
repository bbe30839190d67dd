// src/core/net.rs
// Blocking HTTP GET; one request in flight at a time.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT_LANGUAGE;

use crate::config::consts::USER_AGENT;
use crate::error::{Error, Result};

/// Where page bodies come from. Production uses [`HttpSource`]; tests plug in
/// closures or canned pages.
pub trait PageSource {
    fn get(&self, url: &str) -> Result<String>;
}

impl<F> PageSource for F
where
    F: Fn(&str) -> Result<String>,
{
    fn get(&self, url: &str) -> Result<String> {
        self(url)
    }
}

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// `timeout` bounds each request end to end.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn get(&self, url: &str) -> Result<String> {
        // labels and separators differ per locale
        let resp = self.client.get(url).header(ACCEPT_LANGUAGE, "en-US,en;q=0.8").send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status { status: status.as_u16(), url: s!(url) });
        }
        Ok(resp.text()?)
    }
}
