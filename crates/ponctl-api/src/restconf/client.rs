// RESTCONF HTTP client
//
// Wraps `reqwest::Client` with MSAN-specific URL construction, the
// session-cookie header, and envelope unwrapping for table reads. Table
// and entry node names come from the wire types themselves (`MibEntry`).

use reqwest::header::COOKIE;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::restconf::models::MibEntry;
use crate::transport::TransportConfig;

/// RESTCONF path to the MSAN MIB root.
const MIB_PATH: &str = "restconf/data/ISKRATEL-MSAN-MIB:ISKRATEL-MSAN-MIB";

/// Outer/inner envelope keys the device wraps table reads in.
const ENVELOPE_OUTER: &str = "ISKRATEL-MSAN-MIB:";
const ENVELOPE_INNER: &str = "ISKRATEL-MSAN-MIB";

/// Raw HTTP client for the device's RESTCONF interface.
///
/// Reads return whole tables; writes address a single entry by key.
/// Authentication is a static session cookie applied to every request.
pub struct RestconfClient {
    http: reqwest::Client,
    base_url: Url,
    cookie: SecretString,
}

impl RestconfClient {
    /// Create a client for `host` (HTTPS on the management port).
    pub fn new(host: &str, cookie: SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("https://{host}/"))?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            cookie,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` and explicit
    /// base URL (tests point this at a mock server).
    pub fn with_client(http: reqwest::Client, base_url: Url, cookie: SecretString) -> Self {
        Self {
            http,
            base_url,
            cookie,
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/restconf/data/…-MIB/{table}`
    fn table_url(&self, table: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{MIB_PATH}/{table}"))?)
    }

    /// `{base}/restconf/data/…-MIB/{table}/{entry}={key}`
    ///
    /// Interface-path keys have `/` percent-encoded as `%2F`; composite
    /// keys (`0/5/3,PROFILE`) keep their `,` separator literal.
    fn entry_url(&self, table: &str, entry: &str, key: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let key = encode_entry_key(key);
        Ok(Url::parse(&format!("{base}/{MIB_PATH}/{table}/{entry}={key}"))?)
    }

    // ── Table reads ──────────────────────────────────────────────────

    /// GET the entire table for `E` and return its entry rows.
    ///
    /// A missing table node is an empty table; anything else that fails
    /// to deserialize surfaces as an error with the body attached.
    pub async fn get_table<E: MibEntry>(&self) -> Result<Vec<E>, Error> {
        let url = self.table_url(E::TABLE)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header(COOKIE, self.cookie.expose_secret())
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;

        // Full MIB nesting ({outer: {inner: {table: …}}}) or a direct
        // subtree reply — both occur in the wild.
        let root = value
            .get(ENVELOPE_OUTER)
            .and_then(|v| v.get(ENVELOPE_INNER))
            .unwrap_or(&value);
        let Some(entries) = root.get(E::TABLE).and_then(|t| t.get(E::ENTRY)) else {
            return Ok(Vec::new());
        };

        serde_json::from_value(entries.clone()).map_err(|e| Error::Deserialization {
            message: format!("{} table: {e}", E::TABLE),
            body,
        })
    }

    // ── Entry writes ─────────────────────────────────────────────────

    /// POST a new entry under its key.
    pub async fn post_entry<E: MibEntry + Serialize>(&self, key: &str, entry: &E) -> Result<(), Error> {
        let url = self.entry_url(E::TABLE, E::ENTRY, key)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header(COOKIE, self.cookie.expose_secret())
            .json(entry)
            .send()
            .await?;
        check_status(resp).await
    }

    /// PATCH an existing entry under its key.
    pub async fn patch_entry<E: MibEntry + Serialize>(
        &self,
        key: &str,
        entry: &E,
    ) -> Result<(), Error> {
        let url = self.entry_url(E::TABLE, E::ENTRY, key)?;
        debug!("PATCH {url}");

        let resp = self
            .http
            .patch(url)
            .header(COOKIE, self.cookie.expose_secret())
            .json(entry)
            .send()
            .await?;
        check_status(resp).await
    }

    /// DELETE an entry by key.
    pub async fn delete_entry<E: MibEntry>(&self, key: &str) -> Result<(), Error> {
        let url = self.entry_url(E::TABLE, E::ENTRY, key)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .header(COOKIE, self.cookie.expose_secret())
            .send()
            .await?;
        check_status(resp).await
    }
}

/// Percent-encode an entry key: `/` becomes `%2F`, everything else
/// (profile names, the `,` of composite keys) passes through.
pub fn encode_entry_key(key: &str) -> String {
    key.replace('/', "%2F")
}

/// Non-success status → `Error::Status` with a body preview. The device
/// signals rejection through the status line alone.
async fn check_status(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        message: preview(&body).to_owned(),
    })
}

fn preview(body: &str) -> &str {
    &body[..body.len().min(200)]
}

#[cfg(test)]
mod tests {
    use super::encode_entry_key;

    #[test]
    fn interface_keys_are_percent_encoded() {
        assert_eq!(encode_entry_key("0/5/3"), "0%2F5%2F3");
    }

    #[test]
    fn composite_keys_keep_the_comma() {
        assert_eq!(encode_entry_key("0/5/3,102_DATA_Acc"), "0%2F5%2F3,102_DATA_Acc");
    }

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(encode_entry_key("HSI_100"), "HSI_100");
    }
}
