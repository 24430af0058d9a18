use rusqlite::Connection;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::FetchError;
use crate::model::RawMarketItem;

/// Source of market prices for one game and currency.
pub trait PriceFeed: Send + Sync {
    fn fetch_prices(&self, app_id: u32, currency: &str) -> Result<Vec<RawMarketItem>, FetchError>;
}

/// Shapes the price endpoint is known to answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceFeedResponse {
    Items(Vec<RawMarketItem>),
    Envelope { items: Vec<RawMarketItem> },
}

impl PriceFeedResponse {
    pub fn into_items(self) -> Vec<RawMarketItem> {
        match self {
            PriceFeedResponse::Items(items) | PriceFeedResponse::Envelope { items } => items,
        }
    }
}

pub fn decode_response(reader: impl Read) -> Result<Vec<RawMarketItem>, FetchError> {
    let response: PriceFeedResponse = serde_json::from_reader(reader)?;
    Ok(response.into_items())
}

pub struct HttpPriceFeed {
    agent: ureq::Agent,
    url: String,
}

impl HttpPriceFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        HttpPriceFeed {
            agent,
            url: url.into(),
        }
    }
}

impl PriceFeed for HttpPriceFeed {
    fn fetch_prices(&self, app_id: u32, currency: &str) -> Result<Vec<RawMarketItem>, FetchError> {
        tracing::info!(url = %self.url, app_id, currency, "fetching market prices");

        let response = self
            .agent
            .get(&self.url)
            .query("app_id", &app_id.to_string())
            .query("currency", currency)
            .set("Accept", "application/json")
            .call()?;

        decode_response(response.into_reader())
    }
}

/// Prices read from a local SQLite snapshot instead of the network.
pub struct SnapshotFeed {
    db_path: PathBuf,
}

impl SnapshotFeed {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        SnapshotFeed {
            db_path: db_path.into(),
        }
    }
}

impl PriceFeed for SnapshotFeed {
    fn fetch_prices(&self, app_id: u32, currency: &str) -> Result<Vec<RawMarketItem>, FetchError> {
        tracing::info!(db = %self.db_path.display(), app_id, currency, "loading price snapshot");

        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, market_hash_name, suggested_price, quantity, updated_at
             FROM prices
             WHERE app_id = ?1 AND currency = ?2
             ORDER BY rowid",
        )?;

        let rows = stmt.query_map((app_id, currency), |row| {
            let quantity: Option<i64> = row.get(3)?;
            Ok(RawMarketItem {
                id: row.get(0)?,
                market_hash_name: row.get(1)?,
                suggested_price: row.get(2)?,
                quantity: quantity.and_then(|q| u32::try_from(q).ok()),
                updated_at: row.get(4)?,
            })
        })?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bare_array() {
        let body = r#"[
            {"market_hash_name":"AK-47 | Redline (Field-Tested)","suggested_price":31.2},
            {"market_hash_name":"AWP | Asiimov (Field-Tested)","suggested_price":null}
        ]"#;
        let items = decode_response(body.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].suggested_price, None);
    }

    #[test]
    fn decodes_envelope() {
        let body = r#"{"items":[{"market_hash_name":"USP-S | Orion (Minimal Wear)","suggested_price":48}]}"#;
        let items = decode_response(body.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].suggested_price, Some(48.0));
    }

    #[test]
    fn rejects_unknown_shape() {
        let err = decode_response(r#"{"trades":"nope"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn reads_snapshot_rows_for_app_and_currency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE prices (
                id TEXT,
                app_id INTEGER NOT NULL,
                currency TEXT NOT NULL,
                market_hash_name TEXT,
                suggested_price REAL,
                quantity INTEGER,
                updated_at INTEGER
            );
            INSERT INTO prices VALUES ('a', 730, 'USD', 'AK-47 | Redline (Field-Tested)', 31.2, 4, 1700000000);
            INSERT INTO prices VALUES (NULL, 730, 'USD', NULL, 40.0, NULL, NULL);
            INSERT INTO prices VALUES ('c', 730, 'USD', 'AWP | Asiimov (Field-Tested)', 'cheap', 1, NULL);
            INSERT INTO prices VALUES ('d', 730, 'EUR', 'AWP | Asiimov (Field-Tested)', 80.0, 1, NULL);
            INSERT INTO prices VALUES ('e', 440, 'USD', 'Unusual Hat', 80.0, 1, NULL);",
        )
        .unwrap();
        drop(conn);

        let items = SnapshotFeed::new(&path).fetch_prices(730, "USD").unwrap();
        // The text price cannot be read as a number, so that row is skipped.
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_deref(), Some("a"));
        assert_eq!(items[0].quantity, Some(4));
        assert_eq!(items[0].updated_at, Some(1_700_000_000));
        assert_eq!(items[1].market_hash_name, None);
    }

    #[test]
    fn missing_snapshot_table_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SnapshotFeed::new(dir.path().join("empty.db"))
            .fetch_prices(730, "USD")
            .unwrap_err();
        assert!(matches!(err, FetchError::Database(_)));
    }
}
