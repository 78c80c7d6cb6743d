use crate::domain::model::{CardRef, Color, Legality};
use crate::domain::ports::CardLookup;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Fuzzy card lookup against a Scryfall-style `/cards/named` endpoint.
/// HTTP 404 is the not-found outcome, not an error.
pub struct ScryfallClient {
    client: Client,
    base_url: String,
}

impl ScryfallClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NamedCard {
    id: String,
    name: String,
    #[serde(default)]
    mana_cost: Option<String>,
    #[serde(default)]
    cmc: f64,
    #[serde(default)]
    colors: Vec<Color>,
    #[serde(default)]
    color_identity: Vec<Color>,
    #[serde(default)]
    type_line: String,
    #[serde(default)]
    legalities: HashMap<String, Legality>,
    #[serde(default)]
    prices: Prices,
}

#[derive(Debug, Default, Deserialize)]
struct Prices {
    usd: Option<String>,
}

impl From<NamedCard> for CardRef {
    fn from(card: NamedCard) -> Self {
        CardRef {
            id: card.id,
            name: card.name,
            mana_cost: card.mana_cost,
            cmc: card.cmc,
            colors: card.colors,
            color_identity: card.color_identity,
            type_line: card.type_line,
            legalities: card.legalities,
            price_usd: card.prices.usd.and_then(|p| p.parse().ok()),
        }
    }
}

#[async_trait]
impl CardLookup for ScryfallClient {
    async fn fuzzy(&self, name: &str) -> Result<Option<CardRef>> {
        let url = format!("{}/cards/named", self.base_url);
        tracing::debug!("fuzzy lookup for \"{}\"", name);

        let response = self
            .client
            .get(&url)
            .query(&[("fuzzy", name)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("\"{}\" not found", name);
            return Ok(None);
        }

        let card: NamedCard = response.error_for_status()?.json().await?;
        Ok(Some(card.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn card_body(name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "abc-123",
            "name": name,
            "mana_cost": "{R}",
            "cmc": 1.0,
            "colors": ["R"],
            "color_identity": ["R"],
            "type_line": "Instant",
            "legalities": {"standard": "not_legal", "modern": "legal", "legacy": "banned"},
            "prices": {"usd": "1.50"}
        })
    }

    #[tokio::test]
    async fn test_fuzzy_hit_maps_fields() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/cards/named")
                .query_param("fuzzy", "lightning bolt");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(card_body("Lightning Bolt"));
        });

        let client = ScryfallClient::new(server.base_url());
        let card = client.fuzzy("lightning bolt").await.unwrap().unwrap();

        mock.assert();
        assert_eq!(card.name, "Lightning Bolt");
        assert_eq!(card.colors, vec![Color::Red]);
        assert_eq!(card.legalities.get("legacy"), Some(&Legality::Banned));
        assert_eq!(card.price_usd, Some(1.5));
    }

    #[tokio::test]
    async fn test_not_found_is_ok_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/cards/named");
            then.status(404)
                .json_body(serde_json::json!({"object": "error", "code": "not_found"}));
        });

        let client = ScryfallClient::new(server.base_url());
        assert!(client.fuzzy("no such card").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/cards/named");
            then.status(500);
        });

        let client = ScryfallClient::new(server.base_url());
        assert!(client.fuzzy("lightning bolt").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_optional_fields_default() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/cards/named");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": "x", "name": "Sol Ring"}));
        });

        let client = ScryfallClient::new(server.base_url());
        let card = client.fuzzy("sol ring").await.unwrap().unwrap();
        assert!(card.colors.is_empty());
        assert!(card.price_usd.is_none());
        assert!(!card.is_banned_in("commander"));
    }
}
