use std::time::Duration;

use serde::Deserialize;

/// City-name autocomplete backed by an external place-search service.
///
/// The upstream call carries its own timeout and degrades to an empty
/// suggestion list on any failure; autocomplete must never fail a request.
#[derive(Clone)]
pub struct CitySuggestions {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    name: Option<String>,
}

impl CitySuggestions {
    pub fn new(base_url: String, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub async fn suggest(&self, query: &str) -> Vec<String> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.fetch(query).await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(error = %err, query, "City suggestion lookup failed");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, query: &str) -> reqwest::Result<Vec<String>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", query), ("osm_tag", "place:city"), ("limit", "8")])
            .send()
            .await?
            .error_for_status()?
            .json::<SuggestionResponse>()
            .await?;

        Ok(names_from(response))
    }
}

fn names_from(response: SuggestionResponse) -> Vec<String> {
    let mut names: Vec<String> = response
        .features
        .into_iter()
        .filter_map(|f| f.properties.name)
        .collect();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_queries_short_circuit_to_empty() {
        let suggestions = CitySuggestions::new(
            "http://127.0.0.1:1".to_string(),
            Duration::from_millis(10),
        )
        .unwrap();

        assert!(suggestions.suggest("   ").await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_upstream_degrades_to_empty() {
        let suggestions = CitySuggestions::new(
            "http://127.0.0.1:1".to_string(),
            Duration::from_millis(50),
        )
        .unwrap();

        assert!(suggestions.suggest("pune").await.is_empty());
    }

    #[test]
    fn feature_names_are_extracted_in_order() {
        let body = r#"{
            "features": [
                {"properties": {"name": "Pune"}},
                {"properties": {"name": "Pune"}},
                {"properties": {"name": null}},
                {"properties": {"name": "Punalur"}}
            ]
        }"#;

        let response: SuggestionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(names_from(response), vec!["Pune", "Punalur"]);
    }
}
