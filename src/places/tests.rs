//! Places Module Tests
//!
//! Validates the empty-object fallback of the lookup client and the local
//! capping of oversized result arrays. No live places service is involved.

#[cfg(test)]
mod tests {
    use crate::places::{PlacesClient, truncate_results};
    use serde_json::json;

    #[tokio::test]
    async fn test_unconfigured_lookup_is_empty_object() {
        let places = PlacesClient::unconfigured();

        let payload = places.nearby(34.068931, -118.445127, 10.0, 5).await;
        assert_eq!(payload, json!({}));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_empty_object() {
        // reserved port, nothing listens there
        let places = PlacesClient::new(Some("http://127.0.0.1:1".to_string()));

        let payload = places.nearby(34.068931, -118.445127, 10.0, 5).await;
        assert_eq!(payload, json!({}));
    }

    #[test]
    fn test_truncate_results_caps_the_array() {
        let payload = json!({ "results": [1, 2, 3, 4], "status": "OK" });

        let capped = truncate_results(payload, 2);
        assert_eq!(capped, json!({ "results": [1, 2], "status": "OK" }));
    }

    #[test]
    fn test_truncate_results_leaves_other_shapes_alone() {
        let payload = json!({ "status": "OK" });

        assert_eq!(truncate_results(payload.clone(), 2), payload);
    }
}
