//! Agent discovery: fetching and validating agent cards.

mod common;

use a2a_chat::builders::ClientBuilder;
use a2a_chat::client::{A2AClient, CardResolver};
use a2a_chat::error::A2AError;
use a2a_chat::utils::constants::AGENT_CARD_V3_WELL_KNOWN_PATH;
use common::{start_mock_agent, test_agent_card, unreachable_url, MockAgent};

#[tokio::test]
async fn test_check_agent_returns_card() {
    let (base_url, _handle) = start_mock_agent(MockAgent::default()).await;

    let card = A2AClient::new().check_agent(&base_url).await.unwrap();
    assert_eq!(card.name, "Test Echo Agent");
    assert_eq!(card.version, "0.1.0");
    assert!(card.supports_streaming());
    assert_eq!(card.skills.len(), 1);
    assert_eq!(card.skills[0].id, "echo");
}

#[tokio::test]
async fn test_check_agent_with_trailing_slash() {
    let (base_url, _handle) = start_mock_agent(MockAgent::default()).await;

    let card = A2AClient::new()
        .check_agent(&format!("{}/", base_url))
        .await
        .unwrap();
    assert_eq!(card.name, "Test Echo Agent");
}

#[tokio::test]
async fn test_missing_card_is_http_error() {
    let agent = MockAgent {
        card: None,
        ..Default::default()
    };
    let (base_url, _handle) = start_mock_agent(agent).await;

    let err = A2AClient::new().check_agent(&base_url).await.unwrap_err();
    match err {
        A2AError::Http {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
            assert_eq!(body, "no card here");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_card_without_version_is_invalid() {
    let agent = MockAgent {
        card: Some(r#"{"name": "Nameless"}"#.to_string()),
        ..Default::default()
    };
    let (base_url, _handle) = start_mock_agent(agent).await;

    let err = A2AClient::new().check_agent(&base_url).await.unwrap_err();
    assert!(matches!(err, A2AError::InvalidJson(_)), "got {err:?}");
}

#[tokio::test]
async fn test_non_json_card_is_invalid() {
    let agent = MockAgent {
        card: Some("<html>hello</html>".to_string()),
        ..Default::default()
    };
    let (base_url, _handle) = start_mock_agent(agent).await;

    let err = CardResolver::new().resolve(&base_url).await.unwrap_err();
    assert!(matches!(err, A2AError::InvalidJson(_)), "got {err:?}");
}

#[tokio::test]
async fn test_fallback_card_path() {
    let agent = MockAgent {
        card: None,
        card_v3: Some(test_agent_card().to_string()),
        ..Default::default()
    };
    let (base_url, _handle) = start_mock_agent(agent).await;

    // Default path only: the 404 surfaces.
    let err = A2AClient::new().check_agent(&base_url).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    let client = ClientBuilder::new()
        .with_card_fallback_path(AGENT_CARD_V3_WELL_KNOWN_PATH)
        .build();
    let card = client.check_agent(&base_url).await.unwrap();
    assert_eq!(card.name, "Test Echo Agent");
}

#[tokio::test]
async fn test_unreachable_agent_is_transport_error() {
    let err = A2AClient::new()
        .check_agent(&unreachable_url())
        .await
        .unwrap_err();
    assert!(matches!(err, A2AError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_connect_builds_and_checks() {
    let (base_url, _handle) = start_mock_agent(MockAgent::default()).await;

    let (client, card) = ClientBuilder::new()
        .with_client_id("discovery-test")
        .connect(&base_url)
        .await
        .unwrap();
    assert_eq!(card.version, "0.1.0");
    assert_eq!(client.config().client_id, "discovery-test");
}
