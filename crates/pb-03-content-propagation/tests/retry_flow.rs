//! Propagation of a block's worth of content across several endpoints.

use std::sync::Arc;
use std::time::Duration;

use pb_02_content_codec::{ContentKey, ContentType};
use pb_03_content_propagation::ports::outbound::MockEndpoint;
use pb_03_content_propagation::{
    ContentEndpoint, ContentItem, ContentPropagationApi, PropagationClient, PropagationConfig,
    PropagationError, PropagationRecord, RetryScheduler,
};
use shared_types::Hash;
use tokio::sync::watch;

fn block_items(hash: Hash) -> Vec<ContentItem> {
    [
        ContentType::BlockHeader,
        ContentType::BlockBody,
        ContentType::Receipts,
    ]
    .into_iter()
    .map(|content_type| ContentItem::new(ContentKey::new(content_type, hash), vec![0xc0]).for_block(7))
    .collect()
}

fn unavailable(id: &str) -> PropagationError {
    PropagationError::EndpointUnavailable {
        endpoint: id.to_string(),
        reason: "connection refused".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_block_content_reaches_threshold_through_any_endpoint() {
    // "slow" is still starting up; its first two offers are refused.
    let slow = Arc::new(
        MockEndpoint::reaching("slow", 1).with_script([Err(unavailable("slow")), Err(unavailable("slow"))]),
    );
    let broken = Arc::new(MockEndpoint::failing("broken"));
    // "good" under-delivers for the first item once, then reaches plenty.
    let good = Arc::new(MockEndpoint::reaching("good", 8).with_script([Ok(2)]));

    let endpoints: Vec<Arc<dyn ContentEndpoint>> = vec![slow.clone(), broken.clone(), good.clone()];
    let config = PropagationConfig::for_testing();
    let client = Arc::new(PropagationClient::new(endpoints, config.clone()).unwrap());
    let scheduler = RetryScheduler::new(client, &config);

    let records = block_items(Hash::repeat_byte(0x11))
        .into_iter()
        .map(PropagationRecord::new)
        .collect();
    let (_tx, rx) = watch::channel(false);
    let report = scheduler.run(records, rx).await;

    assert!(report.is_complete());
    assert!(!report.cancelled);
    assert_eq!(report.satisfied, 3);
    assert_eq!(report.rounds, 2);
    // Three first-round items plus one retry, each sent once to "broken".
    assert_eq!(broken.offer_count(), 4);
    // Two refused startup offers on top of one offer per push.
    assert_eq!(slow.offer_count(), 6);
    assert_eq!(good.offer_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_reports_unsatisfied_keys() {
    let quiet = Arc::new(MockEndpoint::reaching("quiet", 0));
    let endpoints: Vec<Arc<dyn ContentEndpoint>> = vec![quiet.clone()];
    let config = PropagationConfig::for_testing();
    let client = Arc::new(PropagationClient::new(endpoints, config.clone()).unwrap());
    let scheduler = RetryScheduler::new(client, &config);

    let items = block_items(Hash::repeat_byte(0x22));
    let keys: Vec<ContentKey> = items.iter().map(|item| item.key).collect();
    let (tx, rx) = watch::channel(false);
    let handle = scheduler.spawn(items.into_iter().map(PropagationRecord::new).collect(), rx);

    // Several intervals pass without any item being satisfied.
    tokio::time::sleep(config.retry_interval * 3 + Duration::from_millis(5)).await;
    tx.send(true).unwrap();
    let report = handle.await.unwrap();

    assert!(report.cancelled);
    assert_eq!(report.satisfied, 0);
    assert_eq!(report.unsatisfied, keys);
    assert_eq!(report.rounds, 4);
    assert_eq!(quiet.offer_count(), 12);
}

#[tokio::test]
async fn test_push_returns_one_entry_per_endpoint() {
    let endpoints: Vec<Arc<dyn ContentEndpoint>> = vec![
        Arc::new(MockEndpoint::reaching("x", 3)),
        Arc::new(MockEndpoint::failing("y")),
    ];
    let client = PropagationClient::new(endpoints, PropagationConfig::for_testing()).unwrap();

    let item = ContentItem::new(ContentKey::new(ContentType::BlockHeader, Hash::zero()), vec![1, 2, 3]);
    let result = client.push(&item).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.get("x"), Some(3));
    assert_eq!(result.get("y"), Some(0));
    assert_eq!(result.to_string(), "{x: 3, y: 0}");
}

#[test]
fn test_client_requires_endpoints() {
    let result = PropagationClient::new(Vec::new(), PropagationConfig::default());
    assert!(matches!(result, Err(PropagationError::NoEndpoints)));
}
