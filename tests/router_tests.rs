//! Integration tests for LlmRouter dispatch, failover, and lifecycle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use relayllm::{
    BackendError, LlmRouter, RouterBuilder, RouterError, RouterState, RoutingStrategy,
    TextGenerator,
};

/// Scripted backend: fixed reply or fixed error, optional delay, call counter.
struct MockGenerator {
    reply: Result<String, BackendError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockGenerator {
    fn healthy(reply: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reply: Ok(reply.to_string()),
                delay: None,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    fn failing(message: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reply: Err(BackendError::Api(message.to_string())),
                delay: None,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    fn slow(reply: &str, delay: Duration) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reply: Ok(reply.to_string()),
                delay: Some(delay),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

// ============================================================================
// Dispatch Tests
// ============================================================================

#[tokio::test]
async fn test_invoke_returns_backend_reply() {
    let (backend, calls) = MockGenerator::healthy("hello");
    let router = LlmRouter::builder()
        .add_backend("solo", 1, backend)
        .build()
        .unwrap();

    let reply = router.invoke("hi").await.unwrap();
    assert_eq!(reply, "hello");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_round_robin_alternates_across_invocations() {
    let (first, _) = MockGenerator::healthy("from-first");
    let (second, _) = MockGenerator::healthy("from-second");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::RoundRobin)
        .add_backend("first", 1, first)
        .add_backend("second", 1, second)
        .build()
        .unwrap();

    let mut replies = Vec::new();
    for _ in 0..4 {
        replies.push(router.invoke("hi").await.unwrap());
    }
    assert_eq!(
        replies,
        vec!["from-first", "from-second", "from-first", "from-second"]
    );
}

#[tokio::test]
async fn test_success_path_makes_exactly_one_backend_call() {
    let (primary, primary_calls) = MockGenerator::healthy("ok");
    let (standby, standby_calls) = MockGenerator::healthy("standby");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Failover)
        .add_backend("primary", 1, primary)
        .add_backend("standby", 1, standby)
        .build()
        .unwrap();

    router.invoke("hi").await.unwrap();
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(standby_calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Failover Tests
// ============================================================================

#[tokio::test]
async fn test_failover_uses_next_backend_in_configured_order() {
    let (primary, primary_calls) = MockGenerator::failing("primary down");
    let (second, second_calls) = MockGenerator::healthy("from-second");
    let (third, third_calls) = MockGenerator::healthy("from-third");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Failover)
        .add_backend("primary", 1, primary)
        .add_backend("second", 1, second)
        .add_backend("third", 1, third)
        .build()
        .unwrap();

    let reply = router.invoke("hi").await.unwrap();
    assert_eq!(reply, "from-second");
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    assert_eq!(third_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_backend_not_retried_within_invocation() {
    let (primary, primary_calls) = MockGenerator::failing("down");
    let (standby, _) = MockGenerator::healthy("ok");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Failover)
        .add_backend("primary", 1, primary)
        .add_backend("standby", 1, standby)
        .build()
        .unwrap();

    router.invoke("hi").await.unwrap();
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failover_skips_failed_backend_by_identity_not_name() {
    // Two backends share a display name; the failed one must be skipped by
    // id so its twin still gets tried.
    let (broken, broken_calls) = MockGenerator::failing("down");
    let (twin, twin_calls) = MockGenerator::healthy("from-twin");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Failover)
        .add_backend("mirror", 1, broken)
        .add_backend("mirror", 1, twin)
        .build()
        .unwrap();

    let reply = router.invoke("hi").await.unwrap();
    assert_eq!(reply, "from-twin");
    assert_eq!(broken_calls.load(Ordering::SeqCst), 1);
    assert_eq!(twin_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failover_walk_continues_past_failures() {
    let (a, _) = MockGenerator::failing("a down");
    let (b, _) = MockGenerator::failing("b down");
    let (c, c_calls) = MockGenerator::healthy("from-c");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Failover)
        .add_backend("a", 1, a)
        .add_backend("b", 1, b)
        .add_backend("c", 1, c)
        .build()
        .unwrap();

    let reply = router.invoke("hi").await.unwrap();
    assert_eq!(reply, "from-c");
    assert_eq!(c_calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Exhaustion Tests
// ============================================================================

#[tokio::test]
async fn test_exhaustion_lists_all_attempts_in_order() {
    let (a, _) = MockGenerator::failing("a down");
    let (b, _) = MockGenerator::failing("b down");
    let (c, _) = MockGenerator::failing("c down");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Failover)
        .add_backend("a", 1, a)
        .add_backend("b", 1, b)
        .add_backend("c", 1, c)
        .build()
        .unwrap();

    let err = router.invoke("hi").await.unwrap_err();
    let attempts = err.attempts().expect("expected failover exhaustion");

    assert_eq!(attempts.len(), 3);
    let ids: Vec<usize> = attempts.iter().map(|a| a.backend_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(attempts[0].error, BackendError::Api("a down".to_string()));
    assert_eq!(attempts[1].error, BackendError::Api("b down".to_string()));
    assert_eq!(attempts[2].error, BackendError::Api("c down".to_string()));
}

#[tokio::test]
async fn test_exhaustion_attempt_order_with_mid_list_primary() {
    // With round-robin, the second invocation selects backend 1 as primary;
    // the walk then visits the others in configured order.
    let (a, _) = MockGenerator::failing("a down");
    let (b, _) = MockGenerator::failing("b down");
    let (c, _) = MockGenerator::failing("c down");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::RoundRobin)
        .add_backend("a", 1, a)
        .add_backend("b", 1, b)
        .add_backend("c", 1, c)
        .build()
        .unwrap();

    let _ = router.invoke("hi").await.unwrap_err();
    let err = router.invoke("hi").await.unwrap_err();

    let ids: Vec<usize> = err
        .attempts()
        .expect("expected failover exhaustion")
        .iter()
        .map(|a| a.backend_id)
        .collect();
    assert_eq!(ids, vec![1, 0, 2]);
}

// ============================================================================
// Async and Batch Entry Point Tests
// ============================================================================

#[tokio::test]
async fn test_invoke_async_resolves_to_reply() {
    let (backend, _) = MockGenerator::healthy("async-ok");
    let router = LlmRouter::builder()
        .add_backend("solo", 1, backend)
        .build()
        .unwrap();

    let handle = router.invoke_async("hi");
    assert_eq!(handle.join().await.unwrap(), "async-ok");
}

#[tokio::test]
async fn test_invoke_async_fails_over_like_invoke() {
    let (primary, _) = MockGenerator::failing("down");
    let (standby, _) = MockGenerator::healthy("standby-ok");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Failover)
        .add_backend("primary", 1, primary)
        .add_backend("standby", 1, standby)
        .build()
        .unwrap();

    let handle = router.invoke_async("hi");
    assert_eq!(handle.join().await.unwrap(), "standby-ok");
}

#[tokio::test]
async fn test_invoke_concurrently_returns_results_in_prompt_order() {
    let (first, first_calls) = MockGenerator::healthy("from-first");
    let (second, second_calls) = MockGenerator::healthy("from-second");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::RoundRobin)
        .add_backend("first", 1, first)
        .add_backend("second", 1, second)
        .build()
        .unwrap();

    let prompts: Vec<String> = (0..4).map(|i| format!("prompt-{}", i)).collect();
    let results = router.invoke_concurrently(prompts).await;

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(first_calls.load(Ordering::SeqCst), 2);
    assert_eq!(second_calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_round_robin_distributes_evenly() {
    // 12 concurrent calls over 3 backends: every cursor value is observed by
    // exactly one caller, so each backend serves exactly 4 calls.
    let (a, a_calls) = MockGenerator::healthy("a");
    let (b, b_calls) = MockGenerator::healthy("b");
    let (c, c_calls) = MockGenerator::healthy("c");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::RoundRobin)
        .add_backend("a", 1, a)
        .add_backend("b", 1, b)
        .add_backend("c", 1, c)
        .build()
        .unwrap();

    let handles: Vec<_> = (0..12).map(|i| router.invoke_async(format!("p{}", i))).collect();
    for handle in handles {
        handle.join().await.unwrap();
    }

    assert_eq!(a_calls.load(Ordering::SeqCst), 4);
    assert_eq!(b_calls.load(Ordering::SeqCst), 4);
    assert_eq!(c_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_saturated_pool_queues_rather_than_drops() {
    // Pool capacity 1 with 5 concurrent invocations: submissions queue on
    // the pool and every call still completes.
    let (backend, calls) = MockGenerator::slow("ok", Duration::from_millis(10));
    let router = LlmRouter::builder()
        .add_backend("solo", 1, backend)
        .pool_factor(1)
        .build()
        .unwrap();

    let handles: Vec<_> = (0..5).map(|i| router.invoke_async(format!("p{}", i))).collect();
    for handle in handles {
        assert_eq!(handle.join().await.unwrap(), "ok");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

// ============================================================================
// Attempt Deadline Tests
// ============================================================================

#[tokio::test]
async fn test_attempt_timeout_triggers_failover() {
    let (stuck, stuck_calls) = MockGenerator::slow("too-late", Duration::from_millis(200));
    let (fast, _) = MockGenerator::healthy("fast-ok");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Failover)
        .add_backend("stuck", 1, stuck)
        .add_backend("fast", 1, fast)
        .attempt_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let reply = router.invoke("hi").await.unwrap();
    assert_eq!(reply, "fast-ok");
    assert_eq!(stuck_calls.load(Ordering::SeqCst), 1);

    let stats = router.backend_stats();
    assert_eq!(stats[0].error_count, 1);
}

// ============================================================================
// Shutdown Tests
// ============================================================================

#[tokio::test]
async fn test_invoke_after_shutdown_fails_fast() {
    let (backend, calls) = MockGenerator::healthy("ok");
    let router = LlmRouter::builder()
        .add_backend("solo", 1, backend)
        .build()
        .unwrap();

    router.shutdown();
    let err = router.invoke("hi").await.unwrap_err();
    assert!(matches!(err, RouterError::Shutdown));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invoke_async_after_shutdown_fails_fast() {
    let (backend, _) = MockGenerator::healthy("ok");
    let router = LlmRouter::builder()
        .add_backend("solo", 1, backend)
        .build()
        .unwrap();

    router.shutdown();
    let handle = router.invoke_async("hi");
    assert!(matches!(handle.join().await, Err(RouterError::Shutdown)));
}

#[tokio::test]
async fn test_shutdown_twice_is_safe() {
    let (backend, _) = MockGenerator::healthy("ok");
    let router = LlmRouter::builder()
        .add_backend("solo", 1, backend)
        .build()
        .unwrap();

    router.shutdown();
    router.shutdown();
    assert_eq!(router.state(), RouterState::Terminated);
}

#[tokio::test]
async fn test_state_machine_transitions() {
    let (backend, _) = MockGenerator::slow("ok", Duration::from_millis(100));
    let router = LlmRouter::builder()
        .add_backend("solo", 1, backend)
        .build()
        .unwrap();

    assert_eq!(router.state(), RouterState::Running);

    let handle = router.invoke_async("hi");
    tokio::time::sleep(Duration::from_millis(20)).await;
    router.shutdown();
    assert_eq!(router.state(), RouterState::ShuttingDown);

    // The in-flight invocation completes despite the shutdown.
    assert_eq!(handle.join().await.unwrap(), "ok");
    assert_eq!(router.state(), RouterState::Terminated);
}

// ============================================================================
// Construction Tests
// ============================================================================

#[tokio::test]
async fn test_empty_backend_list_rejected() {
    let result = RouterBuilder::new().build();
    assert!(matches!(result, Err(RouterError::Config(_))));
}

#[tokio::test]
async fn test_zero_weight_rejected() {
    let (backend, _) = MockGenerator::healthy("ok");
    let result = LlmRouter::builder()
        .add_backend("weightless", 0, backend)
        .build();

    assert!(result.is_err());
    let err = result.err().unwrap().to_string();
    assert!(err.contains("weightless"));
}

#[tokio::test]
async fn test_builder_reports_backend_count_and_strategy() {
    let (a, _) = MockGenerator::healthy("a");
    let (b, _) = MockGenerator::healthy("b");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Weighted)
        .add_backend("a", 3, a)
        .add_backend("b", 2, b)
        .build()
        .unwrap();

    assert_eq!(router.backend_count(), 2);
    assert_eq!(router.strategy(), RoutingStrategy::Weighted);
}

// ============================================================================
// Statistics Tests
// ============================================================================

#[tokio::test]
async fn test_backend_stats_track_attempts_and_errors() {
    let (primary, _) = MockGenerator::failing("down");
    let (standby, _) = MockGenerator::healthy("ok");
    let router = LlmRouter::builder()
        .strategy(RoutingStrategy::Failover)
        .add_backend("primary", 1, primary)
        .add_backend("standby", 1, standby)
        .build()
        .unwrap();

    router.invoke("hi").await.unwrap();
    router.invoke("hi").await.unwrap();

    let stats = router.backend_stats();
    assert_eq!(stats[0].backend_name, "primary");
    assert_eq!(stats[0].request_count, 2);
    assert_eq!(stats[0].error_count, 2);
    assert_eq!(stats[0].error_rate, 100.0);
    assert_eq!(stats[1].request_count, 2);
    assert_eq!(stats[1].error_count, 0);
    assert_eq!(stats[1].error_rate, 0.0);
}

#[tokio::test]
async fn test_backend_stats_zero_before_any_invocation() {
    let (backend, _) = MockGenerator::healthy("ok");
    let router = LlmRouter::builder()
        .add_backend("solo", 1, backend)
        .build()
        .unwrap();

    let stats = router.backend_stats();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].request_count, 0);
    assert_eq!(stats[0].error_rate, 0.0);
}
