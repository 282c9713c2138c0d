//! Batch runner tests
//!
//! Drives the sequential runner against a mocked upstream generator and
//! checks ordering, error isolation, and the emitted event sequence.

use std::sync::Arc;
use std::time::Duration;

use gateway::core::{generate_item, BatchRunner};
use gateway::traits::MockTextGenerator;
use gateway::types::Completion;
use shared::{GenerationRequest, ProgressEvent, TokenUsage, UpstreamFailure};

fn completion(text: &str) -> Completion {
    Completion {
        text: text.to_string(),
        usage: TokenUsage {
            input_tokens: 3,
            output_tokens: 9,
        },
        model: "claude-3-opus-20240229".to_string(),
    }
}

fn requests(prompts: &[&str]) -> Vec<GenerationRequest> {
    prompts.iter().map(|p| GenerationRequest::new(*p)).collect()
}

/// Generator that echoes the user message back as code.
fn echo_generator() -> MockTextGenerator {
    let mut mock = MockTextGenerator::new();
    mock.expect_complete()
        .returning(|_, _, message| Ok(completion(&format!("// {message}"))));
    mock
}

#[tokio::test]
async fn test_results_arrive_in_submission_order() {
    let runner = Arc::new(echo_generator());
    let runner = BatchRunner::new(runner, Duration::ZERO);
    let batch = requests(&["a button", "a slider", "a card"]);

    let outcome = runner.run("key", "system", &batch).await;

    assert_eq!(outcome.total_requests, 3);
    assert_eq!(outcome.results.len(), 3);
    for (i, item) in outcome.results.iter().enumerate() {
        assert_eq!(item.index, i);
        assert_eq!(item.prompt, batch[i].prompt);
        assert!(item.success);
    }
}

#[tokio::test]
async fn test_single_failure_is_isolated() {
    // Second of three items fails upstream; the batch still settles all
    // three entries.
    let mut mock = MockTextGenerator::new();
    mock.expect_complete().times(3).returning(|_, _, message| {
        if message.contains("a slider") {
            Err(UpstreamFailure::RateLimitExceeded)
        } else {
            Ok(completion("// ok"))
        }
    });

    let runner = BatchRunner::new(Arc::new(mock), Duration::ZERO);
    let batch = requests(&["a button", "a slider", "a card"]);
    let outcome = runner.run("key", "system", &batch).await;

    assert_eq!(outcome.total_generated, 2);
    assert_eq!(outcome.total_failed, 1);
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);
    assert_eq!(outcome.errors[0].prompt, "a slider");
    assert!(!outcome.errors[0].success);
    assert_eq!(outcome.results.len() + outcome.errors.len(), 3);
    assert!(outcome.is_settled());
}

#[tokio::test]
async fn test_streamed_event_sequence() {
    let runner = BatchRunner::new(Arc::new(echo_generator()), Duration::ZERO);
    let batch = requests(&["a button", "a slider"]);

    let mut events = Vec::new();
    let outcome = runner
        .run_with_events("key", "system", &batch, |event| {
            events.push(event);
            true
        })
        .await;

    assert_eq!(events.len(), 5);
    assert!(
        matches!(&events[0], ProgressEvent::Progress { current: 1, total: 2, prompt } if prompt == "a button")
    );
    assert!(matches!(&events[1], ProgressEvent::Success { result } if result.index == 0));
    assert!(matches!(
        &events[2],
        ProgressEvent::Progress {
            current: 2,
            total: 2,
            ..
        }
    ));
    assert!(matches!(&events[3], ProgressEvent::Success { result } if result.index == 1));
    assert!(
        matches!(&events[4], ProgressEvent::Complete { outcome: streamed } if *streamed == outcome)
    );
}

#[tokio::test]
async fn test_consumer_disconnect_abandons_batch() {
    // Only the first item may reach the upstream once emission fails.
    let mut mock = MockTextGenerator::new();
    mock.expect_complete()
        .times(1)
        .returning(|_, _, _| Ok(completion("// ok")));

    let runner = BatchRunner::new(Arc::new(mock), Duration::ZERO);
    let batch = requests(&["a button", "a slider", "a card"]);

    let mut seen = 0;
    let outcome = runner
        .run_with_events("key", "system", &batch, |_| {
            seen += 1;
            seen < 2 // transport dies on the first success frame
        })
        .await;

    assert_eq!(seen, 2);
    assert_eq!(outcome.total_generated, 1);
    assert!(!outcome.is_settled());
}

#[tokio::test]
async fn test_generate_item_strips_fences() {
    let mut mock = MockTextGenerator::new();
    mock.expect_complete().returning(|_, _, _| {
        Ok(completion(
            "```jsx\nfunction Button() { return null; }\n```",
        ))
    });

    let request = GenerationRequest::new("a button");
    let result = generate_item(&mock, "key", "system", &request)
        .await
        .unwrap();

    assert_eq!(result.text, "function Button() { return null; }");
}

#[tokio::test]
async fn test_design_brief_reaches_upstream_message() {
    let mut mock = MockTextGenerator::new();
    mock.expect_complete()
        .withf(|_, _, message| {
            message.contains("a button") && message.contains("Design brief: rounded corners")
        })
        .returning(|_, _, _| Ok(completion("// ok")));

    let request = GenerationRequest {
        prompt: "a button".to_string(),
        design_brief: Some("rounded corners".to_string()),
        project_name: None,
    };
    generate_item(&mock, "key", "system", &request)
        .await
        .unwrap();
}
