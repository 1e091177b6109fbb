use std::{sync::mpsc, thread, time::Instant};

use storyblocks_domain::IssueKey;
use storyblocks_jira::JiraClient;

use crate::{telemetry, types::FetchOutcome};

pub const MAX_PARALLEL_FETCHES: usize = 8;

/// Fetches inputs in batches of at most `MAX_PARALLEL_FETCHES` threads.
/// Outcomes come back in input order.
pub fn fetch_all(client: &JiraClient, inputs: &[String]) -> Vec<FetchOutcome> {
    let (result_tx, result_rx) = mpsc::channel::<(usize, FetchOutcome)>();

    for (batch, chunk) in inputs.chunks(MAX_PARALLEL_FETCHES).enumerate() {
        fetch_batch(client, chunk, batch * MAX_PARALLEL_FETCHES, &result_tx);
    }
    drop(result_tx);

    let mut outcomes = result_rx.into_iter().collect::<Vec<_>>();
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

fn fetch_batch(
    client: &JiraClient,
    inputs: &[String],
    offset: usize,
    result_tx: &mpsc::Sender<(usize, FetchOutcome)>,
) {
    thread::scope(|scope| {
        for (index, input) in inputs.iter().enumerate() {
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                let started = Instant::now();
                let result = client.fetch_story(input);

                let key = IssueKey::resolve(input);
                match &result {
                    Ok(_) => {
                        telemetry::emit_success("fetch_story", Some(key.as_str()), started.elapsed())
                    }
                    Err(error) => telemetry::emit_failure(
                        "fetch_story",
                        Some(key.as_str()),
                        started.elapsed(),
                        &error.to_string(),
                    ),
                }

                let _ = result_tx.send((
                    offset + index,
                    FetchOutcome {
                        input: input.clone(),
                        result,
                    },
                ));
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use storyblocks_config::StoryConfig;
    use storyblocks_jira::{FetchError, JiraClient};
    use wiremock::MockServer;

    use super::{fetch_all, FetchOutcome, MAX_PARALLEL_FETCHES};

    async fn closed_tracker_url() -> String {
        let server = MockServer::start().await;
        let base_url = server.uri();
        drop(server);
        base_url
    }

    async fn fetch_blocking(base_url: String, inputs: Vec<String>) -> Vec<FetchOutcome> {
        tokio::task::spawn_blocking(move || {
            let client = JiraClient::from_config(&StoryConfig {
                jira_base_url: Some(base_url),
                jira_email: Some("qa@example.com".to_string()),
                jira_api_token: Some("secret".to_string()),
                insecure: false,
            })
            .expect("client");
            fetch_all(&client, &inputs)
        })
        .await
        .expect("blocking fetch task")
    }

    #[tokio::test]
    async fn keeps_input_order_across_batches_and_isolates_failures() {
        let inputs = (1..=MAX_PARALLEL_FETCHES * 2 + 3)
            .map(|n| format!("DEMO-{n}"))
            .collect::<Vec<_>>();

        let outcomes = fetch_blocking(closed_tracker_url().await, inputs.clone()).await;

        let seen = outcomes
            .iter()
            .map(|outcome| outcome.input.as_str())
            .collect::<Vec<_>>();
        assert_eq!(seen, inputs);
        assert!(outcomes
            .iter()
            .all(|outcome| matches!(outcome.result, Err(FetchError::Transport(_)))));
    }

    #[tokio::test]
    async fn empty_input_yields_no_outcomes() {
        let outcomes = fetch_blocking(closed_tracker_url().await, Vec::new()).await;
        assert!(outcomes.is_empty());
    }
}
