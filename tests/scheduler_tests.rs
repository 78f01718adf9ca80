use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use promptbatch::pacing::Pacing;
use promptbatch::{
  Answer, BatchScheduler, Complete, RequestConfig, SequentialRunner,
};

/// Stub completer: per-prompt latency and reply, records call times
struct StubClient
{   replies: HashMap<String, (Duration, Option<String>)>
  , started: Mutex<Vec<(String, Instant)>>
  , settled: Mutex<Vec<(String, Instant)>>
}

impl StubClient
{   fn new(replies: &[(&str, u64, Option<&str>)]) -> Self
    {   StubClient
        {   replies: replies.iter()
              .map(|(p, ms, r)| (
                p.to_string(),
                (Duration::from_millis(*ms), r.map(str::to_string))
              ))
              .collect()
          , started: Mutex::new(Vec::new())
          , settled: Mutex::new(Vec::new())
        }
    }

    fn started_at(&self, prompt: &str) -> Instant
    {   self.started.lock().unwrap()
          .iter()
          .find(|(p, _)| p == prompt)
          .map(|(_, t)| *t)
          .unwrap()
    }

    fn settled_at(&self, prompt: &str) -> Instant
    {   self.settled.lock().unwrap()
          .iter()
          .find(|(p, _)| p == prompt)
          .map(|(_, t)| *t)
          .unwrap()
    }
}

impl Complete for StubClient
{   async fn complete(
      &self
    , prompt: &str
    , _config: &RequestConfig
    ) -> Answer
    {   self.started.lock().unwrap()
          .push((prompt.to_string(), Instant::now()));
        let (latency, reply) = self.replies
          .get(prompt)
          .cloned()
          .unwrap_or((Duration::ZERO, None));
        tokio::time::sleep(latency).await;
        self.settled.lock().unwrap()
          .push((prompt.to_string(), Instant::now()));
        match reply
        {   Some(content) => Answer::success(content)
          , None => Answer::failed()
        }
    }
}

fn prompts(items: &[&str]) -> Vec<String>
{   items.iter().map(|s| s.to_string()).collect()
}

/// Paused clock advances in whole-millisecond ticks
fn assert_elapsed(start: Instant, expected: Duration)
{   let elapsed = start.elapsed();
    assert!(
      elapsed >= expected && elapsed < expected + Duration::from_millis(50),
      "elapsed {:?}, expected {:?}", elapsed, expected
    );
}

fn texts(answers: &[Answer]) -> Vec<&str>
{   answers.iter().map(Answer::text).collect()
}

// ===== Batch Scheduler =====

#[tokio::test(start_paused = true)]
async fn test_scheduler_keeps_order_when_first_finishes_last()
{   let client = StubClient::new(&[
      ("a", 3000, Some("A"))
    , ("b", 10, Some("B"))
    , ("c", 500, Some("C"))
    ]);
    let scheduler = BatchScheduler::new(3, Pacing::from_millis(5000));

    let answers = scheduler.run(
      &client, &prompts(&["a", "b", "c"]), &RequestConfig::default(), |_| {}
    ).await;

    assert_eq!(texts(&answers), vec!["A", "B", "C"]);
    // all three were in flight together
    assert!(client.started_at("c") < client.settled_at("b"));
    assert!(client.settled_at("b") < client.settled_at("a"));
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_paces_groups()
{   let client = StubClient::new(&[
      ("p0", 3000, Some("0"))
    , ("p1", 1000, Some("1"))
    , ("p2", 1000, Some("2"))
    , ("p3", 1000, Some("3"))
    , ("p4", 1000, Some("4"))
    ]);
    let delay = Duration::from_secs(5);
    let scheduler = BatchScheduler::new(2, Pacing::new(delay));
    let start = Instant::now();

    let answers = scheduler.run(
      &client,
      &prompts(&["p0", "p1", "p2", "p3", "p4"]),
      &RequestConfig::default(),
      |_| {}
    ).await;

    assert_eq!(answers.len(), 5);
    // group 1 settles when its slowest call does
    let group1_done = client.settled_at("p0");
    assert!(client.started_at("p2") >= group1_done + delay);
    assert!(client.started_at("p3") >= group1_done + delay);
    let group2_done = client.settled_at("p2").max(client.settled_at("p3"));
    assert!(client.started_at("p4") >= group2_done + delay);
    // no pause after the final group: 3 + 5 + 1 + 5 + 1
    assert_elapsed(start, Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_batch_size_one_is_one_at_a_time()
{   let client = StubClient::new(&[
      ("Say hi", 100, Some("Hi"))
    , ("Say bye", 100, Some("Bye"))
    ]);
    let scheduler = BatchScheduler::new(1, Pacing::from_millis(5000));

    let mut progress = Vec::new();
    let answers = scheduler.run(
      &client,
      &prompts(&["Say hi", "Say bye"]),
      &RequestConfig::default(),
      |p| progress.push(p)
    ).await;

    assert_eq!(texts(&answers), vec!["Hi", "Bye"]);
    assert!(
      client.started_at("Say bye")
        >= client.settled_at("Say hi") + Duration::from_secs(5)
    );
    assert_eq!(progress, vec![0.5, 1.0]);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_contains_single_failure()
{   let client = StubClient::new(&[
      ("ok1", 200, Some("one"))
    , ("bad", 50, None)
    , ("ok2", 300, Some("two"))
    , ("ok3", 100, Some("three"))
    ]);
    let scheduler = BatchScheduler::new(4, Pacing::from_millis(5000));

    let mut progress = Vec::new();
    let answers = scheduler.run(
      &client,
      &prompts(&["ok1", "bad", "ok2", "ok3"]),
      &RequestConfig::default(),
      |p| progress.push(p)
    ).await;

    assert_eq!(answers.len(), 4);
    assert!(answers[1].is_failure());
    assert_eq!(texts(&answers), vec!["one", "", "two", "three"]);
    assert_eq!(progress, vec![1.0]);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_progress_is_monotonic_and_ends_at_one()
{   let names: Vec<String> = (0..7).map(|i| format!("p{}", i)).collect();
    let replies: Vec<(&str, u64, Option<&str>)> = names.iter()
      .map(|n| (n.as_str(), 10, Some("x")))
      .collect();
    let client = StubClient::new(&replies);
    let scheduler = BatchScheduler::new(3, Pacing::from_millis(100));

    let mut progress = Vec::new();
    let answers = scheduler.run(
      &client, &names, &RequestConfig::default(), |p| progress.push(p)
    ).await;

    assert_eq!(answers.len(), 7);
    assert_eq!(progress.len(), 3);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.iter().filter(|p| **p == 1.0).count(), 1);
    assert_eq!(*progress.last().unwrap(), 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_empty_input()
{   let client = StubClient::new(&[]);
    let scheduler = BatchScheduler::new(3, Pacing::from_millis(5000));
    let start = Instant::now();

    let mut progress = Vec::new();
    let answers = scheduler.run(
      &client, &[], &RequestConfig::default(), |p| progress.push(p)
    ).await;

    assert!(answers.is_empty());
    assert_eq!(progress, vec![1.0]);
    assert_elapsed(start, Duration::ZERO);
}

// ===== Sequential Runner =====

#[tokio::test(start_paused = true)]
async fn test_sequential_one_call_at_a_time_with_trailing_pause()
{   let client = StubClient::new(&[
      ("a", 500, Some("A"))
    , ("b", 500, None)
    , ("c", 500, Some("C"))
    ]);
    let delay = Duration::from_secs(1);
    let runner = SequentialRunner::new(Pacing::new(delay));
    let start = Instant::now();

    let mut progress = Vec::new();
    let answers = runner.run(
      &client,
      &prompts(&["a", "b", "c"]),
      &RequestConfig::default(),
      |p| progress.push(p)
    ).await;

    assert_eq!(texts(&answers), vec!["A", "", "C"]);
    assert!(client.started_at("b") >= client.settled_at("a") + delay);
    assert!(client.started_at("c") >= client.settled_at("b") + delay);
    // pause after the last call as well
    assert_elapsed(start, Duration::from_millis(4500));
    assert_eq!(progress.len(), 3);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*progress.last().unwrap(), 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_sequential_zero_delay()
{   let client = StubClient::new(&[("a", 0, Some("A")), ("b", 0, Some("B"))]);
    let runner = SequentialRunner::new(Pacing::from_millis(0));
    let start = Instant::now();

    let answers = runner.run(
      &client, &prompts(&["a", "b"]), &RequestConfig::default(), |_| {}
    ).await;

    assert_eq!(texts(&answers), vec!["A", "B"]);
    assert_elapsed(start, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_both_strategies_preserve_length()
{   let names: Vec<String> = (0..10).map(|i| format!("q{}", i)).collect();
    // every third prompt fails
    let replies: Vec<(&str, u64, Option<&str>)> = names.iter()
      .enumerate()
      .map(|(i, n)| (
        n.as_str(),
        (10 - i as u64) * 10,
        if i % 3 == 0 { None } else { Some(n.as_str()) }
      ))
      .collect();
    let client = StubClient::new(&replies);
    let config = RequestConfig::default();

    let batched = BatchScheduler::new(4, Pacing::from_millis(10))
      .run(&client, &names, &config, |_| {})
      .await;
    let sequential = SequentialRunner::new(Pacing::from_millis(10))
      .run(&client, &names, &config, |_| {})
      .await;

    assert_eq!(batched.len(), names.len());
    assert_eq!(batched, sequential);
    for (i, answer) in batched.iter().enumerate()
    {   if i % 3 == 0
        {   assert!(answer.is_failure());
        } else
        {   assert_eq!(answer.text(), names[i]);
        }
    }
}
