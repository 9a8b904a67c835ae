//! Concurrent chunk summarization.
//!
//! Fans one generate call per chunk out over tokio tasks, bounded by a
//! semaphore. Results are reassembled in chunk order no matter which call
//! finishes first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::llm::{BackendError, GenerationBackend};
use crate::{RecapError, Result};

use super::chunker::Chunk;
use super::prompts;
use super::style::{SummaryContext, SummaryStyle};

/// One chunk's generated summary, tagged with the chunk it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSummary {
    pub chunk_index: usize,
    pub text: String,
}

/// Summarize every chunk concurrently.
///
/// At most `concurrency` generate calls run at once, each bounded by
/// `per_call_timeout`. The first failure aborts the stage: in-flight calls
/// are cancelled best-effort, finished partials are discarded, and the
/// failing chunk's index is carried in the error. Callers pass chunks as
/// produced by the splitter, indexed contiguously from zero.
pub(crate) async fn run(
    backend: Arc<dyn GenerationBackend>,
    model: &str,
    style: SummaryStyle,
    context: Option<&SummaryContext>,
    chunks: &[Chunk],
    concurrency: usize,
    per_call_timeout: Duration,
) -> Result<Vec<PartialSummary>> {
    if concurrency == 0 {
        return Err(RecapError::InvalidInput(
            "concurrency limit must be at least 1".to_string(),
        ));
    }
    debug_assert!(chunks.iter().enumerate().all(|(i, c)| c.index == i));

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks: JoinSet<(usize, std::result::Result<String, BackendError>)> = JoinSet::new();

    for chunk in chunks {
        let prompt = prompts::build_chunk_prompt(style, context, &chunk.text);
        let backend = backend.clone();
        let semaphore = semaphore.clone();
        let model = model.to_string();
        let index = chunk.index;

        tasks.spawn(async move {
            let result = async {
                // Hold the permit for the whole call.
                let _permit = semaphore.acquire_owned().await.map_err(|_| {
                    BackendError::Unavailable("concurrency limiter closed".to_string())
                })?;

                match tokio::time::timeout(per_call_timeout, backend.generate(&model, &prompt))
                    .await
                {
                    Ok(generated) => generated,
                    Err(_) => Err(BackendError::Unavailable(format!(
                        "generate call timed out after {}s",
                        per_call_timeout.as_secs()
                    ))),
                }
            }
            .await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<String>> = vec![None; chunks.len()];

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(text))) => {
                tracing::debug!(chunk = index, "chunk summarized");
                slots[index] = Some(text);
            }
            Ok((index, Err(source))) => {
                tasks.abort_all();
                return Err(RecapError::PipelineAborted {
                    chunk_index: index,
                    source,
                });
            }
            Err(join_err) if join_err.is_cancelled() => continue,
            Err(join_err) => {
                tasks.abort_all();
                return Err(RecapError::BackendUnavailable(format!(
                    "summarization task panicked: {join_err}"
                )));
            }
        }
    }

    let mut partials = Vec::with_capacity(chunks.len());
    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(text) => partials.push(PartialSummary {
                chunk_index: index,
                text,
            }),
            None => {
                return Err(RecapError::BackendUnavailable(format!(
                    "chunk {index} produced no result"
                )))
            }
        }
    }
    Ok(partials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockBackend;
    use async_trait::async_trait;
    use std::result::Result;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    fn chunks(count: usize) -> Vec<Chunk> {
        (0..count)
            .map(|i| Chunk {
                index: i,
                text: format!("part {i}"),
            })
            .collect()
    }

    fn prompt_index(prompt: &str) -> usize {
        (0..10)
            .find(|i| prompt.contains(&format!("part {i}")))
            .expect("prompt carries no part marker")
    }

    // Answers later chunks faster than earlier ones, so completion order is
    // the reverse of chunk order.
    struct SkewedBackend;

    #[async_trait]
    impl GenerationBackend for SkewedBackend {
        async fn generate(&self, _model: &str, prompt: &str) -> Result<String, BackendError> {
            let index = prompt_index(prompt);
            tokio::time::sleep(Duration::from_millis((3 - index as u64) * 40)).await;
            Ok(format!("summary {index}"))
        }

        async fn list_models(&self) -> Result<Vec<String>, BackendError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct CountingBackend {
        concurrent: AtomicU32,
        high_water: AtomicU32,
    }

    #[async_trait]
    impl GenerationBackend for CountingBackend {
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, BackendError> {
            let now = self.concurrent.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            self.concurrent.fetch_sub(1, Ordering::SeqCst);
            Ok("done".to_string())
        }

        async fn list_models(&self) -> Result<Vec<String>, BackendError> {
            Ok(Vec::new())
        }
    }

    // Rejects chunk 1 immediately; every other chunk hangs.
    struct PoisonedBackend;

    #[async_trait]
    impl GenerationBackend for PoisonedBackend {
        async fn generate(&self, _model: &str, prompt: &str) -> Result<String, BackendError> {
            if prompt.contains("part 1") {
                return Err(BackendError::Rejected("poisoned chunk".to_string()));
            }
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("slow".to_string())
        }

        async fn list_models(&self) -> Result<Vec<String>, BackendError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn partials_come_back_in_chunk_order() {
        let input = chunks(4);
        let partials = run(
            Arc::new(SkewedBackend),
            "m",
            SummaryStyle::Detailed,
            None,
            &input,
            4,
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        assert_eq!(partials.len(), 4);
        for (i, partial) in partials.iter().enumerate() {
            assert_eq!(partial.chunk_index, i);
            assert_eq!(partial.text, format!("summary {i}"));
        }
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_the_limit() {
        let backend = Arc::new(CountingBackend::default());
        let input = chunks(8);

        let partials = run(
            backend.clone(),
            "m",
            SummaryStyle::Detailed,
            None,
            &input,
            3,
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        assert_eq!(partials.len(), 8);
        let peak = backend.high_water.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency was {peak} (limit 3)");
    }

    #[tokio::test]
    async fn first_failure_reports_the_offending_chunk() {
        let backend = Arc::new(MockBackend::new().with_failure_when("part 2"));
        let input = chunks(5);

        let err = run(
            backend,
            "m",
            SummaryStyle::Detailed,
            None,
            &input,
            4,
            Duration::from_secs(10),
        )
        .await
        .unwrap_err();

        match err {
            RecapError::PipelineAborted {
                chunk_index,
                source: BackendError::Rejected(_),
            } => assert_eq!(chunk_index, 2),
            other => panic!("expected PipelineAborted at chunk 2, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn timed_out_call_surfaces_as_unavailable() {
        let backend = Arc::new(MockBackend::new().with_latency(Duration::from_millis(200)));
        let input = chunks(1);

        let err = run(
            backend,
            "m",
            SummaryStyle::Concise,
            None,
            &input,
            1,
            Duration::from_millis(20),
        )
        .await
        .unwrap_err();

        match err {
            RecapError::PipelineAborted {
                chunk_index,
                source: BackendError::Unavailable(message),
            } => {
                assert_eq!(chunk_index, 0);
                assert!(message.contains("timed out"), "got: {message}");
            }
            other => panic!("expected timeout abort, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_cancels_in_flight_calls_promptly() {
        let input = chunks(4);
        let started = Instant::now();

        let err = run(
            Arc::new(PoisonedBackend),
            "m",
            SummaryStyle::Detailed,
            None,
            &input,
            4,
            Duration::from_secs(60),
        )
        .await
        .unwrap_err();

        assert!(
            started.elapsed() < Duration::from_secs(2),
            "abort took {:?}, hanging calls were not cancelled",
            started.elapsed()
        );
        match err {
            RecapError::PipelineAborted { chunk_index, .. } => assert_eq!(chunk_index, 1),
            other => panic!("expected PipelineAborted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_concurrency_is_rejected_before_any_call() {
        let backend = Arc::new(MockBackend::new());
        let input = chunks(3);

        let err = run(
            backend.clone(),
            "m",
            SummaryStyle::Detailed,
            None,
            &input,
            0,
            Duration::from_secs(10),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RecapError::InvalidInput(_)));
        assert_eq!(backend.generate_calls(), 0);
    }

    #[tokio::test]
    async fn no_chunks_means_no_calls() {
        let backend = Arc::new(MockBackend::new());

        let partials = run(
            backend.clone(),
            "m",
            SummaryStyle::Detailed,
            None,
            &[],
            4,
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        assert!(partials.is_empty());
        assert_eq!(backend.generate_calls(), 0);
    }
}
