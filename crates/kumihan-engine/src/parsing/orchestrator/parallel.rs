use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::messages::{Locale, Message};
use crate::parsing::blocks::Segment;
use crate::parsing::error::ParseError;
use crate::parsing::subparsers::{ParseContext, Parsed};

use super::sequential::segment_text;

/// Groups segments into chunks of roughly `chunk_lines` lines.
///
/// Chunks are cut only between segments, never inside one.
pub fn chunk_segments(segments: &[Segment], chunk_lines: usize) -> Vec<&[Segment]> {
    let target = chunk_lines.max(1);
    let mut chunks = vec![];
    let mut start = 0;
    let mut lines = 0;
    for (i, segment) in segments.iter().enumerate() {
        lines += segment.lines.len();
        if lines >= target {
            chunks.push(&segments[start..=i]);
            start = i + 1;
            lines = 0;
        }
    }
    if start < segments.len() {
        chunks.push(&segments[start..]);
    }
    chunks
}

/// Worker threads to use: at most `max`, at most the machine's parallelism,
/// at least one.
pub fn worker_count(max: usize) -> usize {
    thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(max)
        .max(1)
}

/// Runs `f` over every chunk on `workers` threads and concatenates the
/// results in chunk order.
///
/// A chunk whose parse panics is left out of the output; the failure is
/// logged and reported as a localized error after the chunk results.
pub fn run_chunks<T, F>(chunks: &[T], workers: usize, locale: Locale, f: F) -> Parsed
where
    T: Sync,
    F: Fn(&T) -> Parsed + Sync,
{
    let next = AtomicUsize::new(0);
    let failures: Mutex<Vec<(usize, String)>> = Mutex::new(vec![]);
    let workers = workers.clamp(1, chunks.len().max(1));
    let (next, failures_ref, f) = (&next, &failures, &f);

    let mut done: Vec<(usize, Parsed)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || {
                    let mut local = vec![];
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(chunk) = chunks.get(index) else {
                            break;
                        };
                        match panic::catch_unwind(AssertUnwindSafe(|| f(chunk))) {
                            Ok(parsed) => local.push((index, parsed)),
                            Err(payload) => failures_ref
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .push((index, panic_reason(payload.as_ref()))),
                        }
                    }
                    local
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_default())
            .collect()
    });
    done.sort_by_key(|(index, _)| *index);

    let mut out = Parsed::default();
    for (_, parsed) in done {
        out.extend(parsed);
    }

    let mut failures = failures.into_inner().unwrap_or_else(PoisonError::into_inner);
    failures.sort();
    for (index, reason) in failures {
        log::warn!(
            "{}",
            ParseError::ChunkFailed {
                index,
                reason: reason.clone()
            }
        );
        out.errors.push(
            Message::ChunkFailed {
                index,
                reason: &reason,
            }
            .render(locale),
        );
    }
    out
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

/// Parses `text` by splitting its segments into chunks handled on a worker
/// pool.
pub fn parse_parallel(
    ctx: &ParseContext<'_>,
    text: &str,
    chunk_lines: usize,
    max_workers: usize,
) -> Parsed {
    let segments = segment_text(ctx, text, 0, 1);
    let chunks = chunk_segments(&segments, chunk_lines);
    let workers = worker_count(max_workers);
    log::debug!(
        "parallel parse: {} segments in {} chunks on {workers} workers",
        segments.len(),
        chunks.len()
    );
    run_chunks(&chunks, workers, ctx.locale, |chunk| ctx.dispatch(chunk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::node::Node;
    use crate::parsing::orchestrator::sequential::parse_sequential;
    use crate::registry::KeywordRegistry;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const DOC: &str = "# 太字 #一##\n\n本文\n続き\n\n- a\n- b\n\n# 枠線\n# 下線 #\nx\n##\n##\n\n# 未知 #y##\n\n##\n";

    #[test]
    fn chunks_are_segment_aligned() {
        let registry = KeywordRegistry::with_defaults();
        let ctx = ParseContext::new(&registry, Locale::En);
        let segments = segment_text(&ctx, DOC, 0, 1);
        let chunks = chunk_segments(&segments, 2);
        let flat: Vec<_> = chunks.iter().flat_map(|c| c.iter()).cloned().collect();
        assert_eq!(flat, segments);
        assert!(chunks.len() > 1);
    }

    #[test]
    fn chunking_empty_input() {
        assert!(chunk_segments(&[], 10).is_empty());
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 3)]
    #[case(4, 1)]
    #[case(8, 100)]
    fn parallel_matches_sequential(#[case] workers: usize, #[case] chunk_lines: usize) {
        let registry = KeywordRegistry::with_defaults();
        let ctx = ParseContext::new(&registry, Locale::En);
        let segments = segment_text(&ctx, DOC, 0, 1);
        let chunks = chunk_segments(&segments, chunk_lines);
        let parallel = run_chunks(&chunks, workers, Locale::En, |c| ctx.dispatch(c));
        assert_eq!(parallel, parse_sequential(&ctx, DOC));
    }

    #[test]
    fn failed_chunk_is_omitted_and_reported() {
        let chunks = [1, 2, 3];
        let parsed = run_chunks(&chunks, 2, Locale::En, |n| {
            if *n == 2 {
                panic!("boom");
            }
            Parsed {
                nodes: vec![Node::text(n.to_string())],
                errors: vec![],
            }
        });
        assert_eq!(parsed.nodes, vec![Node::text("1"), Node::text("3")]);
        assert_eq!(parsed.errors, vec!["failed to parse chunk 1: boom"]);
    }

    #[test]
    fn worker_count_is_bounded() {
        assert_eq!(worker_count(0), 1);
        assert!(worker_count(4) <= 4);
        assert!(worker_count(4) >= 1);
    }
}
