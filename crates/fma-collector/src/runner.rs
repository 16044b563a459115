//! 속도 제한 배치 실행기.
//!
//! 작업 항목을 입력 순서대로 하나씩 처리합니다. 항목 사이에는 [`RateGate`]가
//! 최소 간격을 강제하며, 항목 하나의 실패는 기록만 하고 다음 항목으로 넘어갑니다.
//! 로그는 이 경계에서만 남깁니다.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn, Instrument};

use crate::context::RunContext;
use crate::rate_limit::{RateGate, Timer};
use crate::stats::{BatchOutcome, ItemOutcome, ItemReport};
use crate::Result;

/// 항목 처리 성공 결과
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completed {
    /// 저장된 행 수
    pub records: usize,
    /// 부분 실패 등 참고 사항 (경고로 기록)
    pub notes: Vec<String>,
}

impl Completed {
    pub fn new(records: usize) -> Self {
        Self {
            records,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// 배치 항목 처리기.
#[async_trait]
pub trait WorkHandler: Send + Sync {
    type Item: Send + Sync;

    /// 로그/보고용 항목 식별자
    fn key(&self, item: &Self::Item) -> String;

    /// 항목 하나를 처리합니다. `Err`는 해당 항목의 실패로만 기록됩니다.
    async fn handle(&self, item: &Self::Item) -> Result<Completed>;
}

/// 순차 배치 실행기.
pub struct BatchRunner<T: Timer> {
    gate: RateGate<T>,
}

impl<T: Timer> BatchRunner<T> {
    pub fn new(timer: T, delay: Duration) -> Self {
        Self {
            gate: RateGate::new(timer, delay),
        }
    }

    /// 모든 항목을 처리합니다. 결과는 항상 입력 항목 수만큼의 보고를 담습니다.
    pub async fn run<H: WorkHandler>(
        &mut self,
        ctx: &RunContext,
        operation: &str,
        items: &[H::Item],
        handler: &H,
    ) -> BatchOutcome {
        let started = self.gate.timer().now();
        let mut outcome = BatchOutcome::new();

        ctx.span().in_scope(|| {
            info!(
                operation = operation,
                items = items.len(),
                delay_ms = self.gate.interval().as_millis() as u64,
                "배치 시작"
            )
        });

        for (idx, item) in items.iter().enumerate() {
            self.gate.acquire().await;

            let key = handler.key(item);
            let span = ctx.item_span(operation, &key);
            let result = handler.handle(item).instrument(span.clone()).await;

            let report = span.in_scope(|| {
                let progress = format!("{}/{}", idx + 1, items.len());
                match result {
                    Ok(done) => {
                        for note in &done.notes {
                            warn!(progress = %progress, note = %note, "부분 실패");
                        }
                        info!(progress = %progress, records = done.records, "처리 완료");
                        ItemOutcome::Succeeded {
                            records: done.records,
                            notes: done.notes,
                        }
                    }
                    Err(e) => {
                        warn!(progress = %progress, error = %e, "처리 실패");
                        ItemOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                }
            });

            outcome.items.push(ItemReport {
                key,
                outcome: report,
            });
        }

        outcome.elapsed = self.gate.timer().now().saturating_sub(started);
        ctx.span().in_scope(|| outcome.log_summary(operation));
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectorError;
    use crate::rate_limit::tests::ManualTimer;
    use std::sync::Mutex;

    struct Recorder {
        timer: ManualTimer,
        fail_on: &'static str,
        calls: Mutex<Vec<(String, Duration)>>,
    }

    #[async_trait]
    impl WorkHandler for Recorder {
        type Item = &'static str;

        fn key(&self, item: &Self::Item) -> String {
            item.to_string()
        }

        async fn handle(&self, item: &Self::Item) -> Result<Completed> {
            self.calls
                .lock()
                .unwrap()
                .push((item.to_string(), self.timer.now()));
            // 작업 자체에 1초 소요
            self.timer.advance(Duration::from_secs(1));
            if *item == self.fail_on {
                return Err(CollectorError::Config(format!("{} failed", item)));
            }
            Ok(Completed::new(2))
        }
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_abort() {
        let timer = ManualTimer::default();
        let handler = Recorder {
            timer: timer.clone(),
            fail_on: "B",
            calls: Mutex::new(Vec::new()),
        };
        let mut runner = BatchRunner::new(timer.clone(), Duration::from_secs(12));
        let ctx = RunContext::today();

        let items = ["A", "B", "C", "D", "E"];
        let outcome = runner.run(&ctx, "test", &items, &handler).await;

        assert_eq!(outcome.total(), 5);
        assert_eq!(outcome.success(), 4);
        assert_eq!(outcome.failed_keys(), vec!["B"]);
        assert_eq!(outcome.records(), 8);

        let calls = handler.calls.lock().unwrap().clone();
        let order: Vec<&str> = calls.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, items);
        // 연속 호출 간격은 최소 12초
        for pair in calls.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= Duration::from_secs(12));
        }
        // 첫 항목 전, 마지막 항목 후에는 대기 없음
        assert_eq!(calls[0].1, Duration::ZERO);
        assert_eq!(timer.sleeps().len(), 4);
        assert_eq!(outcome.elapsed, Duration::from_secs(4 * 12 + 1));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let timer = ManualTimer::default();
        let handler = Recorder {
            timer: timer.clone(),
            fail_on: "",
            calls: Mutex::new(Vec::new()),
        };
        let mut runner = BatchRunner::new(timer.clone(), Duration::from_secs(12));
        let outcome = runner.run(&RunContext::today(), "test", &[], &handler).await;
        assert_eq!(outcome.total(), 0);
        assert!(timer.sleeps().is_empty());
    }
}
