//! 수집 통계 구조체.

use serde::Serialize;
use std::time::Duration;

/// 항목 하나의 처리 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ItemOutcome {
    /// 한 건 이상 저장됨
    Succeeded {
        /// 저장된 행 수
        records: usize,
        /// 부분 실패/대체 소스 사용 등 참고 사항
        notes: Vec<String>,
    },
    /// 아무것도 저장되지 않음
    Failed { reason: String },
}

/// 항목별 보고
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    /// 항목 식별자 (심볼, 시리즈 코드 등)
    pub key: String,
    pub outcome: ItemOutcome,
}

impl ItemReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Succeeded { .. })
    }
}

/// 배치 실행 결과
///
/// 항목 순서는 입력 순서와 같습니다.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub items: Vec<ItemReport>,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl BatchOutcome {
    /// 새 결과 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn success(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.success()
    }

    /// 저장된 총 행 수
    pub fn records(&self) -> usize {
        self.items
            .iter()
            .map(|i| match &i.outcome {
                ItemOutcome::Succeeded { records, .. } => *records,
                ItemOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// 실패한 항목 식별자
    pub fn failed_keys(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|i| !i.is_success())
            .map(|i| i.key.as_str())
            .collect()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.items.is_empty() {
            0.0
        } else {
            (self.success() as f64 / self.total() as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total(),
            success = self.success(),
            failed = self.failed(),
            records = self.records(),
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
        if self.failed() > 0 {
            tracing::warn!(operation = operation, failed = ?self.failed_keys(), "실패 항목");
        }
    }
}
