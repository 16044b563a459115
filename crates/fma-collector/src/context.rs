//! 실행 컨텍스트.
//!
//! 프로세스 시작 시 한 번 만들어 모든 파이프라인 단계에 명시적으로 전달합니다.
//! 항목 단위 작업은 컨텍스트 span의 자식 span 안에서 실행됩니다.

use chrono::{NaiveDate, Utc};
use tracing::{info_span, Span};
use uuid::Uuid;

/// 한 번의 수집 실행에 대한 컨텍스트
#[derive(Debug, Clone)]
pub struct RunContext {
    /// 실행 ID (로그 상관관계용)
    pub run_id: Uuid,
    /// 수집 기준일 (섹터 스냅샷 날짜)
    pub collection_date: NaiveDate,
    span: Span,
}

impl RunContext {
    pub fn new(collection_date: NaiveDate) -> Self {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", run_id = %run_id, date = %collection_date);
        Self {
            run_id,
            collection_date,
            span,
        }
    }

    /// 오늘(UTC) 기준 컨텍스트
    pub fn today() -> Self {
        Self::new(Utc::now().date_naive())
    }

    /// 실행 전체 span
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// 항목 단위 자식 span
    pub fn item_span(&self, operation: &str, key: &str) -> Span {
        info_span!(parent: &self.span, "item", operation = operation, key = key)
    }
}
