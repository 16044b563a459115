//! 필드 변환(coercion) 유틸리티.
//!
//! 외부 데이터 소스가 돌려주는 원시 스칼라 값(문자열, 숫자, 센티넬 마커)을
//! 정규화된 `Option` 값으로 변환합니다. 모든 함수는 total 함수입니다:
//! 변환할 수 없는 입력은 에러 대신 `None`을 반환합니다.
//!
//! # Null로 처리되는 입력
//!
//! - 빈 문자열 (공백만 있는 문자열 포함)
//! - JSON `null` 또는 필드 누락
//! - 센티넬 마커: `"None"`, `"N/A"`, `"-"`
//! - 파싱 실패, NaN/무한대

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// 데이터 소스들이 "값 없음"을 표현하는 센티넬 문자열.
pub const SENTINELS: [&str; 4] = ["", "None", "N/A", "-"];

/// 날짜 필드의 유일한 허용 형식.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 센티넬 마커 여부 확인 (앞뒤 공백 무시).
pub fn is_sentinel(raw: &str) -> bool {
    SENTINELS.contains(&raw.trim())
}

/// 실수 변환.
pub fn numeric(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

/// 정수 변환. 실수로 파싱한 뒤 소수점 이하를 버립니다 (`"12.9"` → 12).
pub fn integer(raw: Option<&Value>) -> Option<i64> {
    match raw? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => parse_integer(s),
        _ => None,
    }
}

/// `YYYY-MM-DD` 날짜 변환.
pub fn date(raw: Option<&Value>) -> Option<NaiveDate> {
    match raw? {
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

/// 문자열 변환. 숫자는 문자열로 표현합니다 (예: CIK가 숫자로 오는 경우).
pub fn text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(s) if !is_sentinel(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 문자열에서 실수 파싱.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    if is_sentinel(raw) {
        return None;
    }
    raw.trim().parse::<f64>().ok().and_then(finite)
}

/// 문자열에서 정수 파싱 (실수 파싱 후 버림).
pub fn parse_integer(raw: &str) -> Option<i64> {
    parse_numeric(raw).and_then(truncate)
}

/// 문자열에서 날짜 파싱.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if is_sentinel(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// NaN/무한대를 `None`으로.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Unix timestamp(초)를 UTC 날짜로 변환.
pub fn date_from_timestamp(secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

fn truncate(value: f64) -> Option<i64> {
    let value = finite(value)?.trunc();
    // i64 범위를 벗어나면 포화 대신 null
    if value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
