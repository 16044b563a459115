//! 고정 간격 요청 게이트.
//!
//! 연속된 외부 호출 사이에 최소 간격을 보장합니다. 첫 호출은 즉시 통과하고,
//! 이후 호출은 직전 통과 시각 + 간격까지 기다립니다. 마지막 호출 뒤에는 기다리지 않습니다.
//!
//! 시계와 대기는 [`Timer`]로 주입되므로 테스트에서 실제 시간 없이 검증할 수 있습니다.

use async_trait::async_trait;
use std::time::Duration;

/// 단조 시계 + 대기.
#[async_trait]
pub trait Timer: Send + Sync {
    /// 기준 시점 이후 경과 시간
    fn now(&self) -> Duration;

    async fn sleep(&self, duration: Duration);
}

/// tokio 시계 기반 Timer (`tokio::time::pause`와 함께 동작).
#[derive(Debug, Clone)]
pub struct TokioTimer {
    origin: tokio::time::Instant,
}

impl TokioTimer {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Timer for TokioTimer {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// 고정 간격 토큰 게이트.
pub struct RateGate<T: Timer> {
    timer: T,
    interval: Duration,
    last_pass: Option<Duration>,
}

impl<T: Timer> RateGate<T> {
    pub fn new(timer: T, interval: Duration) -> Self {
        Self {
            timer,
            interval,
            last_pass: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// 통과 가능할 때까지 대기합니다. 실제로 기다린 시간을 반환합니다.
    pub async fn acquire(&mut self) -> Duration {
        let mut waited = Duration::ZERO;
        if let Some(last) = self.last_pass {
            let ready_at = last + self.interval;
            let now = self.timer.now();
            if ready_at > now {
                waited = ready_at - now;
                self.timer.sleep(waited).await;
            }
        }
        self.last_pass = Some(self.timer.now());
        waited
    }
}
