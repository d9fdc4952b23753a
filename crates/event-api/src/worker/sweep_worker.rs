//! 限流表清理 Worker
//!
//! 限流判定只会淘汰当前客户端的过期时间戳，不再活跃的客户端会一直留在表中。
//! 该 Worker 以固定间隔扫描整张表，删除窗口内已无请求记录的客户端，
//! 保证大量不同来源 IP 访问时内存占用有界。

use std::sync::Arc;
use std::time::{Duration, Instant};

use event_shared::observability::metrics;
use tracing::{debug, info};

use crate::limiter::RateLimiter;

/// 限流表清理 Worker
pub struct RateLimitSweeper {
    limiter: Arc<RateLimiter>,
    /// 清理间隔
    interval: Duration,
}

impl RateLimitSweeper {
    pub fn new(limiter: Arc<RateLimiter>, interval: Duration) -> Self {
        Self { limiter, interval }
    }

    /// 主循环：持续清理直到进程退出
    pub async fn run(&self) {
        info!(interval = ?self.interval, "RateLimitSweeper 已启动");

        loop {
            tokio::time::sleep(self.interval).await;
            self.sweep_once(Instant::now());
        }
    }

    /// 执行一次清理，返回删除的客户端数量
    pub fn sweep_once(&self, now: Instant) -> usize {
        let removed = self.limiter.sweep(now);
        let tracked = self.limiter.tracked_clients();

        metrics::record_rate_limit_sweep(removed);
        metrics::set_rate_limit_tracked_clients(tracked);

        if removed > 0 {
            debug!(removed, tracked, "已清理空闲的限流客户端");
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_once_removes_expired_clients() {
        let limiter = Arc::new(RateLimiter::new(10, Duration::from_secs(60)));
        let t0 = Instant::now();
        for i in 0..50 {
            limiter.allow(&format!("10.0.0.{}", i), t0);
        }
        limiter.allow("10.0.1.1", t0 + Duration::from_secs(45));

        let sweeper = RateLimitSweeper::new(limiter.clone(), Duration::from_secs(300));

        assert_eq!(sweeper.sweep_once(t0 + Duration::from_secs(30)), 0);
        assert_eq!(sweeper.sweep_once(t0 + Duration::from_secs(60)), 50);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[tokio::test]
    async fn test_run_sweeps_periodically() {
        let limiter = Arc::new(RateLimiter::new(10, Duration::from_millis(20)));
        limiter.allow("10.0.0.1", Instant::now());
        assert_eq!(limiter.tracked_clients(), 1);

        let sweeper = RateLimitSweeper::new(limiter.clone(), Duration::from_millis(30));
        let handle = tokio::spawn(async move { sweeper.run().await });

        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        assert_eq!(limiter.tracked_clients(), 0);
    }
}
