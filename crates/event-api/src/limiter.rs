//! 滑动窗口限流器
//!
//! 按客户端标识（通常为来源 IP）记录最近一个窗口内的请求时间戳：
//! - 每次判定先淘汰窗口外的时间戳，再与配额比较
//! - 未超限时追加当前时间戳并放行，超限时只回写淘汰后的序列
//! - 时间戳年龄恰好等于窗口长度时视为已过期（严格小于才计入）
//!
//! 状态只保存在进程内存中，重启即丢失。客户端表使用 DashMap 分片加锁，
//! 同一客户端的“读取-淘汰-计数-写回”在分片写锁内完成，并发请求不会读到同一份旧计数。

use std::time::{Duration, Instant};

use dashmap::DashMap;
use event_shared::config::RateLimitConfig;

/// 单次限流判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    /// 是否放行
    pub allowed: bool,
    /// 窗口内配额
    pub limit: u32,
    /// 本次判定后窗口内剩余配额
    pub remaining: u32,
    /// 被拒绝时，最早一条记录离开窗口还需等待的时长
    pub retry_after: Option<Duration>,
}

/// 进程内滑动窗口限流器
#[derive(Debug)]
pub struct RateLimiter {
    requests_per_window: u32,
    window: Duration,
    clients: DashMap<String, Vec<Instant>>,
}

impl RateLimiter {
    /// 创建限流器
    ///
    /// `requests_per_window` 为 0 时拒绝所有请求且不记录任何客户端，
    /// 配置层会在启动时拒绝这种取值。
    pub fn new(requests_per_window: u32, window: Duration) -> Self {
        Self {
            requests_per_window,
            window,
            clients: DashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.requests_per_window, config.window())
    }

    pub fn requests_per_window(&self) -> u32 {
        self.requests_per_window
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 判定 `client_id` 在 `now` 时刻的请求是否放行
    pub fn allow(&self, client_id: &str, now: Instant) -> bool {
        self.check(client_id, now).allowed
    }

    /// 判定并返回完整结果（剩余配额、重试等待时长）
    ///
    /// 无论放行与否都会回写该客户端淘汰后的时间戳序列。
    pub fn check(&self, client_id: &str, now: Instant) -> RateDecision {
        let limit = self.requests_per_window;
        if limit == 0 {
            return RateDecision {
                allowed: false,
                limit,
                remaining: 0,
                retry_after: None,
            };
        }

        let window = self.window;
        let mut stamps = self.clients.entry(client_id.to_string()).or_default();
        stamps.retain(|&t| in_window(t, now, window));

        if stamps.len() >= limit as usize {
            return RateDecision {
                allowed: false,
                limit,
                remaining: 0,
                retry_after: retry_after(&stamps, now, window),
            };
        }

        stamps.push(now);
        RateDecision {
            allowed: true,
            limit,
            remaining: limit - stamps.len() as u32,
            retry_after: None,
        }
    }

    /// 只读查询剩余配额，不记录请求也不修改状态
    pub fn remaining(&self, client_id: &str, now: Instant) -> u32 {
        let used = self
            .clients
            .get(client_id)
            .map(|stamps| {
                stamps
                    .iter()
                    .filter(|&&t| in_window(t, now, self.window))
                    .count()
            })
            .unwrap_or(0);

        self.requests_per_window
            .saturating_sub(u32::try_from(used).unwrap_or(u32::MAX))
    }

    /// 清理所有客户端的过期时间戳，并删除已经为空的客户端
    ///
    /// 返回被删除的客户端数量。由后台清理任务周期调用，保证长期运行时内存有界。
    pub fn sweep(&self, now: Instant) -> usize {
        let window = self.window;
        let mut removed = 0;
        self.clients.retain(|_, stamps| {
            stamps.retain(|&t| in_window(t, now, window));
            let keep = !stamps.is_empty();
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// 当前跟踪的客户端数量
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

/// 时间戳是否仍在窗口内（年龄严格小于窗口长度）
fn in_window(stamp: Instant, now: Instant, window: Duration) -> bool {
    now.saturating_duration_since(stamp) < window
}

fn retry_after(stamps: &[Instant], now: Instant, window: Duration) -> Option<Duration> {
    stamps
        .iter()
        .min()
        .map(|&oldest| window.saturating_sub(now.saturating_duration_since(oldest)))
}
