//! In-memory sliding-window rate limiting keyed by client address.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// `N` requests per window, written `N/second`, `N/minute`, `N/hour` or `N/day`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid rate limit '{0}': expected N/second, N/minute, N/hour or N/day")]
pub struct RateLimitParseError(String);

impl FromStr for RateLimit {
    type Err = RateLimitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RateLimitParseError(s.to_string());
        let (count, unit) = s.trim().split_once('/').ok_or_else(err)?;
        let max_requests: u32 = count.trim().parse().map_err(|_| err())?;
        if max_requests == 0 {
            return Err(err());
        }
        let secs = match unit.trim().to_ascii_lowercase().as_str() {
            "second" => 1,
            "minute" => 60,
            "hour" => 3_600,
            "day" => 86_400,
            _ => return Err(err()),
        };
        Ok(Self {
            max_requests,
            window: Duration::from_secs(secs),
        })
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.window.as_secs() {
            1 => "second",
            60 => "minute",
            3_600 => "hour",
            86_400 => "day",
            other => return write!(f, "{}/{}s", self.max_requests, other),
        };
        write!(f, "{}/{}", self.max_requests, unit)
    }
}

/// Per-key request log. A key may make `max_requests` requests in any
/// trailing window.
pub struct RateLimiter {
    limit: RateLimit,
    windows: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            windows: DashMap::new(),
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Record a request for `key`, or return how long until one is allowed.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut log = self.windows.entry(key.to_string()).or_default();
        while let Some(&oldest) = log.front() {
            if now.saturating_duration_since(oldest) >= self.limit.window {
                log.pop_front();
            } else {
                break;
            }
        }
        if log.len() >= self.limit.max_requests as usize {
            let oldest = log.front().copied().unwrap_or(now);
            return Err(self.limit.window - now.saturating_duration_since(oldest));
        }
        log.push_back(now);
        Ok(())
    }

    /// Drop keys whose every request has aged out.
    pub fn prune(&self) {
        let now = Instant::now();
        let window = self.limit.window;
        self.windows.retain(|_, log| {
            log.retain(|t| now.saturating_duration_since(*t) < window);
            !log.is_empty()
        });
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

/// Which limit a route falls under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Default,
    Search,
    Stats,
}

/// The three tiers, or nothing at all when limiting is disabled.
pub struct RateLimiters {
    enabled: bool,
    default: RateLimiter,
    search: RateLimiter,
    stats: RateLimiter,
}

impl RateLimiters {
    pub fn new(enabled: bool, default: RateLimit, search: RateLimit, stats: RateLimit) -> Self {
        Self {
            enabled,
            default: RateLimiter::new(default),
            search: RateLimiter::new(search),
            stats: RateLimiter::new(stats),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn limiter(&self, tier: Tier) -> &RateLimiter {
        match tier {
            Tier::Default => &self.default,
            Tier::Search => &self.search,
            Tier::Stats => &self.stats,
        }
    }

    pub fn check(&self, tier: Tier, key: &str) -> Result<(), Duration> {
        if !self.enabled {
            return Ok(());
        }
        self.limiter(tier).check(key)
    }

    pub fn prune(&self) {
        self.default.prune();
        self.search.prune();
        self.stats.prune();
    }
}

/// Whole seconds for a `Retry-After` header, never zero.
pub fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(s: &str) -> RateLimit {
        s.parse().unwrap()
    }

    #[test]
    fn parses_units() {
        assert_eq!(limit("100/minute").window, Duration::from_secs(60));
        assert_eq!(limit("5/second").max_requests, 5);
        assert_eq!(limit(" 2 / Hour ").window, Duration::from_secs(3_600));
        assert_eq!(limit("1/day").window, Duration::from_secs(86_400));
    }

    #[test]
    fn rejects_malformed_limits() {
        for bad in ["", "100", "x/minute", "0/minute", "10/fortnight", "-1/second"] {
            assert!(bad.parse::<RateLimit>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(limit("30/minute").to_string(), "30/minute");
    }

    #[test]
    fn blocks_after_max_requests() {
        let limiter = RateLimiter::new(limit("2/minute"));
        let t0 = Instant::now();
        assert!(limiter.check_at("a", t0).is_ok());
        assert!(limiter.check_at("a", t0 + Duration::from_secs(10)).is_ok());
        let wait = limiter
            .check_at("a", t0 + Duration::from_secs(20))
            .unwrap_err();
        assert_eq!(wait, Duration::from_secs(40));
        // other clients are unaffected
        assert!(limiter.check_at("b", t0 + Duration::from_secs(20)).is_ok());
    }

    #[test]
    fn window_slides() {
        let limiter = RateLimiter::new(limit("1/minute"));
        let t0 = Instant::now();
        assert!(limiter.check_at("a", t0).is_ok());
        assert!(limiter.check_at("a", t0 + Duration::from_secs(59)).is_err());
        assert!(limiter.check_at("a", t0 + Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn prune_drops_idle_keys() {
        let limiter = RateLimiter::new(limit("1/second"));
        let long_ago = Instant::now()
            .checked_sub(Duration::from_secs(5))
            .unwrap_or_else(Instant::now);
        limiter.check_at("old", long_ago).unwrap();
        limiter.check("new").unwrap();
        limiter.prune();
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn disabled_tiers_always_allow() {
        let limiters = RateLimiters::new(false, limit("1/minute"), limit("1/minute"), limit("1/minute"));
        for _ in 0..5 {
            assert!(limiters.check(Tier::Search, "a").is_ok());
        }
    }

    #[test]
    fn tiers_are_independent() {
        let limiters = RateLimiters::new(true, limit("1/minute"), limit("1/minute"), limit("1/minute"));
        assert!(limiters.check(Tier::Default, "a").is_ok());
        assert!(limiters.check(Tier::Default, "a").is_err());
        assert!(limiters.check(Tier::Stats, "a").is_ok());
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(1_200)), 2);
        assert_eq!(retry_after_secs(Duration::from_secs(3)), 3);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }
}
