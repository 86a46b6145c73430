// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// One request is replenished per client IP every this many milliseconds (10 per second).
pub const REPLENISH_INTERVAL_MS: u64 = 100;
pub const BURST_SIZE: u32 = 20;

pub type OAuthRateLimitLayer = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>;

/// Per-IP limiter for `/authorize` and `/token`.
///
/// Keys on `X-Forwarded-For`/`X-Real-IP`/`Forwarded` before the peer address, so the
/// server must be served with connect info.
pub fn rate_limit_layer() -> Option<OAuthRateLimitLayer> {
    let mut builder = GovernorConfigBuilder::default();
    // `per_second(n)` would mean one request every n seconds
    builder.per_millisecond(REPLENISH_INTERVAL_MS);
    builder.burst_size(BURST_SIZE);
    let config = builder.key_extractor(SmartIpKeyExtractor).finish()?;

    Some(GovernorLayer::new(config))
}
