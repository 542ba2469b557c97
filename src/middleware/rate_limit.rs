use axum::{extract::ConnectInfo, http::Request};
use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tower_governor::{
    errors::GovernorError,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::KeyExtractor,
};

/// Login attempts allowed per client: `burst` at once, one more every `period_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginLimit {
    pub burst: u32,
    pub period_secs: u64,
    /// Key on `x-forwarded-for` instead of the peer address. Only safe behind
    /// a proxy that overwrites the header.
    pub trust_proxy_headers: bool,
}

impl Default for LoginLimit {
    fn default() -> Self {
        // 5 attempts, refilled one per 3 minutes: 15 minutes for a full bucket.
        Self {
            burst: 5,
            period_secs: 180,
            trust_proxy_headers: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl KeyExtractor for IpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        // 1. Proxy header, if we sit behind one. First entry is the client.
        if self.trust_proxy_headers {
            if let Some(ip) = req
                .headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
            {
                return Ok(ip);
            }
        }

        // 2. Peer address, when the server was started with connect info.
        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return Ok(addr.ip());
        }

        // 3. Unknown clients share one bucket.
        Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}

pub type LoginConfig = GovernorConfig<IpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Builds the limiter config. `None` if `burst` or `period_secs` is zero.
pub fn create_login_config(limit: LoginLimit) -> Option<Arc<LoginConfig>> {
    GovernorConfigBuilder::default()
        .key_extractor(IpKeyExtractor {
            trust_proxy_headers: limit.trust_proxy_headers,
        })
        .period(Duration::from_secs(limit.period_secs))
        .burst_size(limit.burst)
        .finish()
        .map(Arc::new)
}
