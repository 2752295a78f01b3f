use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::ApiError;

pub const DEFAULT_MAX_ATTEMPTS: usize = 10;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Sliding-window limit on login attempts per client address.
#[derive(Clone)]
pub struct LoginThrottle {
    attempts: Arc<DashMap<IpAddr, Vec<Instant>>>,
    max_attempts: usize,
    window: Duration,
}

impl LoginThrottle {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            window,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Records an attempt and reports whether it is within the limit.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    pub fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut entry = self.attempts.entry(ip).or_default();
        entry.retain(|&timestamp| now.saturating_duration_since(timestamp) < self.window);

        if entry.len() >= self.max_attempts {
            return false;
        }

        entry.push(now);
        true
    }

    pub fn cleanup_old_entries(&self) -> usize {
        let now = Instant::now();
        let before = self.attempts.len();

        self.attempts.retain(|_, timestamps| {
            timestamps.retain(|&timestamp| now.saturating_duration_since(timestamp) < self.window);
            !timestamps.is_empty()
        });

        before.saturating_sub(self.attempts.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.attempts.len()
    }
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW)
    }
}

pub async fn login_throttle_middleware<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    // Without a throttle registered, or a peer address to key on, the request passes through.
    let throttle = req.app_data::<web::Data<LoginThrottle>>().cloned();
    let ip = req.peer_addr().map(|addr| addr.ip());

    if let (Some(throttle), Some(ip)) = (throttle, ip) {
        if !throttle.check(ip) {
            log::warn!("Login throttled for {}", ip);
            return Ok(req
                .error_response(ApiError::RateLimitExceeded)
                .map_into_right_body());
        }
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
