#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use book_server::auth::{Authenticator, StaticPrincipal, TokenSigner};
use book_server::middleware::LoginThrottle;
use book_server::store::{seed_books, BookStore};

pub const SECRET: &[u8] = b"01234567890123456789012345678901";
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "password";

pub fn authenticator_with(secret: &[u8], ttl: Duration) -> Authenticator {
    let signer = TokenSigner::new(secret.to_vec(), ttl).expect("valid signer");
    Authenticator::new(signer, Arc::new(StaticPrincipal::new(USERNAME, PASSWORD)))
}

pub fn authenticator() -> Authenticator {
    authenticator_with(SECRET, Duration::from_secs(3600))
}

pub fn seeded_store() -> BookStore {
    BookStore::with_seed(seed_books())
}

pub struct TestState {
    pub authenticator: Authenticator,
    pub store: BookStore,
    pub throttle: LoginThrottle,
}

impl TestState {
    pub fn new() -> Self {
        Self {
            authenticator: authenticator(),
            store: seeded_store(),
            throttle: LoginThrottle::default(),
        }
    }

    pub fn with_throttle(mut self, throttle: LoginThrottle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.authenticator.clone()))
            .app_data(web::Data::new(self.store.clone()))
            .app_data(web::Data::new(self.throttle.clone()));
        book_server::handlers::configure(cfg);
    }

    pub fn token(&self) -> String {
        self.authenticator
            .issue(USERNAME, PASSWORD)
            .expect("issue token")
            .token
    }
}
