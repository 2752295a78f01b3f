use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Decides whether a username/password pair names a known principal.
pub trait PrincipalVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single account fixed at startup.
#[derive(Debug, Clone)]
pub struct StaticPrincipal {
    username: String,
    password: String,
}

impl StaticPrincipal {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl PrincipalVerifier for StaticPrincipal {
    fn verify(&self, username: &str, password: &str) -> bool {
        // Both fields are always compared so a wrong username costs the same as a wrong password.
        let username_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let password_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        username_ok & password_ok
    }
}

fn constant_time_eq(expected: &[u8], presented: &[u8]) -> bool {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(expected) else {
        return false;
    };
    mac.update(expected);
    let expected_tag = mac.finalize().into_bytes();

    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(expected) else {
        return false;
    };
    mac.update(presented);
    mac.verify_slice(&expected_tag).is_ok()
}
