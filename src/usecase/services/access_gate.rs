use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::session::Session;

/// Password used when none is configured.
pub const DEFAULT_PASSWORD: &str = "jotinha";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("wrong password")]
    WrongPassword,
    #[error("session expired at {0}")]
    Expired(DateTime<Utc>),
}

/// Single shared-password check. There is no per-user identity.
pub struct AccessGate {
    password: String,
    ttl: Duration,
}

impl AccessGate {
    pub fn new(password: Option<String>, ttl: Duration) -> Self {
        let password = password
            .filter(|password| !password.is_empty())
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());
        Self { password, ttl }
    }

    pub fn unlock(&self, attempt: &str, now: DateTime<Utc>) -> Result<Session, AccessError> {
        if attempt != self.password {
            warn!("access denied");
            return Err(AccessError::WrongPassword);
        }
        let session = Session::new(now, self.ttl);
        info!(expires_at = %session.expires_at, "access granted");
        Ok(session)
    }

    pub fn check(&self, session: &Session, now: DateTime<Utc>) -> Result<(), AccessError> {
        if session.is_active(now) {
            Ok(())
        } else {
            Err(AccessError::Expired(session.expires_at))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).expect("timestamp should be valid")
    }

    #[test]
    fn unlock_accepts_configured_password_only() {
        let gate = AccessGate::new(Some("s3cret".to_string()), Duration::minutes(5));

        assert!(gate.unlock("s3cret", at(0)).is_ok());
        assert_eq!(gate.unlock("jotinha", at(0)), Err(AccessError::WrongPassword));
    }

    #[test]
    fn unconfigured_gate_falls_back_to_default_password() {
        let gate = AccessGate::new(None, Duration::minutes(5));
        assert!(gate.unlock(DEFAULT_PASSWORD, at(0)).is_ok());

        let blank = AccessGate::new(Some(String::new()), Duration::minutes(5));
        assert!(blank.unlock(DEFAULT_PASSWORD, at(0)).is_ok());
        assert!(blank.unlock("", at(0)).is_err());
    }

    #[test]
    fn session_expires_after_ttl() {
        let gate = AccessGate::new(None, Duration::minutes(1));
        let session = gate
            .unlock(DEFAULT_PASSWORD, at(1_000))
            .expect("default password should unlock");

        assert!(gate.check(&session, at(1_059)).is_ok());
        assert_eq!(
            gate.check(&session, at(1_060)),
            Err(AccessError::Expired(at(1_060)))
        );
    }
}
