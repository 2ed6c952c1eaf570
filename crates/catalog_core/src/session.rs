use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use tracing::info;

/// The decorative "diamonds" tally. Clones share one counter, so a handle can
/// be given to every view of a session without any global state.
#[derive(Debug, Clone, Default)]
pub struct DiamondCounter {
    value: Arc<AtomicI64>,
}

impl DiamondCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) -> i64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn decrement(&self) -> i64 {
        self.value.fetch_sub(1, Ordering::SeqCst) - 1
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::SeqCst);
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }
}

/// Profile handed over by the external identity provider after sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Default)]
pub struct Session {
    diamonds: DiamondCounter,
    profile: Option<UserProfile>,
}

impl Session {
    pub fn new(diamonds: DiamondCounter) -> Self {
        Self {
            diamonds,
            profile: None,
        }
    }

    pub fn diamonds(&self) -> &DiamondCounter {
        &self.diamonds
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.profile.is_some()
    }

    pub fn sign_in(&mut self, profile: UserProfile) {
        info!(user = %profile.name, "session: signed in");
        self.profile = Some(profile);
    }

    /// Signing out also resets the diamond count.
    pub fn sign_out(&mut self) {
        if let Some(profile) = self.profile.take() {
            info!(user = %profile.name, "session: signed out");
        }
        self.diamonds.reset();
    }
}
