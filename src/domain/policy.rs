use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Whether a health score warrants a protective backup.
///
/// Pure comparison: true iff the score is strictly below the threshold.
/// A score exactly at the threshold does not trigger.
#[must_use]
pub fn should_backup(health_score: f64, threshold: f64) -> bool {
    health_score < threshold
}

/// Decides when to invoke the backup executor.
///
/// With no cool-down configured this reproduces the reference behaviour of
/// re-triggering on every cycle the score stays low. A cool-down suppresses
/// re-triggering for the configured window after a run has been attempted,
/// tracked per device.
pub struct RemediationPolicy {
    threshold: f64,
    cooldown: Option<Duration>,
    last_run: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl RemediationPolicy {
    #[must_use]
    pub fn new(threshold: f64, cooldown: Option<Duration>) -> Self {
        Self {
            threshold,
            cooldown,
            last_run: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Should a backup run for `device` given `health_score` at `now`?
    #[must_use]
    pub fn decide(&self, device: &str, health_score: f64, now: DateTime<Utc>) -> bool {
        if !should_backup(health_score, self.threshold) {
            return false;
        }
        let Some(cooldown) = self.cooldown else {
            return true;
        };
        let last_run = match self.last_run.lock() {
            Ok(guard) => guard,
            // A poisoned map only loses cool-down history; trigger rather
            // than miss a protective backup.
            Err(_) => return true,
        };
        match last_run.get(device) {
            Some(last) => {
                let elapsed = now.signed_duration_since(*last);
                elapsed.to_std().map_or(true, |e| e >= cooldown)
            }
            None => true,
        }
    }

    /// Record that a backup was attempted for `device` at `at`.
    pub fn note_backup(&self, device: &str, at: DateTime<Utc>) {
        if let Ok(mut last_run) = self.last_run.lock() {
            last_run.insert(device.to_string(), at);
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn should_backup_below_threshold() {
        assert!(should_backup(0.5, 0.7));
        assert!(should_backup(0.0, 0.7));
    }

    #[test]
    fn should_backup_above_threshold() {
        assert!(!should_backup(0.9, 0.7));
        assert!(!should_backup(1.0, 0.7));
    }

    #[test]
    fn should_backup_boundary_is_false() {
        assert!(!should_backup(0.7, 0.7));
    }

    #[test]
    fn no_cooldown_triggers_every_cycle() {
        let policy = RemediationPolicy::new(0.7, None);
        let now = Utc::now();
        assert!(policy.decide("/dev/sda", 0.5, now));
        policy.note_backup("/dev/sda", now);
        assert!(policy.decide("/dev/sda", 0.5, now));
    }

    #[test]
    fn healthy_score_never_triggers() {
        let policy = RemediationPolicy::new(0.7, None);
        assert!(!policy.decide("/dev/sda", 0.9, Utc::now()));
    }

    #[test]
    fn cooldown_suppresses_retrigger_within_window() {
        let policy = RemediationPolicy::new(0.7, Some(Duration::from_secs(3600)));
        let now = Utc::now();
        assert!(policy.decide("/dev/sda", 0.5, now));
        policy.note_backup("/dev/sda", now);

        let soon = now + TimeDelta::try_seconds(600).expect("delta");
        assert!(!policy.decide("/dev/sda", 0.5, soon));

        let later = now + TimeDelta::try_seconds(3600).expect("delta");
        assert!(policy.decide("/dev/sda", 0.5, later));
    }

    #[test]
    fn cooldown_is_tracked_per_device() {
        let policy = RemediationPolicy::new(0.7, Some(Duration::from_secs(3600)));
        let now = Utc::now();
        policy.note_backup("/dev/sda", now);

        assert!(!policy.decide("/dev/sda", 0.5, now));
        assert!(policy.decide("/dev/sdb", 0.5, now));
    }
}
