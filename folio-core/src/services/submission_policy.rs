//! Rate and abuse policy for contact form submissions.
//!
//! The policy looks at how many submissions a key (the submitter's email) made in the
//! trailing window and escalates from accepting, to demanding a challenge token, to
//! refusing outright. It is a pure function of its inputs; the caller supplies the
//! clock and the history.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// What the gatekeeper should do with a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accept,
    RequireChallenge,
    HardReject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyDecision {
    pub verdict: Verdict,
    pub recent_count: u64,
    pub reason: &'static str,
}

/// A submission the store already holds for some key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAttempt {
    pub key: String,
    pub at: DateTime<Utc>,
}

impl SubmissionAttempt {
    pub fn new(key: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionPolicyConfig {
    /// Length of the trailing window attempts are counted in
    pub window: Duration,
    /// Recent submissions at which a challenge becomes mandatory
    pub challenge_threshold: u64,
    /// Recent submissions at which everything is refused
    pub hard_limit: u64,
}

impl Default for SubmissionPolicyConfig {
    fn default() -> Self {
        Self {
            window: Duration::hours(1),
            challenge_threshold: 1,
            hard_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionPolicy {
    config: SubmissionPolicyConfig,
}

impl SubmissionPolicy {
    pub fn new(config: SubmissionPolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SubmissionPolicyConfig {
        &self.config
    }

    /// Inclusive lower bound of the window ending at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.config.window
    }

    /// Attempts for `key` with a timestamp at or after the window start.
    pub fn recent_count(
        &self,
        key: &str,
        now: DateTime<Utc>,
        history: &[SubmissionAttempt],
    ) -> u64 {
        let since = self.window_start(now);
        history
            .iter()
            .filter(|attempt| attempt.key == key && attempt.at >= since)
            .count() as u64
    }

    /// Decide from the full history.
    pub fn evaluate(
        &self,
        key: &str,
        now: DateTime<Utc>,
        history: &[SubmissionAttempt],
        challenge_previously_required: bool,
    ) -> PolicyDecision {
        self.decide(
            self.recent_count(key, now, history),
            challenge_previously_required,
        )
    }

    /// Decide from a count the store has already computed.
    pub fn decide(&self, recent_count: u64, challenge_previously_required: bool) -> PolicyDecision {
        let (verdict, reason) = if recent_count >= self.config.hard_limit {
            (Verdict::HardReject, "Too many requests")
        } else if recent_count >= self.config.challenge_threshold {
            (Verdict::RequireChallenge, "Recent submissions from this sender")
        } else if challenge_previously_required {
            (Verdict::RequireChallenge, "Challenge already requested for this form")
        } else {
            (Verdict::Accept, "No recent submissions")
        };

        PolicyDecision {
            verdict,
            recent_count,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "a@x.com";

    fn history(now: DateTime<Utc>, ages_in_minutes: &[i64]) -> Vec<SubmissionAttempt> {
        ages_in_minutes
            .iter()
            .map(|m| SubmissionAttempt::new(KEY, now - Duration::minutes(*m)))
            .collect()
    }

    #[test]
    fn test_no_history_accepts() {
        let policy = SubmissionPolicy::default();
        let decision = policy.evaluate(KEY, Utc::now(), &[], false);
        assert_eq!(decision.verdict, Verdict::Accept);
        assert_eq!(decision.recent_count, 0);
    }

    #[test]
    fn test_one_to_four_recent_require_challenge() {
        let policy = SubmissionPolicy::default();
        let now = Utc::now();
        for count in 1..=4 {
            let ages: Vec<i64> = (0..count).map(|i| i * 5).collect();
            let decision = policy.evaluate(KEY, now, &history(now, &ages), false);
            assert_eq!(decision.verdict, Verdict::RequireChallenge, "count {count}");
        }
    }

    #[test]
    fn test_five_or_more_recent_hard_reject() {
        let policy = SubmissionPolicy::default();
        let now = Utc::now();
        for count in 5..=8 {
            let ages: Vec<i64> = (0..count).map(|i| i * 7).collect();
            let decision = policy.evaluate(KEY, now, &history(now, &ages), true);
            assert_eq!(decision.verdict, Verdict::HardReject, "count {count}");
            assert_eq!(decision.reason, "Too many requests");
        }
    }

    #[test]
    fn test_attempt_exactly_one_hour_old_is_recent() {
        let policy = SubmissionPolicy::default();
        let now = Utc::now();
        let history = vec![SubmissionAttempt::new(KEY, now - Duration::hours(1))];
        assert_eq!(policy.recent_count(KEY, now, &history), 1);

        let older = vec![SubmissionAttempt::new(
            KEY,
            now - Duration::hours(1) - Duration::seconds(1),
        )];
        assert_eq!(policy.recent_count(KEY, now, &older), 0);
    }

    #[test]
    fn test_old_attempts_and_other_keys_ignored() {
        let policy = SubmissionPolicy::default();
        let now = Utc::now();
        let mut history = history(now, &[61, 90, 600]);
        history.push(SubmissionAttempt::new("b@x.com", now));

        let decision = policy.evaluate(KEY, now, &history, false);
        assert_eq!(decision.verdict, Verdict::Accept);
    }

    #[test]
    fn test_sticky_flag_escalates_empty_history() {
        let policy = SubmissionPolicy::default();
        let decision = policy.evaluate(KEY, Utc::now(), &[], true);
        assert_eq!(decision.verdict, Verdict::RequireChallenge);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let policy = SubmissionPolicy::default();
        let now = Utc::now();
        let history = history(now, &[1, 2, 3]);
        assert_eq!(
            policy.evaluate(KEY, now, &history, false),
            policy.evaluate(KEY, now, &history, false)
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let policy = SubmissionPolicy::new(SubmissionPolicyConfig {
            window: Duration::minutes(10),
            challenge_threshold: 2,
            hard_limit: 3,
        });
        assert_eq!(policy.decide(1, false).verdict, Verdict::Accept);
        assert_eq!(policy.decide(2, false).verdict, Verdict::RequireChallenge);
        assert_eq!(policy.decide(3, false).verdict, Verdict::HardReject);
    }
}
