use async_trait::async_trait;

/// Confirms with an external service that a human solved a challenge.
///
/// `verify` answers `false` for an empty token, an unreachable service or a rejected
/// token. An implementation with no secret configured answers `true` for everything,
/// which switches the challenge step off for the whole site.
#[async_trait]
pub trait ChallengeVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> bool;
}
