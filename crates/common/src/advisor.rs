use async_trait::async_trait;

use crate::{AdvisorScore, Subject};

/// Uniform contract over every advisor backend.
///
/// Local rule advisors and remote model advisors look identical to the
/// aggregator: each turns a `Subject` into one `AdvisorScore`.
///
/// Implementations must not panic and must not retry. Any transport or parse
/// failure is reported as `AdvisorScore::failed`. Time bounds are applied by
/// the caller, so an implementation may simply await its request.
#[async_trait]
pub trait AdvisorClient: Send + Sync {
    /// Stable identifier used in logs and in the advisor registry.
    fn id(&self) -> &str;

    /// Judge the subject. Always returns a result object.
    async fn score(&self, subject: &Subject) -> AdvisorScore;
}
