//! Request context

use std::time::Instant;

use uuid::Uuid;

/// Identity and timing for one gateway request.
///
/// The dataset identifier arrives already resolved; this crate never
/// translates names.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for log and error correlation
    pub request_id: Uuid,
    /// Acting user recorded in the mutation script header
    pub actor: String,
    /// Resolved dataset identifier
    pub dataset_id: String,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context with a fresh request ID.
    pub fn new(actor: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            actor: actor.into(),
            dataset_id: dataset_id.into(),
            started_at: Instant::now(),
        }
    }

    /// Elapsed time since the context was created, in milliseconds.
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_get_distinct_request_ids() {
        let a = RequestContext::new("u", "d-1");
        let b = RequestContext::new("u", "d-1");
        assert_ne!(a.request_id, b.request_id);
        assert_eq!(a.dataset_id, "d-1");
    }
}
