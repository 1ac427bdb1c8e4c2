use std::fmt::{Display, Formatter};

use feescout_core::UtcDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request identifier (UUID v4) stamped on every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Metadata attached to every machine-readable output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: RequestId,
    pub generated_at: UtcDateTime,
    /// Price source that produced the snapshot, or `none` when no prices were needed.
    pub price_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices_as_of: Option<UtcDateTime>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(price_source: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            generated_at: UtcDateTime::now(),
            price_source: price_source.into(),
            prices_as_of: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_prices_as_of(mut self, prices_as_of: Option<UtcDateTime>) -> Self {
        self.prices_as_of = prices_as_of;
        self
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Standard `{ meta, data }` output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(meta: EnvelopeMeta, data: T) -> Self {
        Self { meta, data }
    }
}
