//! Bulk-load entry point.

use async_trait::async_trait;

use super::MaterialDbError;
use crate::domain::{BulkBatch, BulkLoadReport};

/// Insert many models and materials with referential checks suspended.
///
/// This is the only path that tolerates out-of-order references (a model
/// inheriting from one later in the batch) and the only path that writes
/// into read-only libraries. Objects already stored are skipped, not
/// failed. References still dangling afterwards are counted in the report.
#[async_trait]
pub trait BulkLoadRepository: Send + Sync {
    async fn bulk_load(&self, batch: &BulkBatch) -> Result<BulkLoadReport, MaterialDbError>;
}
