use super::*;

/// Sink for every published record, tagged with a sequence number that
/// grows in publish order.
///
/// Appends run on a background writer, so a slow journal never holds up a
/// publish. Failures are the journal's own concern: the hub logs and
/// swallows them, and a committed action never fails because of one.
#[async_trait::async_trait]
pub trait Journal: Send + Sync {
    async fn append(&self, entries: &[(u64, Record)]) -> anyhow::Result<()>;
}

/// Journal that keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

#[async_trait::async_trait]
impl Journal for Discard {
    async fn append(&self, _: &[(u64, Record)]) -> anyhow::Result<()> {
        Ok(())
    }
}
