//! Reference resolution: replacing object-valued arguments with their
//! server-assigned identifiers before a chain is submitted.
//!
//! Both execution modes share one scan pass that produces index-addressed
//! jobs; only the fetch differs. Writing results back by index keeps
//! sequence arguments in their original order no matter which fetch
//! finishes first.

use crate::error::Result;
use crate::selection::Chain;
use crate::value::{Identifiable, Value};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::trace;

/// One identifier fetch, addressed back into the chain by selection index,
/// argument key, and (for sequence arguments) element index.
struct Job {
    selection: usize,
    key: String,
    element: Option<usize>,
    object: Arc<dyn Identifiable>,
}

impl Chain {
    /// Replaces every object-valued argument with that object's ID, issuing
    /// all fetches concurrently and joining them before returning. The join
    /// is a barrier: the document is never built on partially resolved
    /// arguments. The first fetch failure aborts the whole resolution and
    /// propagates unchanged.
    ///
    /// Already-resolved (string) arguments produce no jobs, so running this
    /// twice is a no-op.
    pub(crate) async fn resolve_ids(&mut self) -> Result<()> {
        let jobs = self.collect_jobs();
        if jobs.is_empty() {
            return Ok(());
        }
        trace!(fetches = jobs.len(), "resolving object references");

        let ids = try_join_all(jobs.iter().map(|job| job.object.id())).await?;
        for (job, id) in jobs.iter().zip(ids) {
            self.store_id(job, id);
        }
        Ok(())
    }

    /// Sequential counterpart of [`Chain::resolve_ids`] for chains bound to
    /// a blocking session: identical replacements, one fetch at a time, in
    /// field order then argument order.
    pub(crate) fn resolve_ids_sync(&mut self) -> Result<()> {
        for job in self.collect_jobs() {
            let id = job.object.id_sync()?;
            self.store_id(&job, id);
        }
        Ok(())
    }

    /// Scans every field's arguments for object references, in field order
    /// then argument order. Sequence arguments are already materialized
    /// `Vec`s, so element writes are index-addressed.
    fn collect_jobs(&self) -> Vec<Job> {
        let mut jobs = Vec::new();
        for (i, sel) in self.selections.iter().enumerate() {
            for (key, value) in sel.args() {
                match value {
                    Value::Object(object) => jobs.push(Job {
                        selection: i,
                        key: key.clone(),
                        element: None,
                        object: Arc::clone(object),
                    }),
                    Value::List(items) => {
                        for (j, item) in items.iter().enumerate() {
                            if let Value::Object(object) = item {
                                jobs.push(Job {
                                    selection: i,
                                    key: key.clone(),
                                    element: Some(j),
                                    object: Arc::clone(object),
                                });
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        jobs
    }

    /// Writes a fetched identifier back into the argument slot it came
    /// from. The chain is privately owned during resolution, so the shapes
    /// recorded by the scan still hold.
    fn store_id(&mut self, job: &Job, id: String) {
        let Some(slot) = self.selections[job.selection].args.get_mut(&job.key) else {
            return;
        };
        let id = Value::Json(serde_json::Value::String(id));
        match job.element {
            Some(index) => {
                if let Value::List(items) = slot {
                    if let Some(element) = items.get_mut(index) {
                        *element = id;
                    }
                }
            }
            None => *slot = id,
        }
    }
}
