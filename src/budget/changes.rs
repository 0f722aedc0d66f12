use std::collections::{BTreeMap, HashMap};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::client::{ApiError, BackendClient};
use crate::model::budget::{BudgetPlanDetail, SavePlanDetail};

/// A budget table cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct CellKey {
    #[schema(example = 12)]
    pub category_id: u64,
    #[schema(example = 1)]
    pub month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CellEdit {
    #[schema(example = 12)]
    pub category_id: u64,
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 360000.0)]
    pub planned_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FailedCell {
    #[schema(example = 12)]
    pub category_id: u64,
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 360000.0)]
    pub planned_amount: f64,
    #[schema(example = "Version is locked")]
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveOutcome {
    #[schema(value_type = String, format = "uuid")]
    pub batch_id: Uuid,
    #[schema(example = 5)]
    pub saved: usize,
    /// Cells still unsaved; resubmit them to retry
    pub failed: Vec<FailedCell>,
}

impl SaveOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Edited cells of one budget version that are not yet on the server.
#[derive(Debug, Default)]
pub struct PendingChanges {
    version_id: u64,
    /// Loaded state: detail id and amount per cell
    loaded: HashMap<CellKey, (u64, f64)>,
    edits: BTreeMap<CellKey, f64>,
}

enum Op {
    Create(SavePlanDetail),
    Update(u64, SavePlanDetail),
}

impl PendingChanges {
    pub fn new(version_id: u64, details: &[BudgetPlanDetail]) -> Self {
        let loaded = details
            .iter()
            .map(|d| {
                (
                    CellKey {
                        category_id: d.category_id,
                        month: d.month,
                    },
                    (d.id, d.planned_amount),
                )
            })
            .collect();
        Self {
            version_id,
            loaded,
            edits: BTreeMap::new(),
        }
    }

    /// Records an edit. Setting a cell back to its loaded value (or a missing
    /// cell to zero) drops it from the pending set.
    pub fn set(&mut self, key: CellKey, amount: f64) {
        let current = self.loaded.get(&key).map_or(0.0, |(_, v)| *v);
        if amount == current {
            self.edits.remove(&key);
        } else {
            self.edits.insert(key, amount);
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = (&CellKey, &f64)> {
        self.edits.iter()
    }

    fn op_for(&self, key: CellKey, amount: f64) -> Op {
        let body = SavePlanDetail {
            version_id: self.version_id,
            category_id: key.category_id,
            month: key.month,
            planned_amount: amount,
        };
        match self.loaded.get(&key) {
            Some((id, _)) => Op::Update(*id, body),
            None => Op::Create(body),
        }
    }

    /// Saves every pending cell concurrently.
    ///
    /// Rows are independent: there is no ordering and no rollback. Saved cells
    /// leave the pending set, failed ones stay for the next attempt.
    pub async fn save(&mut self, client: &BackendClient, token: &str) -> SaveOutcome {
        let batch_id = Uuid::new_v4();
        let batch: Vec<(CellKey, f64)> = self.edits.iter().map(|(k, v)| (*k, *v)).collect();
        info!(%batch_id, version_id = self.version_id, cells = batch.len(), "Saving budget cells");

        let requests = batch.iter().map(|(key, amount)| {
            let op = self.op_for(*key, *amount);
            async move {
                match op {
                    Op::Create(body) => client.create_plan_detail(token, &body).await,
                    Op::Update(id, body) => client.update_plan_detail(token, id, &body).await,
                }
            }
        });
        let results: Vec<Result<BudgetPlanDetail, ApiError>> = join_all(requests).await;

        let mut saved = 0;
        let mut failed = Vec::new();
        for ((key, amount), result) in batch.into_iter().zip(results) {
            match result {
                Ok(detail) => {
                    saved += 1;
                    self.loaded.insert(key, (detail.id, detail.planned_amount));
                    self.edits.remove(&key);
                }
                Err(e) => {
                    warn!(%batch_id, category_id = key.category_id, month = key.month, error = %e, "Budget cell save failed");
                    failed.push(FailedCell {
                        category_id: key.category_id,
                        month: key.month,
                        planned_amount: amount,
                        detail: e.user_message(),
                    });
                }
            }
        }

        if failed.is_empty() {
            info!(%batch_id, saved, "Budget cells saved");
        } else {
            warn!(%batch_id, saved, failed = failed.len(), "Budget save partially failed");
        }

        SaveOutcome {
            batch_id,
            saved,
            failed,
        }
    }
}
