use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::model::budget::{BudgetPlanDetail, Category};

pub const MONTHS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RollupRow {
    #[schema(example = 3)]
    pub category_id: u64,
    #[schema(example = "Administrative")]
    pub name: String,
    #[schema(example = 0)]
    pub depth: usize,
    pub is_leaf: bool,
    /// January..December
    pub months: Vec<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BudgetRollup {
    pub rows: Vec<RollupRow>,
    /// Monthly grand totals over all leaves
    pub totals: Vec<f64>,
    pub grand_total: f64,
    /// Multiplier applied to rollup rows and totals (1.0 when disabled)
    #[schema(example = 1.1)]
    pub multiplier: f64,
}

/// Category tree with a precomputed parent -> descendant-leaf index.
pub struct CategoryTree<'a> {
    by_id: BTreeMap<u64, &'a Category>,
    children: BTreeMap<u64, BTreeSet<u64>>,
    leaves_under: HashMap<u64, BTreeSet<u64>>,
}

impl<'a> CategoryTree<'a> {
    pub fn build(categories: &'a [Category]) -> Self {
        let by_id: BTreeMap<u64, &Category> = categories.iter().map(|c| (c.id, c)).collect();

        let mut children: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
        for category in by_id.values() {
            if category.parent_id == Some(category.id) {
                // Self-parented: treated as a root so its own cells still count.
                warn!(category_id = category.id, "Category is its own parent");
                continue;
            }
            if let Some(parent) = category.parent_id.filter(|p| by_id.contains_key(p)) {
                children.entry(parent).or_default().insert(category.id);
            }
        }

        let mut tree = Self {
            by_id,
            children,
            leaves_under: HashMap::new(),
        };

        let parents: Vec<u64> = tree.children.keys().copied().collect();
        for parent in parents {
            let leaves = tree.collect_leaves(parent);
            tree.leaves_under.insert(parent, leaves);
        }
        tree
    }

    pub fn is_leaf(&self, id: u64) -> bool {
        self.by_id.contains_key(&id) && !self.children.contains_key(&id)
    }

    /// Leaf ids below a category; a leaf maps to itself.
    pub fn leaves_of(&self, id: u64) -> BTreeSet<u64> {
        if self.is_leaf(id) {
            return BTreeSet::from([id]);
        }
        self.leaves_under.get(&id).cloned().unwrap_or_default()
    }

    fn collect_leaves(&self, root: u64) -> BTreeSet<u64> {
        let mut leaves = BTreeSet::new();
        let mut visited = HashSet::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                // Revisited category: the parent links form a cycle. Stop this branch.
                warn!(category_id = id, root, "Category cycle detected during rollup");
                continue;
            }
            match self.children.get(&id) {
                Some(kids) => stack.extend(kids.iter().rev()),
                None => {
                    leaves.insert(id);
                }
            }
        }
        leaves
    }

    /// Ids in tree pre-order with depth; categories unreachable from a root come last.
    fn ordered(&self) -> Vec<(u64, usize)> {
        let mut out = Vec::with_capacity(self.by_id.len());
        let mut seen = HashSet::new();

        let roots = self
            .by_id
            .values()
            .filter(|c| c.parent_id.is_none_or(|p| p == c.id || !self.by_id.contains_key(&p)))
            .map(|c| c.id);

        for root in roots {
            let mut stack = vec![(root, 0usize)];
            while let Some((id, depth)) = stack.pop() {
                if !seen.insert(id) {
                    continue;
                }
                out.push((id, depth));
                if let Some(kids) = self.children.get(&id) {
                    stack.extend(kids.iter().rev().map(|k| (*k, depth + 1)));
                }
            }
        }

        for id in self.by_id.keys() {
            if seen.insert(*id) {
                out.push((*id, 0));
            }
        }
        out
    }
}

/// Monthly values per leaf category, from the plan cells of a version.
fn leaf_values(tree: &CategoryTree<'_>, details: &[BudgetPlanDetail]) -> HashMap<u64, [f64; MONTHS]> {
    let mut values: HashMap<u64, [f64; MONTHS]> = HashMap::new();
    for detail in details {
        if !(1..=MONTHS as u32).contains(&detail.month) {
            warn!(detail_id = detail.id, month = detail.month, "Plan detail with invalid month ignored");
            continue;
        }
        if !tree.is_leaf(detail.category_id) {
            warn!(
                detail_id = detail.id,
                category_id = detail.category_id,
                "Plan detail on a non-leaf or unknown category ignored"
            );
            continue;
        }
        values.entry(detail.category_id).or_insert([0.0; MONTHS])[detail.month as usize - 1] +=
            detail.planned_amount;
    }
    values
}

fn sum_leaves<'l>(leaves: impl Iterator<Item = &'l u64>, values: &HashMap<u64, [f64; MONTHS]>) -> [f64; MONTHS] {
    let mut months = [0.0; MONTHS];
    for leaf in leaves {
        if let Some(v) = values.get(leaf) {
            for (m, amount) in v.iter().enumerate() {
                months[m] += amount;
            }
        }
    }
    months
}

/// Budget table with parent rows summed from their leaves.
///
/// `risk_premium` is a fraction (0.10 for +10%). It marks up parent rows and
/// the totals, never the leaf rows themselves.
pub fn rollup(categories: &[Category], details: &[BudgetPlanDetail], risk_premium: Option<f64>) -> BudgetRollup {
    let tree = CategoryTree::build(categories);
    let values = leaf_values(&tree, details);
    let multiplier = 1.0 + risk_premium.unwrap_or(0.0);

    let rows = tree
        .ordered()
        .into_iter()
        .map(|(id, depth)| {
            let is_leaf = tree.is_leaf(id);
            let months: Vec<f64> = if is_leaf {
                values.get(&id).copied().unwrap_or([0.0; MONTHS]).to_vec()
            } else {
                sum_leaves(tree.leaves_of(id).iter(), &values)
                    .iter()
                    .map(|v| v * multiplier)
                    .collect()
            };
            RollupRow {
                category_id: id,
                name: tree.by_id[&id].name.clone(),
                depth,
                is_leaf,
                total: months.iter().sum(),
                months,
            }
        })
        .collect();

    let all_leaves: BTreeSet<u64> = tree.by_id.keys().copied().filter(|id| tree.is_leaf(*id)).collect();
    let totals: Vec<f64> = sum_leaves(all_leaves.iter(), &values)
        .iter()
        .map(|v| v * multiplier)
        .collect();

    BudgetRollup {
        grand_total: totals.iter().sum(),
        rows,
        totals,
        multiplier,
    }
}
