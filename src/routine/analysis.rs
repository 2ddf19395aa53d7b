use std::collections::{HashMap, HashSet};

use crate::identity::CanonicalId;
use crate::model::Product;

/// Display name for identifiers the routine has never seen.
pub const UNAVAILABLE: &str = "unavailable";

/// Aggregates derived from a routine's products.
///
/// Always rebuilt from scratch; never patched in place.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    flattened: Vec<CanonicalId>,
    names: HashMap<CanonicalId, String>,
    universe: Vec<CanonicalId>,
    columns: HashMap<CanonicalId, usize>,
    counts: Vec<usize>,
    matrix: Vec<Vec<u8>>,
}

impl Analysis {
    pub fn compute(products: &[Product]) -> Self {
        let mut analysis = Self::default();

        for product in products {
            for ingredient in product.ingredients() {
                let Some(id) = ingredient.id() else { continue };
                analysis.flattened.push(id.clone());
                analysis
                    .names
                    .entry(id.clone())
                    .or_insert_with(|| ingredient.name());
                let column = match analysis.columns.get(id) {
                    Some(&column) => column,
                    None => {
                        analysis.universe.push(id.clone());
                        analysis.counts.push(0);
                        analysis.columns.insert(id.clone(), analysis.universe.len() - 1);
                        analysis.universe.len() - 1
                    }
                };
                analysis.counts[column] += 1;
            }
        }

        analysis.matrix = products
            .iter()
            .map(|product| {
                let mut row = vec![0; analysis.universe.len()];
                for id in product.ingredient_ids() {
                    if let Some(&column) = analysis.columns.get(id) {
                        row[column] = 1;
                    }
                }
                row
            })
            .collect();

        analysis
    }

    /// Every resolved ingredient identifier, in product then formulation order.
    pub fn flattened(&self) -> &[CanonicalId] {
        &self.flattened
    }

    /// Distinct identifiers in first-seen order; the matrix column order.
    pub fn universe(&self) -> &[CanonicalId] {
        &self.universe
    }

    pub fn column(&self, id: &CanonicalId) -> Option<usize> {
        self.columns.get(id).copied()
    }

    /// First-seen display name, or [`UNAVAILABLE`].
    pub fn display_name(&self, id: &CanonicalId) -> &str {
        self.names.get(id).map_or(UNAVAILABLE, String::as_str)
    }

    pub fn count(&self, id: &CanonicalId) -> usize {
        self.column(id).map_or(0, |column| self.counts[column])
    }

    /// One 0/1 row per product over [`Analysis::universe`].
    pub fn matrix(&self) -> &[Vec<u8>] {
        &self.matrix
    }

    /// Column display names, aligned with the matrix.
    pub fn column_names(&self) -> Vec<String> {
        self.universe
            .iter()
            .map(|id| self.display_name(id).to_owned())
            .collect()
    }

    /// Most frequent ingredients, ties in first-seen order.
    ///
    /// With `mask`, only those identifiers are counted.
    pub fn top(&self, limit: Option<usize>, mask: Option<&HashSet<CanonicalId>>) -> Vec<(String, usize)> {
        let mut ranked: Vec<(usize, usize)> = self
            .counts
            .iter()
            .copied()
            .enumerate()
            .filter(|(column, _)| mask.is_none_or(|m| m.contains(&self.universe[*column])))
            .collect();
        // `sort_by` is stable, so equal counts keep first-seen order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit.unwrap_or(ranked.len()));

        ranked
            .into_iter()
            .map(|(column, count)| (self.display_name(&self.universe[column]).to_owned(), count))
            .collect()
    }

    /// Rows (product indexes) with a 1 in `id`'s column.
    pub fn rows_containing(&self, id: &CanonicalId) -> Vec<usize> {
        let Some(column) = self.column(id) else {
            return Vec::new();
        };
        self.matrix
            .iter()
            .enumerate()
            .filter(|(_, row)| row[column] == 1)
            .map(|(index, _)| index)
            .collect()
    }
}
