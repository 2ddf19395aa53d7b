//! Serializable snapshots of ingredients, products, and routines.

use serde::{Deserialize, Serialize};

use crate::model::{Ingredient, Product};
use crate::routine::Routine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientReport {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hlb: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Ingredient> for IngredientReport {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            name: ingredient.name(),
            id: ingredient.id().map(ToString::to_string),
            address: ingredient.address().map(str::to_owned),
            state: ingredient.state().to_string(),
            cas_no: ingredient.cas_no.clone(),
            mass: ingredient.mass,
            hlb: ingredient.hlb,
            aliases: ingredient.aliases.clone(),
            description: ingredient.description.clone(),
        }
    }
}

/// One row of a product's formulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub state: String,
    pub ingredients: Vec<IngredientEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
    /// Full ingredient records, present after a deep sync.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<IngredientReport>,
}

impl From<&Product> for ProductReport {
    fn from(product: &Product) -> Self {
        let ingredients = product
            .ingredients()
            .iter()
            .filter_map(|i| {
                i.id().map(|id| IngredientEntry {
                    id: id.to_string(),
                    name: i.name(),
                })
            })
            .collect();
        let details = product
            .ingredients()
            .iter()
            .filter(|i| i.is_synced())
            .map(IngredientReport::from)
            .collect();
        Self {
            name: product.name(),
            id: product.id().map(ToString::to_string),
            brand: product.brand.clone(),
            product: product.product.clone(),
            address: product.address().map(str::to_owned),
            state: product.state().to_string(),
            ingredients,
            unmatched: product.unmatched().to_vec(),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub name: String,
    pub count: usize,
}

/// Presence matrix with its column and row labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub columns: Vec<String>,
    pub rows: Vec<PresenceRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRow {
    pub product: String,
    pub presence: Vec<u8>,
}

/// Answer to "which products contain this ingredient".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub ingredient: String,
    pub products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub products: Vec<ProductReport>,
    pub top: Vec<Tally>,
    pub presence: Presence,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has: Vec<Membership>,
}

impl RoutineReport {
    /// Snapshot `routine` with an already computed top list.
    pub fn new(routine: &Routine, top: Vec<(String, usize)>) -> Self {
        let analysis = routine.analysis();
        let rows = routine
            .products()
            .iter()
            .zip(analysis.matrix())
            .map(|(product, row)| PresenceRow {
                product: product.name(),
                presence: row.clone(),
            })
            .collect();
        Self {
            name: routine.name().map(str::to_owned),
            products: routine.products().iter().map(ProductReport::from).collect(),
            top: top
                .into_iter()
                .map(|(name, count)| Tally { name, count })
                .collect(),
            presence: Presence {
                columns: analysis.column_names(),
                rows,
            },
            has: Vec::new(),
        }
    }

    pub fn with_membership(mut self, ingredient: &str, products: Vec<String>) -> Self {
        self.has.push(Membership {
            ingredient: ingredient.to_owned(),
            products,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NameLookup;
    use crate::site::Page;
    use crate::testing::{ingredient_page, product_page};

    fn synced_product(token: &str, rows: &[(&str, Option<&str>)]) -> Product {
        let page = Page::parse(
            format!("https://cosdna.com/eng/cosmetic_{token}.html"),
            &product_page("Brand", token, rows),
        );
        let mut product = Product::new(token);
        product.extract(&page, &NameLookup::new());
        product
    }

    #[test]
    fn ingredient_report_copies_fields() {
        let page = Page::parse(
            "https://cosdna.com/eng/g1.html",
            &ingredient_page("Glycerin", "Glycerol", "Molecular Weight: 92.09", "Humectant."),
        );
        let mut ingredient = Ingredient::new("glycerin");
        ingredient.extract(&page, &NameLookup::new());

        let report = IngredientReport::from(&ingredient);
        assert_eq!(report.id.as_deref(), Some("i_g1"));
        assert_eq!(report.state, "linked");
        assert_eq!(report.mass, Some(92.09));
        assert_eq!(report.hlb, None);
        assert_eq!(report.aliases, vec!["glycerol"]);
    }

    #[test]
    fn product_report_lists_formulation() {
        let product = synced_product("pa", &[("Water", Some("/eng/w1.html")), ("Odd", None)]);
        let report = ProductReport::from(&product);
        assert_eq!(report.name, "Brand pa");
        assert_eq!(report.id.as_deref(), Some("p_pa"));
        assert_eq!(
            report.ingredients,
            vec![IngredientEntry {
                id: "i_w1".into(),
                name: "water".into()
            }]
        );
        assert_eq!(report.unmatched, vec!["odd"]);
        assert!(report.details.is_empty());
    }

    #[test]
    fn routine_report_labels_matrix() {
        let mut routine = Routine::new(Some("pm"), NameLookup::new());
        routine.add(vec![
            synced_product("pa", &[("X", Some("/eng/x.html"))]),
            synced_product("pb", &[("Y", Some("/eng/y.html"))]),
        ]);

        let report = RoutineReport::new(&routine, routine.top())
            .with_membership("x", vec!["Brand pa".into()]);

        assert_eq!(report.name.as_deref(), Some("pm"));
        assert_eq!(report.presence.columns, vec!["x", "y"]);
        assert_eq!(report.presence.rows[1].product, "Brand pb");
        assert_eq!(report.presence.rows[1].presence, vec![0, 1]);
        assert_eq!(report.top.len(), 2);
        assert_eq!(report.has[0].products, vec!["Brand pa"]);
    }
}
