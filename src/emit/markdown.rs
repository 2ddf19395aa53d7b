use std::fmt::Write;

use crate::emit::util::{escape_cell, or_dash};
use crate::report::{IngredientReport, ProductReport, RoutineReport};

/// Human-readable Markdown rendering of a report.
pub trait ToMarkdown {
    fn to_markdown(&self) -> String;
}

impl ToMarkdown for IngredientReport {
    fn to_markdown(&self) -> String {
        let mut out = String::new();
        writeln!(out, "# Ingredient: {}", self.name).unwrap();
        writeln!(out).unwrap();
        emit_ingredient_fields(&mut out, self);
        out
    }
}

impl ToMarkdown for ProductReport {
    fn to_markdown(&self) -> String {
        let mut out = String::new();
        writeln!(out, "# Product: {}", self.name).unwrap();
        writeln!(out).unwrap();
        emit_product_body(&mut out, self);
        out
    }
}

impl ToMarkdown for RoutineReport {
    fn to_markdown(&self) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "# Routine: {}",
            self.name.as_deref().unwrap_or("(unnamed)")
        )
        .unwrap();
        writeln!(out).unwrap();
        writeln!(out, "**Products:** {}", self.products.len()).unwrap();

        if !self.top.is_empty() {
            writeln!(out).unwrap();
            writeln!(out, "## Top Ingredients").unwrap();
            writeln!(out).unwrap();
            writeln!(out, "| # | Ingredient | Products |").unwrap();
            writeln!(out, "|---|---|---|").unwrap();
            for (rank, tally) in self.top.iter().enumerate() {
                writeln!(
                    out,
                    "| {} | {} | {} |",
                    rank + 1,
                    escape_cell(&tally.name),
                    tally.count
                )
                .unwrap();
            }
        }

        for membership in &self.has {
            writeln!(out).unwrap();
            writeln!(out, "## Contains: {}", membership.ingredient).unwrap();
            writeln!(out).unwrap();
            if membership.products.is_empty() {
                writeln!(out, "_No product in this routine._").unwrap();
            }
            for product in &membership.products {
                writeln!(out, "- {product}").unwrap();
            }
        }

        if !self.presence.columns.is_empty() {
            writeln!(out).unwrap();
            writeln!(out, "## Presence").unwrap();
            writeln!(out).unwrap();
            let header: Vec<String> = self.presence.columns.iter().map(|c| escape_cell(c)).collect();
            writeln!(out, "| Product | {} |", header.join(" | ")).unwrap();
            writeln!(out, "|---|{}", "---|".repeat(header.len())).unwrap();
            for row in &self.presence.rows {
                let cells: Vec<&str> = row
                    .presence
                    .iter()
                    .map(|&p| if p == 1 { "x" } else { " " })
                    .collect();
                writeln!(out, "| {} | {} |", escape_cell(&row.product), cells.join(" | ")).unwrap();
            }
        }

        for product in &self.products {
            writeln!(out).unwrap();
            writeln!(out, "---").unwrap();
            writeln!(out).unwrap();
            writeln!(out, "## {}", product.name).unwrap();
            writeln!(out).unwrap();
            emit_product_body(&mut out, product);
        }

        out
    }
}

fn emit_ingredient_fields(out: &mut String, ingredient: &IngredientReport) {
    if let Some(id) = &ingredient.id {
        writeln!(out, "**Id:** `{id}` | **State:** {}", ingredient.state).unwrap();
    } else {
        writeln!(out, "**State:** {}", ingredient.state).unwrap();
    }
    if let Some(address) = &ingredient.address {
        writeln!(out, "**Page:** <{address}>").unwrap();
    }
    writeln!(out).unwrap();
    writeln!(
        out,
        "| CAS No. | Molecular Weight | HLB |\n|---|---|---|\n| {} | {} | {} |",
        ingredient.cas_no.as_deref().unwrap_or("-"),
        or_dash(ingredient.mass),
        or_dash(ingredient.hlb)
    )
    .unwrap();

    if !ingredient.aliases.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "**Aliases:** {}", ingredient.aliases.join(", ")).unwrap();
    }
    if let Some(description) = &ingredient.description {
        writeln!(out).unwrap();
        writeln!(out, "> {description}").unwrap();
    }
}

fn emit_product_body(out: &mut String, product: &ProductReport) {
    match &product.id {
        Some(id) => writeln!(out, "**Id:** `{id}` | **State:** {}", product.state).unwrap(),
        None => writeln!(out, "**State:** {}", product.state).unwrap(),
    }
    if let Some(address) = &product.address {
        writeln!(out, "**Page:** <{address}>").unwrap();
    }

    if !product.ingredients.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "### Ingredients").unwrap();
        writeln!(out).unwrap();
        for (n, ingredient) in product.ingredients.iter().enumerate() {
            writeln!(out, "{}. {} (`{}`)", n + 1, ingredient.name, ingredient.id).unwrap();
        }
    }

    if !product.unmatched.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "### Unmatched").unwrap();
        writeln!(out).unwrap();
        for name in &product.unmatched {
            writeln!(out, "- {name}").unwrap();
        }
    }

    for detail in &product.details {
        writeln!(out).unwrap();
        writeln!(out, "### {}", detail.name).unwrap();
        writeln!(out).unwrap();
        emit_ingredient_fields(out, detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{IngredientEntry, Membership, Presence, PresenceRow, Tally};

    fn ingredient() -> IngredientReport {
        IngredientReport {
            name: "salicylic acid".into(),
            id: Some("i_abc123".into()),
            address: Some("https://cosdna.com/eng/abc123.html".into()),
            state: "linked".into(),
            cas_no: Some("69-72-7".into()),
            mass: Some(138.12),
            hlb: None,
            aliases: vec!["bha".into()],
            description: Some("A beta hydroxy acid.".into()),
        }
    }

    fn product(name: &str) -> ProductReport {
        ProductReport {
            name: name.into(),
            id: Some("p_pa".into()),
            brand: None,
            product: None,
            address: None,
            state: "linked".into(),
            ingredients: vec![
                IngredientEntry {
                    id: "i_x".into(),
                    name: "x".into(),
                },
                IngredientEntry {
                    id: "i_y".into(),
                    name: "y".into(),
                },
            ],
            unmatched: vec!["odd oil".into()],
            details: vec![],
        }
    }

    #[test]
    fn ingredient_markdown_has_chemistry_table() {
        let md = ingredient().to_markdown();
        assert!(md.starts_with("# Ingredient: salicylic acid\n"));
        assert!(md.contains("| 69-72-7 | 138.12 | - |"));
        assert!(md.contains("**Aliases:** bha"));
        assert!(md.contains("> A beta hydroxy acid."));
    }

    #[test]
    fn product_markdown_lists_ingredients_in_order() {
        let md = product("Product A").to_markdown();
        assert!(md.contains("1. x (`i_x`)\n2. y (`i_y`)"));
        assert!(md.contains("### Unmatched"));
        assert!(md.contains("- odd oil"));
    }

    #[test]
    fn routine_markdown_renders_matrix() {
        let report = RoutineReport {
            name: Some("am".into()),
            products: vec![product("A"), product("B")],
            top: vec![Tally {
                name: "y".into(),
                count: 2,
            }],
            presence: Presence {
                columns: vec!["x".into(), "y".into()],
                rows: vec![
                    PresenceRow {
                        product: "A".into(),
                        presence: vec![1, 1],
                    },
                    PresenceRow {
                        product: "B".into(),
                        presence: vec![0, 1],
                    },
                ],
            },
            has: vec![Membership {
                ingredient: "y".into(),
                products: vec!["A".into(), "B".into()],
            }],
        };
        let md = report.to_markdown();
        assert!(md.starts_with("# Routine: am\n"));
        assert!(md.contains("| 1 | y | 2 |"));
        assert!(md.contains("| Product | x | y |"));
        assert!(md.contains("|---|---|---|"));
        assert!(md.contains("| B |   | x |"));
        assert!(md.contains("## Contains: y"));
    }

    #[test]
    fn empty_routine_markdown() {
        let report = RoutineReport {
            name: None,
            products: vec![],
            top: vec![],
            presence: Presence {
                columns: vec![],
                rows: vec![],
            },
            has: vec![],
        };
        let md = report.to_markdown();
        assert!(md.contains("(unnamed)"));
        assert!(md.contains("**Products:** 0"));
        assert!(!md.contains("## Presence"));
    }
}
