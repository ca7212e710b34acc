//! `recipes` command: list catalog recipes, optionally filtered.

use anyhow::{Context, Result};
use clap::Args;

use blueprint_kit_lib::{Catalog, Recipe, RecipeFilter};

/// Recipe filter flags shared by `recipes` and `generate --all`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Substring of the recipe name or display name.
    #[arg(long)]
    pub search: Option<String>,
    /// Exact recipe category.
    #[arg(long)]
    pub category: Option<String>,
    /// Exact item group.
    #[arg(long)]
    pub group: Option<String>,
    /// Exact item subgroup.
    #[arg(long)]
    pub subgroup: Option<String>,
}

impl From<&FilterArgs> for RecipeFilter {
    fn from(args: &FilterArgs) -> Self {
        Self {
            search: args.search.clone().unwrap_or_default(),
            category: args.category.clone().unwrap_or_default(),
            group: args.group.clone().unwrap_or_default(),
            subgroup: args.subgroup.clone().unwrap_or_default(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RecipesArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Output in JSON format.
    #[arg(long)]
    pub json: bool,
}

/// Handle the recipes subcommand.
pub fn handle_recipes(catalog: &Catalog, args: &RecipesArgs) -> Result<String> {
    let recipes = RecipeFilter::from(&args.filter).apply(catalog);
    if args.json {
        serde_json::to_string_pretty(&recipes).context("failed to serialize recipes")
    } else {
        Ok(render_recipes(catalog, &recipes))
    }
}

/// Plain-text table with the machine each recipe would be built in.
fn render_recipes(catalog: &Catalog, recipes: &[&Recipe]) -> String {
    if recipes.is_empty() {
        return "No recipes match.".to_string();
    }

    let mut lines = vec![
        format!("Recipes ({}):", recipes.len()),
        format!(
            "{:<32} {:<20} {:<24} {}",
            "Name", "Category", "Machine", "Display name"
        ),
    ];
    for recipe in recipes {
        let machine = catalog
            .category(&recipe.category)
            .map(|category| category.selected_machine.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("-");
        lines.push(format!(
            "{:<32} {:<20} {:<24} {}",
            recipe.name, recipe.category, machine, recipe.display_name
        ));
    }
    lines.join("\n")
}
