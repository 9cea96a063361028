use notely_core::models::{CategoryChanges, NewCategory};
use notely_core::{ApiClient, CategoryStore};

use crate::cli::CategoryCommands;
use crate::commands::common::{format_category_lines, load_categories, resolve_category_id};
use crate::error::CliError;

pub async fn run_categories(client: &ApiClient, command: CategoryCommands) -> Result<(), CliError> {
    match command {
        CategoryCommands::List { json } => run_list(client, json).await,
        CategoryCommands::Add { name, color } => run_add(client, &name, color).await,
        CategoryCommands::Edit {
            category,
            name,
            color,
        } => run_edit(client, &category, name, color).await,
        CategoryCommands::Delete { category } => run_delete(client, &category).await,
    }
}

async fn run_list(client: &ApiClient, as_json: bool) -> Result<(), CliError> {
    let categories = load_categories(client).await?.snapshot().items;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else if categories.is_empty() {
        println!("No categories yet");
    } else {
        for line in format_category_lines(&categories) {
            println!("{line}");
        }
    }
    Ok(())
}

async fn run_add(client: &ApiClient, name: &str, color: Option<String>) -> Result<(), CliError> {
    let store = CategoryStore::new(client.clone());
    let mut payload = NewCategory::new(name.trim());
    if let Some(color) = color {
        payload = payload.with_color(color.trim());
    }

    let category = store.create(&payload).await?;
    println!("{}", category.id);
    Ok(())
}

async fn run_edit(
    client: &ApiClient,
    query: &str,
    name: Option<String>,
    color: Option<String>,
) -> Result<(), CliError> {
    let changes = CategoryChanges {
        name: name.map(|name| name.trim().to_string()),
        color: color.map(|color| color.trim().to_string()),
    };
    if changes.is_empty() {
        return Err(CliError::NothingToUpdate);
    }

    let store = load_categories(client).await?;
    let category_id = resolve_category_id(query, &store.snapshot().items)?;
    let category = store.update(&category_id, &changes).await?;
    println!("{}", category.id);
    Ok(())
}

async fn run_delete(client: &ApiClient, query: &str) -> Result<(), CliError> {
    let store = load_categories(client).await?;
    let category_id = resolve_category_id(query, &store.snapshot().items)?;
    store.delete(&category_id).await?;
    println!("{category_id}");
    Ok(())
}
