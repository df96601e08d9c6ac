use anyhow::{anyhow, Result};

use riba_market_core::models::{CatalogueItemId, ItemDraft, ItemStatus, Price};
use riba_market_core::utils::truncate_string;
use riba_market_core::{ItemManager, ItemsOwner};

use super::{print_json, resolve_catalogue, Context};
use crate::ItemAction;

fn open_items(ctx: &Context, catalogue: Option<&str>) -> Result<ItemManager> {
    let owner = match catalogue {
        Some(input) => ItemsOwner::Catalogue(resolve_catalogue(&ctx.catalogues(), input)?),
        None => ItemsOwner::Unscoped,
    };
    Ok(ItemManager::open(ctx.cache.clone(), owner))
}

pub fn run(action: ItemAction, ctx: &Context) -> Result<()> {
    match action {
        ItemAction::List { catalogue } => {
            let items = open_items(ctx, catalogue.as_deref())?;
            if ctx.json {
                return print_json(items.items());
            }
            for item in items.items() {
                println!(
                    "{}  {:<28}  {:>12}  {}",
                    item.id,
                    truncate_string(&item.name, 28),
                    item.price,
                    item.status
                );
            }
            let stats = items.stats();
            println!("{} items, {} published, {} draft", stats.total, stats.published, stats.draft);
        }
        ItemAction::Add {
            catalogue,
            name,
            price,
            category,
            description,
            image,
            publish,
        } => {
            let mut items = open_items(ctx, catalogue.as_deref())?;
            let status = if publish { ItemStatus::Published } else { ItemStatus::Draft };
            let created = items.create(
                ItemDraft::new(name, price)
                    .with_category(category)
                    .with_description(description)
                    .with_image(image)
                    .with_status(status),
            )?;
            println!("Added {} ({}) as {}", created.name, created.id, created.status);
        }
        ItemAction::Edit {
            catalogue,
            id,
            name,
            price,
            category,
            description,
            image,
        } => {
            let mut items = open_items(ctx, catalogue.as_deref())?;
            let id = CatalogueItemId::new(id);
            let mut item = items
                .get(&id)
                .cloned()
                .ok_or_else(|| anyhow!("No item with id '{}'", id))?;
            if let Some(name) = name {
                item.name = name;
            }
            if let Some(price) = price {
                item.price = Price::new(price);
            }
            if let Some(category) = category {
                item.category = category;
            }
            if let Some(description) = description {
                item.description = description;
            }
            if let Some(image) = image {
                item.image = image;
            }
            items.edit(item)?;
            println!("Updated item {}", id);
        }
        ItemAction::Delete { catalogue, id } => {
            let mut items = open_items(ctx, catalogue.as_deref())?;
            let id = CatalogueItemId::new(id);
            if !items.delete(&id)? {
                return Err(anyhow!("No item with id '{}'", id));
            }
            println!("Deleted item {}", id);
        }
        ItemAction::Toggle { catalogue, id } => {
            let mut items = open_items(ctx, catalogue.as_deref())?;
            let id = CatalogueItemId::new(id);
            let status = items
                .toggle_status(&id)?
                .ok_or_else(|| anyhow!("No item with id '{}'", id))?;
            println!("Item {} is now {}", id, status);
        }
    }
    Ok(())
}
