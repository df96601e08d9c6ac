use anyhow::{bail, Result};

use riba_market_core::catalogue::{public_view, ItemQuery, ItemSort};
use riba_market_core::models::{CatalogueDraft, Customization};
use riba_market_core::utils::{format_date, truncate_string};

use super::{print_json, resolve_catalogue, Context};
use crate::CatalogueAction;

const NAME_WIDTH: usize = 28;

pub fn run(action: CatalogueAction, ctx: &Context) -> Result<()> {
    let mut catalogues = ctx.catalogues();

    match action {
        CatalogueAction::List { search } => {
            let found = catalogues.search(search.as_deref().unwrap_or(""));
            if ctx.json {
                return print_json(&found);
            }
            if found.is_empty() {
                println!("No catalogues yet. Create one with `riba-market catalogue create`.");
                return Ok(());
            }
            for c in found {
                let stats = catalogues.stats(&c.id);
                println!(
                    "{}  {:<width$}  {:<14}  {:>3} items ({} published)  {}{}",
                    c.id,
                    truncate_string(&c.name, NAME_WIDTH),
                    c.category.label(),
                    stats.total,
                    stats.published,
                    format_date(&c.created_at),
                    if c.is_visible() { "" } else { "  [hidden]" },
                    width = NAME_WIDTH,
                );
            }
        }
        CatalogueAction::Create {
            name,
            category,
            description,
        } => {
            let created = catalogues.create(CatalogueDraft::new(name, category).with_description(description))?;
            if ctx.json {
                return print_json(&created);
            }
            println!("Created catalogue {} ({})", created.name, created.id);
        }
        CatalogueAction::Edit {
            id,
            name,
            category,
            description,
        } => {
            let id = resolve_catalogue(&catalogues, &id)?;
            catalogues.edit(&id, CatalogueDraft::new(name, category).with_description(description))?;
            println!("Updated catalogue {}", id);
        }
        CatalogueAction::Customize {
            id,
            banner,
            accent,
            welcome,
        } => {
            let id = resolve_catalogue(&catalogues, &id)?;
            catalogues.customize(
                &id,
                Customization {
                    banner_color: banner,
                    accent_color: accent,
                    welcome_message: welcome,
                    is_public: None,
                },
            )?;
            println!("Customized catalogue {}", id);
        }
        CatalogueAction::Duplicate { id } => {
            let id = resolve_catalogue(&catalogues, &id)?;
            match catalogues.duplicate(&id)? {
                Some(copy) => println!("Created {} ({})", copy.name, copy.id),
                None => bail!("Catalogue {} disappeared", id),
            }
        }
        CatalogueAction::Delete { id } => {
            let id = resolve_catalogue(&catalogues, &id)?;
            catalogues.delete(&id)?;
            println!("Deleted catalogue {}", id);
        }
        CatalogueAction::ToggleVisibility { id } => {
            let id = resolve_catalogue(&catalogues, &id)?;
            if let Some(visible) = catalogues.toggle_visibility(&id)? {
                println!("Catalogue {} is now {}", id, if visible { "public" } else { "hidden" });
            }
        }
        CatalogueAction::Share { id } => {
            let id = resolve_catalogue(&catalogues, &id)?;
            if let Some(link) = catalogues.share_link(&id, ctx.config.share_base_url()) {
                println!("{}", link);
            }
        }
        CatalogueAction::Stats { id } => {
            let rows: Vec<_> = match id {
                Some(id) => {
                    let id = resolve_catalogue(&catalogues, &id)?;
                    catalogues
                        .all_stats()
                        .into_iter()
                        .filter(|(c, _)| c.id == id)
                        .collect()
                }
                None => catalogues.all_stats(),
            };
            if ctx.json {
                let rows: Vec<_> = rows
                    .iter()
                    .map(|(c, s)| serde_json::json!({ "id": c.id, "name": c.name, "stats": s }))
                    .collect();
                return print_json(&rows);
            }
            for (c, s) in rows {
                println!(
                    "{:<width$}  total {:>3}  published {:>3}  draft {:>3}",
                    truncate_string(&c.name, NAME_WIDTH),
                    s.total,
                    s.published,
                    s.draft,
                    width = NAME_WIDTH,
                );
            }
        }
    }
    Ok(())
}

pub fn public(ctx: &Context, id: &str, search: String, sort: ItemSort) -> Result<()> {
    let catalogues = ctx.catalogues();
    let id = resolve_catalogue(&catalogues, id)?;
    let view = public_view(&catalogues, &id, &ItemQuery::new(search, sort))?;
    if ctx.json {
        return print_json(&view);
    }

    println!("{}  ({})", view.catalogue.name, view.catalogue.category);
    println!("by {}", view.seller.business_name);
    if let Some(ref welcome) = view.catalogue.welcome_message {
        println!("{}", welcome);
    }
    println!();
    if view.items.is_empty() {
        println!("No items found ({} published)", view.published_count);
    }
    for item in &view.items {
        println!("{:<width$}  {:>12}", truncate_string(&item.name, NAME_WIDTH), item.price, width = NAME_WIDTH);
    }
    Ok(())
}
