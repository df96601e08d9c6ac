use std::path::Path;

use anyhow::{anyhow, Context as _, Result};
use tracing::warn;

use riba_market_core::auth::AccountDirectory;
use riba_market_core::catalogue::SellerProfileStore;
use riba_market_core::Config;

use super::{print_json, Context};
use crate::ProfileAction;

pub fn login(ctx: &Context, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = email
        .or_else(|| ctx.config.last_email.clone())
        .ok_or_else(|| anyhow!("No email given, use --email"))?;
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password(format!("Password for {}: ", email))
            .context("Failed to read password")?,
    };

    let mut directory = AccountDirectory::new();
    let user = directory.login(&email, &password)?;
    if ctx.json {
        print_json(&serde_json::json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "userType": user.user_type,
        }))?;
    } else {
        println!("Welcome back, {} ({})", user.name, user.user_type);
    }

    // Only the email is remembered; overrides from the environment stay out of the file.
    let mut stored = Config::load().unwrap_or_default();
    stored.last_email = Some(email);
    if let Err(e) = stored.save() {
        warn!(error = %e, "Failed to save config");
    }
    Ok(())
}

pub fn profile(ctx: &Context, action: Option<ProfileAction>) -> Result<()> {
    let mut store = SellerProfileStore::open(ctx.cache.clone());

    match action {
        None => {}
        Some(ProfileAction::Set {
            business_name,
            description,
            email,
            phone,
            maps_link,
        }) => {
            let mut profile = store.profile().clone();
            if let Some(v) = business_name {
                profile.business_name = v;
            }
            if let Some(v) = description {
                profile.description = v;
            }
            if let Some(v) = email {
                profile.email = v;
            }
            if let Some(v) = phone {
                profile.phone = v;
            }
            if let Some(v) = maps_link {
                profile.google_maps_link = v;
            }
            store.save(profile)?;
        }
        Some(ProfileAction::Logo { path }) => set_logo(&mut store, &path)?,
    }

    let profile = store.profile();
    if ctx.json {
        return print_json(profile);
    }
    println!("{}", profile.business_name);
    println!("{}", profile.description);
    println!("Email: {}  Phone: {}", profile.email, profile.phone);
    if let Some(ref logo) = profile.logo_url {
        println!("Logo: {}", logo);
    }
    Ok(())
}

fn set_logo(store: &mut SellerProfileStore, path: &Path) -> Result<()> {
    let path = path
        .canonicalize()
        .with_context(|| format!("Failed to find {}", path.display()))?;
    let size = std::fs::metadata(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    store.set_logo(size, format!("file://{}", path.display()))?;
    Ok(())
}
