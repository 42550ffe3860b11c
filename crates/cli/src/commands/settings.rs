//! Display settings.

use recicla_client::SettingsStore;
use recicla_core::DisplaySettings;

use crate::console;
use crate::context::{CliError, Context};

fn print(settings: &DisplaySettings) {
    console::field("Theme", settings.theme.as_str());
    console::field(
        "Animation",
        if settings.background_animation { "on" } else { "off" },
    );
    console::field("Accent", settings.palette().accent);
}

pub async fn show(ctx: &Context) -> Result<(), CliError> {
    let store = SettingsStore::init(ctx.storage.clone()).await?;
    print(&store.current());
    Ok(())
}

pub async fn toggle_theme(ctx: &Context) -> Result<(), CliError> {
    let store = SettingsStore::init(ctx.storage.clone()).await?;
    store.toggle_theme().await?;
    print(&store.current());
    Ok(())
}

pub async fn toggle_animation(ctx: &Context) -> Result<(), CliError> {
    let store = SettingsStore::init(ctx.storage.clone()).await?;
    store.toggle_background_animation().await?;
    print(&store.current());
    Ok(())
}
