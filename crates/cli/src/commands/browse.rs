//! Read-mostly listings: news, education, incentives, map and ranking.

use recicla_client::screens::{EducationScreen, HomeScreen, IncentivesScreen, MapScreen};
use recicla_core::filter::CategoryFilter;
use recicla_core::format::format_date;
use recicla_core::{IncentiveId, LoadState};

use crate::console;
use crate::context::{CliError, Context};

/// Print a failed list's message in place of its rows.
fn rows<'a, T>(state: &'a LoadState<Vec<T>>, empty: &str) -> Option<Vec<&'a T>> {
    match state {
        LoadState::Ready(items) if items.is_empty() => {
            console::line(empty);
            None
        }
        LoadState::Ready(items) => Some(items.iter().collect()),
        LoadState::Failed(message) => {
            console::line(format_args!("! {message}"));
            None
        }
        LoadState::Idle | LoadState::Loading => None,
    }
}

pub async fn news(ctx: &Context) -> Result<(), CliError> {
    let mut screen = HomeScreen::new(ctx.api.clone(), ctx.session.clone());
    screen.load().await;

    if let Some(user) = screen.user() {
        console::line(format_args!("Hola, {}! You have {} points.", user.name, user.points));
        console::blank();
    }
    console::heading("News");
    for item in rows(&screen.news, "No news yet").unwrap_or_default() {
        console::line(format_args!(
            "{} [{}] {}",
            format_date(&item.date),
            item.category,
            item.title
        ));
        console::line(format_args!("    {}", item.content));
    }
    Ok(())
}

pub async fn ranking(ctx: &Context) -> Result<(), CliError> {
    let mut screen = HomeScreen::new(ctx.api.clone(), ctx.session.clone());
    screen.load().await;

    console::heading("Ranking");
    for entry in rows(&screen.ranking, "Nobody has points yet").unwrap_or_default() {
        console::line(format_args!(
            "{:>3}. {:<30} {:>6} pts",
            entry.position, entry.name, entry.points
        ));
    }
    Ok(())
}

pub async fn education(
    ctx: &Context,
    category: CategoryFilter,
    search: Option<String>,
) -> Result<(), CliError> {
    let mut screen = EducationScreen::new(ctx.api.clone());
    screen.load().await;
    screen.set_category(category);
    if let Some(search) = search {
        screen.set_search(search);
    }

    if let Some(message) = screen.items.error() {
        console::line(format_args!("! {message}"));
        return Ok(());
    }
    console::heading("Learn");
    console::field("Categories", screen.categories().join(", "));
    let visible = screen.visible();
    if visible.is_empty() {
        console::line("Nothing matches");
    }
    for item in visible {
        console::line(format_args!("#{} {} ({})", item.id, item.title, item.category));
        console::line(format_args!("    {}", item.content));
        if let Some(url) = &item.url {
            console::line(format_args!("    {url}"));
        }
    }
    Ok(())
}

pub async fn incentives(ctx: &Context, category: CategoryFilter) -> Result<(), CliError> {
    let mut screen =
        IncentivesScreen::new(ctx.api.clone(), ctx.session.clone(), ctx.notifier.clone());
    screen.load().await;
    screen.set_category(category);

    if let Some(message) = screen.items.error() {
        console::line(format_args!("! {message}"));
        return Ok(());
    }
    if let Some(balance) = screen.balance() {
        console::field("Your points", balance);
    }
    console::heading("Incentives");
    for incentive in screen.visible() {
        let marker = match screen.balance() {
            Some(balance) if balance.covers(incentive.points_required) => "*",
            _ => " ",
        };
        console::line(format_args!(
            "{marker} [{}] {:<32} {:>5} pts  {}",
            incentive.id, incentive.name, incentive.points_required, incentive.category
        ));
    }
    Ok(())
}

pub async fn redeem(ctx: &Context, id: &str) -> Result<(), CliError> {
    ctx.require_user()?;
    let mut screen =
        IncentivesScreen::new(ctx.api.clone(), ctx.session.clone(), ctx.notifier.clone());
    screen.load().await;

    let redemption = screen.redeem(&IncentiveId::new(id)).await?;
    if let Some(at) = &redemption.redeemed_at {
        console::field("Redeemed on", format_date(at));
    }
    if let Some(balance) = screen.balance() {
        console::field("Your points", balance);
    }
    Ok(())
}

pub async fn map(ctx: &Context) -> Result<(), CliError> {
    let mut screen = MapScreen::new(ctx.api.clone());
    screen.load().await;

    console::heading("Map");
    if let Some(message) = screen.map.error() {
        console::line(format_args!("! {message}"));
    }
    for marker in screen.markers() {
        console::line(format_args!(
            "({:.4}, {:.4}) {} - {} {}",
            marker.coordinates.latitude,
            marker.coordinates.longitude,
            marker.title,
            marker.submitter,
            marker.subtitle
        ));
    }

    console::blank();
    console::heading("Community reports");
    for report in rows(&screen.feed, "No public reports yet").unwrap_or_default() {
        console::line(format_args!(
            "{} - {} ({})",
            report.description,
            report.submitter_or_anonymous(),
            report.timestamp.as_deref().map(format_date).unwrap_or_default()
        ));
    }
    Ok(())
}
