//! Profile, notifications and profile photo.

use std::path::Path;

use recicla_client::media::{CaptureOptions, encode_photo};
use recicla_client::screens::ProfileScreen;
use recicla_core::LoadState;
use recicla_core::format::format_date;

use crate::console;
use crate::context::{CliError, Context};

/// Profile photos are square.
const PROFILE_PHOTO: CaptureOptions = CaptureOptions {
    aspect: (1, 1),
    quality: 70,
    max_dimension: 512,
};

fn screen(ctx: &Context) -> ProfileScreen {
    ProfileScreen::new(ctx.api.clone(), ctx.session.clone(), ctx.notifier.clone())
}

pub async fn whoami(ctx: &Context) -> Result<(), CliError> {
    ctx.require_user()?;
    let mut screen = screen(ctx);
    screen.refresh().await?;
    let user = ctx.require_user()?;

    console::heading(&user.name);
    console::field("Email", &user.email);
    console::field("Points", user.points);
    console::field("Reports", user.reports_submitted);
    if !user.achievements.is_empty() {
        console::field("Achievements", user.achievements.join(", "));
    }
    console::field("Photo", if user.photo.is_some() { "set" } else { "none" });

    console::blank();
    console::heading("My reports");
    match &screen.reports {
        LoadState::Ready(reports) if reports.is_empty() => console::line("No reports yet"),
        LoadState::Ready(reports) => {
            for report in reports {
                console::line(format_args!(
                    "{} {} [{}]",
                    report.timestamp.as_deref().map(format_date).unwrap_or_default(),
                    report.description,
                    report.status.as_deref().unwrap_or("pendiente")
                ));
            }
        }
        LoadState::Failed(message) => console::line(format_args!("! {message}")),
        LoadState::Idle | LoadState::Loading => {}
    }

    console::blank();
    print_notifications(&screen);
    Ok(())
}

pub async fn notifications(ctx: &Context, dismiss: Option<i64>) -> Result<(), CliError> {
    ctx.require_user()?;
    let mut screen = screen(ctx);
    screen.refresh().await?;
    if let Some(id) = dismiss {
        screen.dismiss_notification(id).await?;
    }
    print_notifications(&screen);
    Ok(())
}

fn print_notifications(screen: &ProfileScreen) {
    console::heading("Notifications");
    match &screen.notifications {
        LoadState::Ready(list) if list.is_empty() => console::line("Nothing new"),
        LoadState::Ready(list) => {
            for n in list {
                let unread = if n.read { " " } else { "*" };
                console::line(format_args!(
                    "{unread} #{} {} {}",
                    n.id,
                    format_date(&n.date),
                    n.message
                ));
            }
        }
        LoadState::Failed(message) => console::line(format_args!("! {message}")),
        LoadState::Idle | LoadState::Loading => {}
    }
}

pub async fn photo(ctx: &Context, path: &Path) -> Result<(), CliError> {
    ctx.require_user()?;
    let bytes = tokio::fs::read(path).await?;
    let payload = encode_photo(&bytes, &PROFILE_PHOTO)?;
    screen(ctx).update_photo(&payload).await?;
    Ok(())
}
