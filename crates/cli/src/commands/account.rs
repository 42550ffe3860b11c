//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! recicla register -n "Ana Torres" -e ana@mail.pe -p secreto123 --lat -11.87 --lon -77.13
//! recicla login -e ana@mail.pe -p secreto123
//! recicla logout
//! ```

use recicla_core::RegistrationForm;
use secrecy::{ExposeSecret, SecretString};

use super::coordinates;
use crate::console;
use crate::context::{CliError, Context};

pub async fn register(
    ctx: &Context,
    name: String,
    email: String,
    password: &SecretString,
    confirmation: &SecretString,
    home: Option<(f64, f64)>,
) -> Result<(), CliError> {
    let form = RegistrationForm {
        name,
        email,
        password: password.expose_secret().to_owned(),
        confirmation: confirmation.expose_secret().to_owned(),
        coordinates: coordinates(home)?,
    };
    let user = ctx.accounts().register(&form).await?;
    tracing::info!(user_id = %user.id, "Registered");
    console::line(format_args!("Signed in as {} <{}>", user.name, user.email));
    Ok(())
}

pub async fn login(ctx: &Context, email: &str, password: &SecretString) -> Result<(), CliError> {
    let user = ctx.accounts().login(email, password.expose_secret()).await?;
    tracing::info!(user_id = %user.id, "Signed in");
    console::line(format_args!(
        "Welcome back, {}. You have {} points.",
        user.name, user.points
    ));
    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.accounts().logout().await?;
    console::line("Signed out");
    Ok(())
}
