use anyhow::Result;
use std::io::Write;

use crate::api::client::Publisher;
use crate::api::models::User;
use crate::commands::Context;

pub async fn run(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let client = ctx.connect()?;
    show_user(&client, out).await?;
    Ok(())
}

pub async fn show_user<P: Publisher>(publisher: &P, out: &mut dyn Write) -> Result<User> {
    let user = publisher.current_user().await?;

    writeln!(out, "User ID: {}", user.id)?;
    writeln!(out, "Username: {}", user.username)?;
    writeln!(out, "Name: {}", user.name)?;
    writeln!(out, "Profile URL: {}", user.url)?;

    Ok(user)
}
