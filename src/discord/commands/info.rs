// Bot info command: what the bot does and how exercises are scored.

use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

type Context<'a> = poise::Context<'a, Data, Error>;

/// Show what the bot does and the current point scheme.
#[poise::command(slash_command)]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let scheme_lines = ctx
        .data()
        .scheme
        .entries()
        .iter()
        .map(|(name, points)| {
            let unit = if *points == 1 { "point" } else { "points" };
            format!("`{}` — {} {} per rep", name, points, unit)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title("🏋️ Protein")
        .color(0x00ff00)
        .description(
            "I keep a tally of exercise points with all-time and monthly \
             leaderboards. Submit your reps with `/submit`; the monthly \
             board resets itself when the calendar flips.",
        )
        .field("Point scheme", scheme_lines, false)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Protein v{}",
            env!("CARGO_PKG_VERSION")
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
