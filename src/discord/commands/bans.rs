// Submission-ban slash commands.
//
// These manage the bot's own ban list (who may submit scores); they never
// touch Discord's guild bans.

use crate::discord::{Data, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;

type Context<'a> = poise::Context<'a, Data, Error>;

/// Ban a user from submitting exercise scores.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "User to ban from submitting"] user: serenity::User,
) -> Result<(), Error> {
    let user_id = user.id.get().to_string();

    ctx.data().bans.ban(&user_id, Utc::now()).await?;

    tracing::info!(user_id = %user_id, "User banned from submitting scores");

    ctx.say(format!(
        "🚫 **{}** is now banned from submitting scores.",
        user.name
    ))
    .await?;

    Ok(())
}

/// Lift a user's submission ban.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "User to unban"] user: serenity::User,
) -> Result<(), Error> {
    let user_id = user.id.get().to_string();

    let was_banned = ctx.data().bans.unban(&user_id).await?;

    if was_banned {
        tracing::info!(user_id = %user_id, "Submission ban lifted");
        ctx.say(format!("✅ **{}** may submit scores again.", user.name))
            .await?;
    } else {
        ctx.say(format!("**{}** wasn't banned.", user.name)).await?;
    }

    Ok(())
}

/// Check whether a user is banned from submitting.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn banstatus(
    ctx: Context<'_>,
    #[description = "User to check"] user: serenity::User,
) -> Result<(), Error> {
    let user_id = user.id.get().to_string();

    match ctx.data().bans.check_ban(&user_id).await? {
        Some(record) => {
            ctx.say(format!(
                "🚫 **{}** has been banned from submitting since {}.",
                user.name,
                record.ban_date.format("%Y-%m-%d %H:%M UTC")
            ))
            .await?;
        }
        None => {
            ctx.say(format!("✅ **{}** is not banned.", user.name))
                .await?;
        }
    }

    Ok(())
}
