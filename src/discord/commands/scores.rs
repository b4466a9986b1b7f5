// Discord commands for the exercise point ledger.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response based on the result
//
// This layer is THIN - no business logic, just translation.

use crate::core::bans::BanService;
use crate::core::scores::{PointScheme, ScoreService};
use crate::infra::bans::SqliteBanStore;
use crate::infra::scores::SqliteScoreStore;
use chrono::Utc;
use poise::serenity_prelude as serenity;

/// Show a user's exercise points.
#[poise::command(slash_command, guild_only)]
pub async fn points(
    ctx: Context<'_>,
    #[description = "User to check (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target_user = user.as_ref().unwrap_or_else(|| ctx.author());
    if target_user.bot {
        ctx.say("Bots don't lift! 🤖").await?;
        return Ok(());
    }

    let user_id = target_user.id.get().to_string();
    let (overall, monthly) = ctx.data().scores.get_user_scores(&user_id).await?;

    let Some(overall) = overall else {
        ctx.say(format!(
            "**{}** hasn't scored any points yet. Use `/submit` to get started! 💪",
            target_user.name
        ))
        .await?;
        return Ok(());
    };

    let monthly_points = monthly.map(|r| r.points).unwrap_or(0);

    let embed = serenity::CreateEmbed::new()
        .title(format!("Points for {}", target_user.name))
        .color(0x00ff00)
        .thumbnail(target_user.face())
        .field("All-time", format!("**{}**", overall.points), true)
        .field("This month", format!("**{}**", monthly_points), true)
        .field(
            "Last submission",
            overall.last_submit.format("%Y-%m-%d %H:%M UTC").to_string(),
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Submit an exercise to earn points.
#[poise::command(slash_command, guild_only)]
pub async fn submit(
    ctx: Context<'_>,
    #[description = "Exercise performed"] exercise: String,
    #[description = "Number of reps"]
    #[min = 1]
    reps: u32,
) -> Result<(), Error> {
    let user_id = ctx.author().id.get().to_string();

    if ctx.data().bans.is_banned(&user_id).await? {
        ctx.say("🚫 You are banned from submitting scores.").await?;
        return Ok(());
    }

    let Some(per_rep) = ctx.data().scheme.points_for(&exercise) else {
        let known = ctx
            .data()
            .scheme
            .entries()
            .iter()
            .map(|(name, _)| format!("`{}`", name))
            .collect::<Vec<_>>()
            .join(", ");
        ctx.say(format!(
            "I don't know the exercise **{}**. Try one of: {}",
            exercise, known
        ))
        .await?;
        return Ok(());
    };

    let amount = per_rep.saturating_mul(reps as i64);
    let outcome = ctx
        .data()
        .scores
        .award_points(&user_id, amount, Utc::now())
        .await?;

    tracing::info!(
        user_id = %user_id,
        exercise = %exercise,
        reps,
        earned = outcome.earned,
        "Points awarded"
    );

    let embed = serenity::CreateEmbed::new()
        .title("Submission recorded! 💪")
        .color(0x00ff00)
        .description(format!(
            "{} x **{}** earned you **{}** points.",
            reps,
            exercise.trim().to_lowercase(),
            outcome.earned
        ))
        .field("All-time total", format!("{}", outcome.overall_total), true)
        .field("This month", format!("{}", outcome.monthly_total), true);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Show the all-time points leaderboard.
#[poise::command(slash_command, guild_only)]
pub async fn leaderboard(
    ctx: Context<'_>,
    #[description = "Page number (default: 1)"]
    #[min = 1]
    page: Option<usize>,
) -> Result<(), Error> {
    let records = ctx.data().scores.overall_leaderboard(100).await?;

    if records.is_empty() {
        ctx.say("No one has scored any points yet. Be the first with `/submit`! 💪")
            .await?;
        return Ok(());
    }

    let per_page = 10;
    let total_pages = (records.len() + per_page - 1) / per_page;
    let current_page = page.unwrap_or(1).clamp(1, total_pages);
    let offset = (current_page - 1) * per_page;

    let mut description = String::new();
    for (index, record) in records.iter().skip(offset).take(per_page).enumerate() {
        let rank = offset + index + 1;
        description.push_str(&format!(
            "{} **#{}** {} — {} points\n",
            rank_medal(rank),
            rank,
            mention(&record.user_id),
            record.points
        ));
    }

    let embed = serenity::CreateEmbed::new()
        .title("🏆 All-time leaderboard")
        .color(0xdaa520)
        .description(description)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Page {}/{}",
            current_page, total_pages
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Show this month's points leaderboard.
#[poise::command(slash_command, guild_only)]
pub async fn monthly(ctx: Context<'_>) -> Result<(), Error> {
    let records = ctx.data().scores.monthly_leaderboard(10).await?;

    if records.is_empty() {
        ctx.say("No one has scored any points this month yet. 🗓️")
            .await?;
        return Ok(());
    }

    let mut description = String::new();
    for (index, record) in records.iter().enumerate() {
        let rank = index + 1;
        description.push_str(&format!(
            "{} **#{}** {} — {} points\n",
            rank_medal(rank),
            rank,
            mention(&record.user_id),
            record.points
        ));
    }

    let embed = serenity::CreateEmbed::new()
        .title(format!("🗓️ Leaderboard for {}", Utc::now().format("%B")))
        .color(0x008080)
        .description(description);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Overwrite a user's all-time points (admin correction).
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn setpoints(
    ctx: Context<'_>,
    #[description = "User to modify"] user: serenity::User,
    #[description = "New all-time total"] points: i64,
) -> Result<(), Error> {
    let user_id = user.id.get().to_string();

    ctx.data()
        .scores
        .set_points(&user_id, points, Utc::now())
        .await?;

    tracing::info!(user_id = %user_id, points, "All-time total overwritten by admin");

    ctx.say(format!(
        "✅ Set {}'s all-time total to **{}** points.",
        user.name, points
    ))
    .await?;

    Ok(())
}

/// Medal emoji for the top three ranks.
fn rank_medal(rank: usize) -> &'static str {
    match rank {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        _ => "▫️",
    }
}

/// Render a stored user id as a Discord mention.
fn mention(user_id: &str) -> String {
    format!("<@{}>", user_id)
}

/// Type aliases for our bot's context.
/// This is what every command receives as its first parameter.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
/// This is where we store our services and configuration.
use std::sync::Arc;

pub struct Data {
    pub scores: Arc<ScoreService<SqliteScoreStore>>,
    pub bans: Arc<BanService<SqliteBanStore>>,
    pub scheme: Arc<PointScheme>,
}
