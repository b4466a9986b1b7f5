// This is the entry point of the Protein exercise-points bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (databases)
// - `discord/` = Discord-specific adapters (commands, presence)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Start the periodic monthly-rollover check

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::bans::BanService;
use crate::core::rollover::RolloverService;
use crate::core::scores::{PointScheme, ScoreService};
use crate::discord::commands::presence;
use crate::discord::Data;
use crate::infra::bans::SqliteBanStore;
use crate::infra::scores::SqliteScoreStore;
use chrono::Utc;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Get Discord bot token from environment
    let token = std::env::var("DISCORD_TOKEN").expect(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    );

    // Keep runtime databases in a dedicated folder so the repo root stays tidy.
    let data_dir = std::env::var("PROTEIN_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    std::fs::create_dir_all(&data_dir).expect("Failed to create data directory for SQLite files");
    let scores_db_path = format!("{}/scores.sqlite", data_dir);
    let bans_db_path = format!("{}/bans.sqlite", data_dir);

    let scheme_path =
        std::env::var("POINT_SCHEME_FILE").unwrap_or_else(|_| "pointscheme.json".to_string());

    let rollover_check_secs = std::env::var("ROLLOVER_CHECK_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1)
        .max(1);

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    tracing::info!("Preparing SQL databases");

    // A schema failure here aborts startup: the bot must never accept
    // commands against a half-created store.
    let score_store = SqliteScoreStore::new(&scores_db_path)
        .await
        .expect("Failed to initialize score database");
    let ban_store = SqliteBanStore::new(&bans_db_path)
        .await
        .expect("Failed to initialize ban database");

    // The score service and the rollover service share the ledger the same
    // way: the store clones share one connection pool.
    let score_service = Arc::new(ScoreService::new(score_store.clone()));
    let rollover_service = Arc::new(RolloverService::new(score_store));
    let ban_service = Arc::new(BanService::new(ban_store));

    // Seed the month sentinel before the bot starts taking submissions.
    rollover_service
        .ensure_sentinel(Utc::now())
        .await
        .expect("Failed to seed the monthly ledger sentinel");

    let scheme = Arc::new(PointScheme::load_or_default(&scheme_path));

    tracing::info!("SQL databases prepared");

    // Create the data structure that will be shared across all commands
    let data = Data {
        scores: Arc::clone(&score_service),
        bans: Arc::clone(&ban_service),
        scheme: Arc::clone(&scheme),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    // Configure the poise framework with our commands and settings.

    let intents = serenity::GatewayIntents::GUILDS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            // Register all our commands here
            commands: vec![
                discord::commands::scores::points(),
                discord::commands::scores::submit(),
                discord::commands::scores::leaderboard(),
                discord::commands::scores::monthly(),
                discord::commands::scores::setpoints(),
                discord::commands::bans::ban(),
                discord::commands::bans::unban(),
                discord::commands::bans::banstatus(),
                discord::commands::info::info(),
            ],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Successfully logged in as {}", ready.user.name);

                // Register slash commands globally (can take up to an hour to
                // propagate). For faster development, use register_in_guild.
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered");

                presence::on_ready(ctx);

                // Background monthly-rollover check. The tick is idempotent,
                // so a failed tick just waits for the next one.
                let rollover = Arc::clone(&rollover_service);
                tokio::spawn(async move {
                    use std::time::Duration as StdDuration;
                    use tokio::time::sleep;

                    loop {
                        if let Err(err) = rollover.run_check(Utc::now()).await {
                            tracing::warn!("Monthly rollover check failed: {}", err);
                        }

                        sleep(StdDuration::from_secs(rollover_check_secs)).await;
                    }
                });

                tracing::info!("Boot sequence complete");

                Ok(data)
            })
        })
        .build();

    // Create the client and start the bot
    tracing::info!("Logging into Discord");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
