use std::{env, path::Path, path::PathBuf, rc::Rc, time::Duration};

use chrono::Local;
use futures_channel::mpsc::UnboundedReceiver;
use futures_timer::Delay;
use futures_util::{future, pin_mut};
use log::{info, warn};
use smart_ladder::{
    config::GameConfig,
    error::{LadderError, LadderResult},
    handlers::{
        achievements::AchievementTracker,
        daily_quests::DailyQuestTracker,
        economy_hooks::EconomyHooks,
        inventory::Inventory,
        progress_store::ProgressStore,
        question_pool::{PackSource, QuestionPool},
        quiz_session::{QuizSession, SessionState},
        scheduler::SystemClock,
        shop::Shop,
        store::{KeyValueStore, SqliteStore},
        wallet::CoinWallet,
    },
    helpers::{describe_event, parse_command, render_question},
    loggers::file_logger::init_file_logger,
    models::{
        commands::PlayerCommand,
        economy::{default_achievements, default_quests},
        events::QuizEvent,
        shop::{default_shop_items, Purchase},
    },
};
use tokio::io::{AsyncBufReadExt, BufReader};

const TICK: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> LadderResult<()> {
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "smart_ladder.json".to_string());
    let config = GameConfig::load(Path::new(&config_path))?;

    init_file_logger(&config.log_dir, config.level_filter())?;
    info!("App started! Difficulty: {}", config.difficulty);

    let store: Rc<dyn KeyValueStore> = Rc::new(SqliteStore::open(Path::new(&config.db_path))?);

    let source = match &config.question_pack {
        Some(path) => PackSource::File(PathBuf::from(path)),
        None => PackSource::Builtin,
    };
    let mut session = QuizSession::new(
        config.difficulty,
        config.session_options(),
        Box::new(QuestionPool::new(source)),
        ProgressStore::new(store.clone()),
        Rc::new(SystemClock::new()),
    );
    session.init();

    let mut screen_events = session.subscribe();
    let mut economy_events = session.subscribe();

    let wallet = CoinWallet::load(store.clone())?;
    let achievements = AchievementTracker::load(store.clone(), default_achievements());
    let mut quests = DailyQuestTracker::load(store.clone(), default_quests(), config.quests_per_day);
    quests.refresh(Local::now().date_naive())?;
    let mut hooks = EconomyHooks::new(wallet, achievements, quests);
    hooks.report("login")?;
    let shop = Shop::new(default_shop_items());
    let mut inventory = Inventory::load(store);

    println!(
        "Smart Ladder ({}) - level {}, wallet {} coins.",
        session.difficulty(),
        session.level(),
        hooks.wallet.coins()
    );
    println!("Commands: s start, 1-3 answer, n next, r reset, c clear, claim, ? status, q quit");
    println!("Shop: shop, buy <item>, equip <item>, sell <item>");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let next_line = lines.next_line();
        let timer = Delay::new(TICK);
        pin_mut!(next_line, timer);

        match future::select(next_line, timer).await {
            future::Either::Left((Ok(Some(line)), _)) => match parse_command(&line) {
                Ok(PlayerCommand::Quit) => break,
                Ok(command) => {
                    execute_command(command, &mut session, &mut hooks, &shop, &mut inventory)?
                }
                Err(err) => println!("{}", err),
            },
            future::Either::Left((Ok(None), _)) => break,
            future::Either::Left((Err(err), _)) => {
                warn!("Input error: {}", err);
                break;
            }
            future::Either::Right(_) => session.tick(),
        }

        hooks.drain(&mut economy_events);
        print_events(&session, &mut screen_events);
    }

    info!("App stopped with {} wallet coins", hooks.wallet.coins());
    Ok(())
}

fn execute_command(
    command: PlayerCommand,
    session: &mut QuizSession,
    hooks: &mut EconomyHooks,
    shop: &Shop,
    inventory: &mut Inventory,
) -> LadderResult<()> {
    match command {
        PlayerCommand::Start => {
            if session.state() == SessionState::Completed {
                session.reset_run();
            }
            if session.state() == SessionState::AwaitingAdvance {
                println!("Press n to continue.");
            }
            session.show_next_question();
        }
        PlayerCommand::Answer { choice } => {
            if session.on_option_selected(choice).is_none() {
                println!("Not waiting for an answer right now.");
            }
        }
        PlayerCommand::Continue => {
            session.continue_to_next();
        }
        PlayerCommand::ResetRun => {
            session.reset_run();
            println!("Run reset. Press s to start.");
        }
        PlayerCommand::ClearProgress => {
            session.progress().clear_difficulty(session.difficulty())?;
            session.reset_run();
            println!("Progress cleared for {}.", session.difficulty());
        }
        PlayerCommand::ClaimAll => {
            let quest_ids: Vec<String> = hooks
                .quests
                .entries()
                .iter()
                .map(|entry| entry.quest_id.clone())
                .collect();
            for quest_id in quest_ids {
                if hooks.quests.claim(&quest_id, &mut hooks.wallet)? {
                    println!("Claimed quest {}", quest_id);
                }
            }
            let achievement_ids: Vec<String> = hooks
                .achievements
                .defs()
                .iter()
                .map(|def| def.id.clone())
                .collect();
            for id in achievement_ids {
                if hooks.achievements.claim(&id, &mut hooks.wallet)? {
                    println!("Claimed achievement {}", id);
                }
            }
        }
        PlayerCommand::Shop => {
            for item in shop.items() {
                let tag = if inventory.equipped() == Some(item.id.as_str()) {
                    " (equipped)"
                } else if inventory.is_owned(&item.id) {
                    " (owned)"
                } else {
                    ""
                };
                println!("  {} - {} coins{}", item.id, item.coin_cost, tag);
            }
        }
        PlayerCommand::Buy { item_id } => {
            match shop.buy(&item_id, &mut hooks.wallet, inventory) {
                Ok(Purchase::Bought) => println!("Bought {}.", item_id),
                Ok(Purchase::AlreadyOwned) => println!("You already own {}.", item_id),
                Ok(Purchase::UnknownItem) => println!("No item called {}.", item_id),
                Ok(Purchase::NotForCoins) => println!("{} cannot be bought with coins.", item_id),
                Err(LadderError::InsufficientCoins { needed, available }) => {
                    println!("{} costs {} coins, you have {}.", item_id, needed, available)
                }
                Err(err) => return Err(err),
            }
        }
        PlayerCommand::Equip { item_id } => {
            if inventory.equip(&item_id)? {
                println!("Equipped {}.", item_id);
            } else {
                println!("You do not own {}.", item_id);
            }
        }
        PlayerCommand::Sell { item_id } => {
            if shop.sell(&item_id, &mut hooks.wallet, inventory)? {
                println!("Sold {}.", item_id);
            } else {
                println!("Cannot sell {}.", item_id);
            }
        }
        PlayerCommand::Status => {
            println!(
                "Level {} | run coins {} | correct {}/{} | wrong streak {} | wallet {}",
                session.level(),
                session.coins(),
                session.correct_count(),
                session.target_correct(),
                session.wrong_streak(),
                hooks.wallet.coins()
            );
            for entry in hooks.quests.entries() {
                println!(
                    "  quest {}: {}/{}{}",
                    entry.quest_id,
                    entry.current,
                    entry.target,
                    if entry.is_claimed { " (claimed)" } else { "" }
                );
            }
        }
        PlayerCommand::Quit => {}
    }
    Ok(())
}

fn print_events(session: &QuizSession, events: &mut UnboundedReceiver<QuizEvent>) {
    while let Ok(Some(event)) = events.try_next() {
        if let QuizEvent::QuestionShown { level, .. } = event {
            if let Some(question) = session.current_question() {
                print!("{}", render_question(question, level));
            }
            continue;
        }
        if let Some(text) = describe_event(&event) {
            println!("{}", text);
        }
    }
}
