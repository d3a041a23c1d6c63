//! Line-based console. Reads commands from stdin, turns them into session
//! events, and prints read-only views.
//!
//! The cast animation lives here; only the completion event reaches the
//! session.

use std::io::Write as _;
use std::pin::pin;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tidewater_core::config::ShopItem;
use tidewater_core::scheduler::fishing_duration;
use tidewater_core::{CatchOutcome, RandomSource, RngSource, SessionError, SessionHandle};
use tidewater_types::{Entity, GearSlot, InventorySort, Screen};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::time;
use tracing::{info, warn};

use crate::command::{Command, HELP};
use crate::error::EngineError;

/// Run the command loop until `quit`, end of input, or ctrl-c.
pub async fn run(handle: &SessionHandle, fast: bool) -> Result<(), EngineError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut rng = RngSource::from_entropy();
    show_status(handle).await;
    println!("type `help` for commands");

    loop {
        prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => {
                println!();
                info!("interrupt received");
                break;
            }
        };
        let Some(line) = line else {
            info!("end of input");
            break;
        };
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(handle, command, fast, &mut rng).await,
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut out = std::io::stdout();
    out.write_all(b"> ")?;
    out.flush()
}

async fn execute(handle: &SessionHandle, command: Command, fast: bool, rng: &mut impl RandomSource) {
    match command {
        Command::Empty | Command::Quit => {}
        Command::Fish => cast(handle, fast, rng).await,
        Command::Auto => {
            let enabled = handle.toggle_auto_fishing().await;
            let screen = if enabled { Screen::AutoFishing } else { Screen::Menu };
            handle.set_screen(screen).await;
            println!("auto-fishing {}", if enabled { "on" } else { "off" });
        }
        Command::Save => match handle.save_now(Utc::now()).await {
            Ok(()) => println!("saved"),
            Err(e) => println!("save failed: {e}"),
        },
        Command::Sell => {
            let proceeds = handle.sell_all(Utc::now()).await;
            let money = handle.snapshot().await.money;
            println!("sold for {proceeds} coins, {money} on hand");
        }
        Command::Shop => show_shop(handle),
        Command::Buy { slot, index } => buy(handle, slot, index).await,
        Command::Inventory(sort) => show_inventory(handle, sort).await,
        Command::History(None) => show_history(handle).await,
        Command::History(Some(date)) => show_day(handle, date).await,
        Command::Status { json: false } => show_status(handle).await,
        Command::Status { json: true } => {
            let snapshot = handle.snapshot().await;
            match serde_json::to_string_pretty(&snapshot) {
                Ok(text) => println!("{text}"),
                Err(e) => warn!(error = %e, "snapshot could not be encoded"),
            }
        }
        Command::Help => println!("{HELP}"),
    }
}

/// Foreground cast: wait out the bite, animating, then resolve.
async fn cast(handle: &SessionHandle, fast: bool, rng: &mut impl RandomSource) {
    handle.start_fishing().await;
    let wait = fishing_duration(fast, &handle.context().config.schedule, rng);
    print!("casting ({}s) ", wait.as_secs());

    let mut bite = pin!(time::sleep(wait));
    let mut frames = time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            biased;
            () = &mut bite => break,
            _ = signal::ctrl_c() => {
                println!("\nreeled in early");
                handle.set_screen(Screen::Menu).await;
                return;
            }
            _ = frames.tick() => {
                print!("~");
                let _ = std::io::stdout().flush();
            }
        }
    }
    println!();

    match handle.complete_fishing(Utc::now(), rng).await {
        CatchOutcome::Caught { entity, chance } => {
            println!("{}", entity.catch_message);
            println!("  {}", describe(&entity));
            info!(entity = %entity.name, chance, "foreground catch");
        }
        CatchOutcome::Missed { chance } => {
            println!("nothing bit (rolled {chance:.1})");
        }
    }
    handle.set_screen(Screen::Menu).await;
}

fn describe(entity: &Entity) -> String {
    let tag = if entity.is_legendary {
        " [legendary]"
    } else if entity.is_trash {
        " [trash]"
    } else {
        ""
    };
    format!(
        "{}{tag}: {} lb, {} coins, {} {} from the {}",
        entity.name, entity.weight, entity.value, entity.color, entity.pattern, entity.habitat
    )
}

async fn show_status(handle: &SessionHandle) {
    let snap = handle.snapshot().await;
    let env = &snap.environment;
    println!("{} {} ({}), weather x{:.2}", env.icon, env.time_of_day, env.description, env.weather_factor);
    println!(
        "money {} | rod {} ({}) | bait {} ({})",
        snap.money, snap.rod.name, snap.rod.strength, snap.bait.name, snap.bait.strength
    );
    println!(
        "holding {} ({} lb, worth {}) | {} today | auto-fishing {}",
        snap.inventory.len(),
        snap.total_weight,
        snap.total_value,
        snap.catches_today,
        if snap.auto_fishing { "on" } else { "off" }
    );
}

fn shop_list(handle: &SessionHandle, slot: GearSlot) -> &[ShopItem] {
    let shop = &handle.context().config.shop;
    match slot {
        GearSlot::Rod => &shop.rods,
        GearSlot::Bait => &shop.baits,
    }
}

fn show_shop(handle: &SessionHandle) {
    for slot in [GearSlot::Rod, GearSlot::Bait] {
        println!("{slot}s:");
        for (number, item) in (1_usize..).zip(shop_list(handle, slot)) {
            println!("  {number}. {} (strength {}) {} coins", item.name, item.strength, item.cost);
        }
    }
}

async fn buy(handle: &SessionHandle, slot: GearSlot, index: usize) {
    let Some(item) = shop_list(handle, slot).get(index) else {
        println!("no {slot} number {}, see `shop`", index.saturating_add(1));
        return;
    };
    match handle
        .buy_gear(slot, &item.name, item.cost, item.strength, Utc::now())
        .await
    {
        Ok(()) => println!("equipped {}", item.name),
        Err(SessionError::Purchase { source }) => println!("{source}"),
        Err(e) => println!("purchase failed: {e}"),
    }
}

async fn show_inventory(handle: &SessionHandle, sort: InventorySort) {
    let rows = handle.inventory_summary(sort).await;
    if rows.is_empty() {
        println!("inventory is empty");
        return;
    }
    for row in rows {
        println!(
            "  {:>3} x {:<20} {:>6} lb {:>7} coins  (rarity {})",
            row.count, row.name, row.weight, row.value, row.rarity
        );
    }
}

async fn show_history(handle: &SessionHandle) {
    let dates = handle.history_dates().await;
    if dates.is_empty() {
        println!("no catches logged yet");
        return;
    }
    for date in dates {
        let day = handle.day_summary(date).await;
        println!(
            "  {date}: {} catches, {} coins, {} legendary, {} trash",
            day.catches, day.total_value, day.legendary, day.trash
        );
    }
}

async fn show_day(handle: &SessionHandle, date: NaiveDate) {
    let day = handle.day_summary(date).await;
    if day.catches == 0 {
        println!("nothing logged on {date}");
        return;
    }
    println!("{date}: {} catches, {} lb, {} coins", day.catches, day.total_weight, day.total_value);
    for row in day.breakdown {
        println!("  {:>3} x {}", row.count, row.name);
    }
}

/// Report catches credited for time away.
pub fn report_idle(caught: &[Entity]) {
    if caught.is_empty() {
        return;
    }
    let value: u64 = caught.iter().map(|e| u64::from(e.value)).sum();
    println!("while you were away you caught {} ({value} coins):", caught.len());
    for entity in caught {
        println!("  {}", describe(entity));
    }
}
