//! Round trips through the save directory: persist a session, load it back,
//! and check what survives.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use tidewater_core::{Catalog, GameConfig, GameContext, RngSource, ScriptedRandom, SessionHandle};
use tidewater_store::{GameSave, PlayerRecord, SaveStore};
use tidewater_types::{Gear, GearSlot, InventorySort};
use uuid::Uuid;

// =============================================================================
// Helpers
// =============================================================================

struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("tidewater-core-{}", Uuid::now_v7())))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn context(dir: &ScratchDir) -> Arc<GameContext> {
    let ctx = GameContext::new(GameConfig::default(), Catalog::standard(), SaveStore::new(&dir.0))
        .unwrap()
        .with_utc_offset(FixedOffset::east_opt(0).unwrap());
    Arc::new(ctx)
}

fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, day, hour, min, 0).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn progress_survives_a_restart() {
    let dir = ScratchDir::new();
    let catalog = Catalog::standard();
    let drawn_weather;
    {
        let handle = SessionHandle::load(context(&dir), at(18, 9, 0));
        drawn_weather = handle.refresh_weather(&mut RngSource::seeded(7)).await;
        handle.record_catch(catalog.find("Minnow").unwrap().clone(), at(18, 9, 1)).await;
        handle.record_catch(catalog.find("Old Boot").unwrap().clone(), at(18, 9, 2)).await;
        handle.record_catch(catalog.find("Minnow").unwrap().clone(), at(18, 9, 3)).await;
        handle.buy_gear(GearSlot::Bait, "Cricket", 15, 2, at(18, 9, 4)).await.unwrap();
        handle.toggle_auto_fishing().await;
        handle.save_now(at(18, 9, 5)).await.unwrap();
    }

    let handle = SessionHandle::load(context(&dir), at(18, 9, 6));
    let snap = handle.snapshot().await;
    assert_eq!(snap.money, 35);
    assert_eq!(snap.bait, Gear::new("Cricket", 2));
    assert!(snap.auto_fishing);
    assert_eq!(snap.environment.weather_factor.to_bits(), drawn_weather.to_bits());
    assert_eq!(snap.last_active, at(18, 9, 0));
    let names: Vec<&str> = snap.inventory.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Minnow", "Old Boot", "Minnow"]);
    let expected_value: u64 = snap.inventory.iter().map(|e| u64::from(e.value)).sum();
    let expected_weight: u64 = snap.inventory.iter().map(|e| u64::from(e.weight)).sum();
    assert_eq!(snap.total_value, expected_value);
    assert_eq!(snap.total_weight, expected_weight);
    assert_eq!(snap.catches_today, 3);

    let grouped = handle.inventory_summary(InventorySort::Quantity).await;
    assert_eq!(grouped[0].name, "Minnow");
    assert_eq!(grouped[0].count, 2);
}

#[tokio::test]
async fn empty_inventory_round_trips() {
    let dir = ScratchDir::new();
    SessionHandle::load(context(&dir), at(18, 10, 0))
        .save_now(at(18, 10, 0))
        .await
        .unwrap();

    let snap = SessionHandle::load(context(&dir), at(18, 10, 1)).snapshot().await;
    assert!(snap.inventory.is_empty());
    assert_eq!(snap.total_value, 0);
    assert_eq!(snap.money, 50);
}

#[tokio::test]
async fn history_is_split_by_day() {
    let dir = ScratchDir::new();
    let catalog = Catalog::standard();
    {
        let handle = SessionHandle::load(context(&dir), at(17, 22, 0));
        handle.record_catch(catalog.find("Catfish").unwrap().clone(), at(17, 23, 0)).await;
        handle.save_now(at(17, 23, 1)).await.unwrap();
        handle.sell_all(at(17, 23, 2)).await;
        handle.record_catch(catalog.find("Carp").unwrap().clone(), at(18, 0, 30)).await;
        handle.record_catch(catalog.find("Carp").unwrap().clone(), at(18, 0, 31)).await;
        handle.save_now(at(18, 0, 32)).await.unwrap();
    }
    let store = SaveStore::new(&dir.0);
    assert!(store.day_path(at(17, 0, 0).date_naive()).exists());
    assert!(store.day_path(at(18, 0, 0).date_naive()).exists());

    let handle = SessionHandle::load(context(&dir), at(18, 1, 0));
    let dates = handle.history_dates().await;
    assert_eq!(dates, vec![at(17, 0, 0).date_naive(), at(18, 0, 0).date_naive()]);
    assert_eq!(handle.day_summary(dates[0]).await.catches, 1);
    assert_eq!(handle.catches_on(dates[1]).await.len(), 2);
    // The sale emptied the inventory but not the log.
    assert_eq!(handle.snapshot().await.inventory.len(), 2);
}

#[tokio::test]
async fn stored_weather_is_clamped_on_load() {
    let dir = ScratchDir::new();
    let store = SaveStore::new(&dir.0);
    store
        .write_game(&GameSave {
            player: PlayerRecord {
                money: 7,
                rod: Gear::new("Basic Rod", 1),
                bait: Gear::new("Worm", 1),
                inventory: Vec::new(),
            },
            weather_factor: 5.0,
            last_active_time: at(18, 8, 0),
            auto_fishing: false,
            save_time: at(18, 8, 0),
        })
        .unwrap();

    let snap = SessionHandle::load(context(&dir), at(18, 9, 0)).snapshot().await;
    assert_eq!(snap.money, 7);
    assert!((snap.environment.weather_factor - 1.3).abs() < 1e-9);
}

#[tokio::test]
async fn corrupt_save_starts_fresh_but_keeps_history() {
    let dir = ScratchDir::new();
    let catalog = Catalog::standard();
    {
        let handle = SessionHandle::load(context(&dir), at(18, 9, 0));
        handle.record_catch(catalog.find("Trout").unwrap().clone(), at(18, 9, 1)).await;
        handle.save_now(at(18, 9, 2)).await.unwrap();
    }
    let store = SaveStore::new(&dir.0);
    fs::write(store.game_path(), b"{ not json").unwrap();

    let handle = SessionHandle::load(context(&dir), at(18, 9, 3));
    let snap = handle.snapshot().await;
    assert_eq!(snap.money, 50);
    assert!(snap.inventory.is_empty());
    assert_eq!(handle.history_dates().await.len(), 1);
}

#[tokio::test]
async fn time_away_is_credited_after_load() {
    let dir = ScratchDir::new();
    SessionHandle::load(context(&dir), at(18, 9, 0))
        .save_now(at(18, 9, 0))
        .await
        .unwrap();

    let later = at(18, 9, 0) + Duration::minutes(10);
    let handle = SessionHandle::load(context(&dir), later);
    let mut rng = ScriptedRandom::new().with_indices([0, 1, 2]);
    let caught = handle.idle_sweep(later, &mut rng).await.unwrap();
    assert_eq!(caught.len(), 3);

    // The sweep persisted, so a second restart sees the catches.
    let snap = SessionHandle::load(context(&dir), later).snapshot().await;
    assert_eq!(snap.inventory.len(), 3);
    assert_eq!(snap.last_active, later);
}
