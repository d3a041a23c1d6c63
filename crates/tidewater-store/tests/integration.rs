//! Integration tests for the `tidewater-store` file layer.
//!
//! Each test works in its own scratch directory under the system temp dir
//! and removes it afterwards.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tidewater_store::{DailySave, GameSave, PlayerRecord, SaveStore, StoreError};
use tidewater_types::{Entity, Gear, TimeOfDay};
use uuid::Uuid;

// =============================================================================
// Helpers
// =============================================================================

struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!("tidewater-store-{}", Uuid::now_v7()));
        Self(path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn entity(name: &str, weight: u32, value: u32, trash: bool, legendary: bool) -> Entity {
    Entity {
        name: name.to_owned(),
        weight,
        rarity: if legendary { 1 } else { 7 },
        value,
        catch_message: format!("You caught a {name}!"),
        color: String::from("Silver"),
        pattern: String::from("Plain"),
        habitat: String::from("Lake"),
        preferred_time: legendary.then_some(TimeOfDay::Night),
        is_trash: trash,
        is_legendary: legendary,
    }
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 123_456_789).single().expect("valid timestamp")
}

fn game_save(inventory: Vec<Entity>) -> GameSave {
    GameSave {
        player: PlayerRecord {
            money: 1_250,
            rod: Gear::new("Carbon Rod", 3),
            bait: Gear::new("Lure", 2),
            inventory,
        },
        weather_factor: 1.137_5,
        last_active_time: timestamp(1_760_000_000),
        auto_fishing: true,
        save_time: timestamp(1_760_000_600),
    }
}

// =============================================================================
// Game record
// =============================================================================

#[test]
fn missing_game_record_reads_as_none() {
    let dir = ScratchDir::new();
    let store = SaveStore::open(&dir.0).expect("open store");
    assert!(store.read_game().expect("read").is_none());
}

#[test]
fn game_record_round_trips_with_mixed_inventory() {
    let dir = ScratchDir::new();
    let store = SaveStore::open(&dir.0).expect("open store");
    let save = game_save(vec![
        entity("Perch", 3, 6, false, false),
        entity("Old Boot", 2, 0, true, false),
        entity("Kraken", 800, 1000, false, true),
    ]);

    store.write_game(&save).expect("write");
    let loaded = store.read_game().expect("read").expect("present");

    assert_eq!(loaded, save);
    assert!(!dir.0.join("game_state.json.tmp").exists());
}

#[test]
fn game_record_round_trips_with_empty_inventory() {
    let dir = ScratchDir::new();
    let store = SaveStore::open(&dir.0).expect("open store");
    let save = game_save(Vec::new());

    store.write_game(&save).expect("write");
    assert_eq!(store.read_game().expect("read"), Some(save));
}

#[test]
fn weather_factor_reloads_bit_for_bit() {
    let dir = ScratchDir::new();
    let store = SaveStore::open(&dir.0).expect("open store");

    // Known hard cases plus a spread of 53-bit mantissas across [0.7, 1.3).
    let mut factors = vec![1.027_624_495_577_815_3, 0.700_000_000_000_000_1, 1.299_999_999_999_999_8];
    let low = 0.7_f64.to_bits();
    let span = 1.3_f64.to_bits().wrapping_sub(low);
    for k in 0..200_u64 {
        let offset = k.wrapping_mul(0x9E37_79B9_7F4A_7C15) % span;
        factors.push(f64::from_bits(low.wrapping_add(offset)));
    }

    let mut save = game_save(Vec::new());
    for factor in factors {
        save.weather_factor = factor;
        store.write_game(&save).expect("write");
        let loaded = store.read_game().expect("read").expect("present");
        assert_eq!(
            loaded.weather_factor.to_bits(),
            factor.to_bits(),
            "{factor} reloaded as {}",
            loaded.weather_factor
        );
    }
}

#[test]
fn corrupt_game_record_is_a_serialization_error() {
    let dir = ScratchDir::new();
    let store = SaveStore::open(&dir.0).expect("open store");
    fs::write(store.game_path(), b"{ not json").expect("write garbage");

    let err = store.read_game().expect_err("corrupt file must not parse");
    assert!(matches!(err, StoreError::Serialization { .. }));
}

#[test]
fn rewriting_replaces_previous_record() {
    let dir = ScratchDir::new();
    let store = SaveStore::open(&dir.0).expect("open store");
    let mut save = game_save(Vec::new());
    store.write_game(&save).expect("first write");

    save.player.money = 7;
    save.auto_fishing = false;
    store.write_game(&save).expect("second write");

    let loaded = store.read_game().expect("read").expect("present");
    assert_eq!(loaded.player.money, 7);
    assert!(!loaded.auto_fishing);
}

// =============================================================================
// Day records
// =============================================================================

#[test]
fn day_records_are_listed_by_date() {
    let dir = ScratchDir::new();
    let store = SaveStore::open(&dir.0).expect("open store");
    let first = NaiveDate::from_ymd_opt(2026, 10, 16).expect("date");
    let second = NaiveDate::from_ymd_opt(2026, 10, 17).expect("date");

    for (date, name) in [(second, "Bass"), (first, "Carp")] {
        store
            .write_day(&DailySave {
                date,
                fish_caught: vec![entity(name, 5, 10, false, false)],
                save_time: timestamp(1_760_000_000),
            })
            .expect("write day");
    }

    let days = store.read_all_days().expect("list days");
    let dates: Vec<NaiveDate> = days.keys().copied().collect();
    assert_eq!(dates, vec![first, second]);
    assert_eq!(days[&first].fish_caught[0].name, "Carp");
    assert_eq!(store.read_day(second).expect("read").expect("present").fish_caught.len(), 1);
}

#[test]
fn stray_and_corrupt_day_files_are_skipped() {
    let dir = ScratchDir::new();
    let store = SaveStore::open(&dir.0).expect("open store");
    let good = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");
    store
        .write_day(&DailySave {
            date: good,
            fish_caught: Vec::new(),
            save_time: timestamp(1_760_000_000),
        })
        .expect("write day");

    let days_dir = dir.0.join("days");
    fs::write(days_dir.join("2026-10-17.json"), b"[broken").expect("write corrupt");
    fs::write(days_dir.join("readme.json"), b"{}").expect("write stray");

    let days = store.read_all_days().expect("list days");
    assert_eq!(days.len(), 1);
    assert!(days.contains_key(&good));
}

#[test]
fn listing_without_days_dir_is_empty() {
    let dir = ScratchDir::new();
    let store = SaveStore::new(&dir.0);
    assert!(store.read_all_days().expect("list").is_empty());
}
