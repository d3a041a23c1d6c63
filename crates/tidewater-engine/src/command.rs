//! Console command parsing.

use chrono::NaiveDate;
use tidewater_store::parse_day_key;
use tidewater_types::{GearSlot, InventorySort};

/// One line of console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Blank line.
    Empty,
    /// Cast in the foreground.
    Fish,
    /// Toggle auto-fishing.
    Auto,
    /// Save now.
    Save,
    /// Sell the whole inventory.
    Sell,
    /// List the shop.
    Shop,
    /// Buy the shop entry at `index` (zero-based) in `slot`.
    Buy {
        /// Rod or bait list.
        slot: GearSlot,
        /// Position in that list.
        index: usize,
    },
    /// Show the grouped inventory.
    Inventory(InventorySort),
    /// Show logged days, or one day in detail.
    History(Option<NaiveDate>),
    /// Show the current state, optionally as JSON.
    Status {
        /// Dump the snapshot as JSON.
        json: bool,
    },
    /// List commands.
    Help,
    /// Leave the game.
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first word is not a command.
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    /// The command was recognised but its arguments were not.
    #[error("usage: {0}")]
    Usage(&'static str),
}

const BUY_USAGE: &str = "buy rod|bait <number from `shop`>";
const INV_USAGE: &str = "inv [rarity|weight|value|qty]";
const HISTORY_USAGE: &str = "history [YYYY-MM-DD]";

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Empty);
        };
        let args: Vec<&str> = words.collect();
        let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("fish" | "f" | "cast", []) => Self::Fish,
            ("auto" | "a", []) => Self::Auto,
            ("save", []) => Self::Save,
            ("sell", []) => Self::Sell,
            ("shop", []) => Self::Shop,
            ("buy", [slot, number]) => parse_buy(slot, number)?,
            ("buy", _) => return Err(ParseError::Usage(BUY_USAGE)),
            ("inv" | "inventory" | "i", []) => Self::Inventory(InventorySort::default()),
            ("inv" | "inventory" | "i", [sort]) => {
                Self::Inventory(InventorySort::parse(sort).ok_or(ParseError::Usage(INV_USAGE))?)
            }
            ("history" | "log", []) => Self::History(None),
            ("history" | "log", [date]) => {
                Self::History(Some(parse_day_key(date).ok_or(ParseError::Usage(HISTORY_USAGE))?))
            }
            ("status" | "s", []) => Self::Status { json: false },
            ("status" | "s", ["json"]) => Self::Status { json: true },
            ("help" | "h" | "?", []) => Self::Help,
            ("quit" | "q" | "exit", []) => Self::Quit,
            (other, _) => return Err(ParseError::Unknown(other.to_owned())),
        };
        Ok(command)
    }
}

fn parse_buy(slot: &str, number: &str) -> Result<Command, ParseError> {
    let slot = match slot.to_ascii_lowercase().as_str() {
        "rod" => GearSlot::Rod,
        "bait" => GearSlot::Bait,
        _ => return Err(ParseError::Usage(BUY_USAGE)),
    };
    let index = number
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or(ParseError::Usage(BUY_USAGE))?;
    Ok(Command::Buy { slot, index })
}

/// Text printed by `help`.
pub const HELP: &str = "\
commands:
  fish                 cast and wait for a bite
  auto                 toggle auto-fishing
  sell                 sell everything in the inventory
  shop                 list rods and baits for sale
  buy rod|bait <n>     buy entry <n> from the shop list
  inv [sort]           inventory grouped by name (rarity, weight, value, qty)
  history [date]       days with catches, or one day in detail
  status [json]        money, gear, weather, and time of day
  save                 save now
  quit                 save and leave";
