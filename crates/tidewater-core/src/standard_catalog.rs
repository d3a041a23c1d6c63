//! The built-in entity table: 50 fish, 10 legendary creatures, 10 pieces of
//! trash, in that order.

use tidewater_types::{Entity, TimeOfDay};

/// `(name, weight, rarity, value, catch message, color, pattern, habitat,
/// preferred time)`.
type Row = (
    &'static str,
    u32,
    u32,
    u32,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Option<TimeOfDay>,
);

const MORNING: Option<TimeOfDay> = Some(TimeOfDay::Morning);
const AFTERNOON: Option<TimeOfDay> = Some(TimeOfDay::Afternoon);
const EVENING: Option<TimeOfDay> = Some(TimeOfDay::Evening);
const NIGHT: Option<TimeOfDay> = Some(TimeOfDay::Night);
const ANY: Option<TimeOfDay> = None;

// Rarity 10 is very common, rarity 1 is the rarest regular fish.
const REGULAR: [Row; 50] = [
    ("Minnow", 1, 10, 2, "You caught a tiny Minnow!", "Silver", "Plain", "Freshwater", MORNING),
    ("Goldfish", 1, 10, 3, "You caught a Goldfish!", "Gold", "Plain", "Pond", AFTERNOON),
    ("Carp", 4, 9, 5, "You caught a Carp!", "Brown", "Mottled", "Freshwater", AFTERNOON),
    ("Perch", 3, 9, 6, "You caught a Perch!", "Yellow", "Striped", "Lake", EVENING),
    ("Bluegill", 2, 9, 4, "You caught a Bluegill!", "Blue", "Spotted", "Freshwater", MORNING),
    ("Trout", 3, 8, 7, "You caught a Trout!", "Rainbow", "Spotted", "Stream", MORNING),
    ("Sunfish", 2, 8, 5, "You caught a Sunfish!", "Orange", "Spotted", "Pond", AFTERNOON),
    ("Crappie", 2, 8, 5, "You caught a Crappie!", "Silver", "Mottled", "Lake", EVENING),
    ("Bullhead", 4, 8, 6, "You caught a Bullhead!", "Black", "Plain", "Lake", NIGHT),
    ("Bream", 3, 8, 5, "You caught a Bream!", "Bronze", "Plain", "Freshwater", ANY),
    ("Bass", 5, 7, 10, "You caught a Bass!", "Green", "Spotted", "Lake", EVENING),
    ("Catfish", 8, 7, 12, "You caught a Catfish!", "Gray", "Mottled", "River", NIGHT),
    ("Pike", 7, 7, 11, "You caught a Pike!", "Green", "Striped", "Lake", EVENING),
    ("Walleye", 6, 7, 10, "You caught a Walleye!", "Yellow", "Mottled", "Lake", NIGHT),
    ("Rainbow Trout", 4, 7, 9, "You caught a Rainbow Trout!", "Rainbow", "Spotted", "Stream", MORNING),
    ("Salmon", 8, 6, 15, "You caught a Salmon!", "Pink", "Plain", "River", MORNING),
    ("Tilapia", 5, 6, 8, "You caught a Tilapia!", "Silver", "Plain", "Lake", ANY),
    ("Yellowtail", 7, 6, 12, "You caught a Yellowtail!", "Yellow", "Striped", "Ocean", AFTERNOON),
    ("Rock Bass", 4, 6, 8, "You caught a Rock Bass!", "Brown", "Spotted", "Lake", ANY),
    ("Channel Catfish", 9, 6, 14, "You caught a Channel Catfish!", "Gray", "Plain", "River", NIGHT),
    ("Halibut", 15, 5, 25, "You caught a Halibut!", "Brown", "Mottled", "Ocean Floor", AFTERNOON),
    ("Sea Bass", 12, 5, 20, "You caught a Sea Bass!", "Black", "Plain", "Ocean", EVENING),
    ("Snapper", 10, 5, 18, "You caught a Snapper!", "Red", "Plain", "Reef", AFTERNOON),
    ("Flounder", 8, 5, 16, "You caught a Flounder!", "Sand", "Spotted", "Ocean Floor", NIGHT),
    ("Grouper", 14, 5, 22, "You caught a Grouper!", "Brown", "Mottled", "Reef", EVENING),
    ("Cod", 11, 5, 19, "You caught a Cod!", "Gray", "Spotted", "Deep Sea", MORNING),
    ("Mahi-Mahi", 15, 4, 28, "You caught a beautiful Mahi-Mahi!", "Blue-Green", "Spotted", "Open Ocean", AFTERNOON),
    ("Snook", 13, 4, 24, "You caught a Snook!", "Silver", "Black Stripe", "Coastal", NIGHT),
    ("Amberjack", 16, 4, 26, "You caught an Amberjack!", "Silver", "Yellow", "Reef", MORNING),
    ("Lake Trout", 12, 4, 22, "You caught a Lake Trout!", "Silver", "Spotted", "Deep Lake", MORNING),
    ("Tuna", 30, 3, 45, "You caught a massive Tuna!", "Blue", "Silver Belly", "Open Ocean", AFTERNOON),
    ("Tarpon", 40, 3, 50, "You caught a mighty Tarpon!", "Silver", "Iridescent", "Coastal", EVENING),
    ("Barracuda", 25, 3, 40, "You caught a toothy Barracuda!", "Silver", "Striped", "Reef", EVENING),
    ("Cobia", 35, 3, 48, "You caught a powerful Cobia!", "Brown", "White Stripe", "Coastal", AFTERNOON),
    ("Sturgeon", 45, 3, 55, "You caught an ancient Sturgeon!", "Gray", "Armored", "River", NIGHT),
    ("Striped Bass", 22, 3, 38, "You caught a huge Striped Bass!", "Silver", "Black Stripes", "Coastal", MORNING),
    ("Redfish", 20, 2, 35, "You caught a prized Redfish!", "Red", "Spotted Tail", "Coastal", EVENING),
    ("King Mackerel", 28, 2, 42, "You caught a King Mackerel!", "Silver", "Spotted", "Open Ocean", MORNING),
    ("Bonefish", 18, 2, 32, "You caught a Bonefish!", "Silver", "Dark Back", "Flats", MORNING),
    ("Permit", 25, 2, 40, "You caught a Permit!", "Silver", "Yellow Fins", "Flats", AFTERNOON),
    ("Marlin", 180, 1, 200, "You caught a massive Marlin!", "Blue", "Striped", "Deep Ocean", AFTERNOON),
    ("Swordfish", 150, 1, 180, "You caught a magnificent Swordfish!", "Blue-Black", "Plain", "Deep Ocean", NIGHT),
    ("Sailfish", 130, 1, 175, "You caught a beautiful Sailfish!", "Blue", "Spotted Sail", "Tropical Ocean", MORNING),
    ("Giant Trevally", 100, 1, 150, "You caught a Giant Trevally!", "Silver", "Dark Back", "Reef", EVENING),
    ("Goliath Grouper", 300, 1, 250, "You caught a massive Goliath Grouper!", "Brown", "Mottled", "Reef", AFTERNOON),
    ("Arapaima", 180, 1, 190, "You caught a prehistoric Arapaima!", "Red", "Scaled", "Amazon", EVENING),
    ("Giant Squid", 400, 1, 300, "You caught a rare Giant Squid!", "Red", "Tentacled", "Deep Ocean", NIGHT),
    ("Mekong Giant Catfish", 280, 1, 280, "You caught a Mekong Giant Catfish!", "Gray", "Plain", "Mekong River", NIGHT),
    ("Bluefin Tuna", 500, 1, 400, "You caught a prized Bluefin Tuna!", "Blue", "Silver Belly", "Open Ocean", MORNING),
    ("Golden Dorado", 80, 1, 120, "You caught a spectacular Golden Dorado!", "Gold", "Patterned", "South American Rivers", AFTERNOON),
];

// Drawn only through the legendary roll.
const LEGENDARY: [Row; 10] = [
    ("Kraken", 800, 1, 1000, "You caught the mythical KRAKEN! Its tentacles nearly capsize your boat!", "Dark Purple", "Tentacled", "Abyss", NIGHT),
    ("Loch Ness Monster", 1200, 1, 1500, "You've captured proof of Nessie! The scientific community is in shock!", "Green", "Prehistoric", "Deep Lake", NIGHT),
    ("Megalodon", 2000, 1, 2000, "MEGALODON! You've caught a living prehistoric shark thought extinct for millions of years!", "Gray", "Ancient", "Deep Ocean", NIGHT),
    ("Mermaid", 120, 1, 5000, "A MERMAID has been caught in your net! She grants you a wish before returning to the sea.", "Iridescent", "Scaled", "Tropical Ocean", EVENING),
    ("Golden Carp", 50, 1, 800, "The legendary GOLDEN CARP! Legend says it brings wealth and prosperity!", "Gold", "Glowing", "Sacred Lake", MORNING),
    ("Phoenix Fish", 30, 1, 1200, "A PHOENIX FISH! Its scales glow like embers and it's warm to the touch!", "Fiery Red", "Glowing", "Volcanic Vent", AFTERNOON),
    ("Ghost Whale", 1500, 1, 1800, "A GHOST WHALE has appeared! Its translucent body glows with an otherworldly light.", "Pale Blue", "Translucent", "Phantom Depths", NIGHT),
    ("Dragon Eel", 200, 1, 1600, "A DRAGON EEL! It breathes small flames and has scales harder than steel!", "Crimson", "Armored", "Undersea Cave", EVENING),
    ("Abyssal Anglerfish", 80, 1, 1300, "An ABYSSAL ANGLERFISH! Its light mesmerizes you with hypnotic patterns!", "Black", "Bioluminescent", "Hadal Zone", NIGHT),
    ("Moonlight Jellyfish", 40, 1, 900, "A MOONLIGHT JELLYFISH! It seems to channel the very essence of moonlight!", "Silver", "Glowing", "Midnight Surface", NIGHT),
];

const TRASH: [Row; 10] = [
    ("Old Boot", 2, 9, 0, "You caught an old boot. What a disappointment!", "Brown", "Worn", "Bottom", ANY),
    ("Tin Can", 1, 9, 0, "You caught a rusty tin can. Not exactly treasure...", "Rusty", "Dented", "Bottom", ANY),
    ("Plastic Bottle", 1, 10, 0, "You caught a plastic bottle. Please recycle it!", "Clear", "Crumpled", "Surface", ANY),
    ("Seaweed Clump", 1, 8, 0, "Just a tangled clump of seaweed. Nothing to see here.", "Green", "Tangled", "Everywhere", ANY),
    ("Driftwood", 3, 8, 1, "A piece of driftwood. Could be useful for crafting?", "Tan", "Weathered", "Surface", ANY),
    ("Broken Fishing Rod", 4, 7, 2, "Someone else's broken fishing rod. Unlucky for them!", "Wood", "Broken", "Bottom", ANY),
    ("Shopping Bag", 1, 10, 0, "A waterlogged shopping bag. Save the turtles!", "Plastic", "Soggy", "Surface", ANY),
    ("Car Tire", 15, 6, 5, "An entire car tire! How did that get here?", "Black", "Rubber", "Bottom", ANY),
    ("Waterlogged Phone", 1, 7, 3, "Someone's waterlogged phone. Maybe recoverable?", "Black", "Electronic", "Bottom", ANY),
    ("Treasure Chest", 20, 2, 50, "A small treasure chest! It's mostly decorative but worth something!", "Wooden", "Metal-bound", "Deep Bottom", ANY),
];

fn build(row: &Row, is_trash: bool, is_legendary: bool) -> Entity {
    let (name, weight, rarity, value, message, color, pattern, habitat, preferred_time) = *row;
    Entity {
        name: name.to_owned(),
        weight,
        rarity,
        value,
        catch_message: message.to_owned(),
        color: color.to_owned(),
        pattern: pattern.to_owned(),
        habitat: habitat.to_owned(),
        preferred_time,
        is_trash,
        is_legendary,
    }
}

/// Materialize the built-in table in catalog order.
pub(crate) fn entities() -> Vec<Entity> {
    let regular = REGULAR.iter().map(|row| build(row, false, false));
    let legendary = LEGENDARY.iter().map(|row| build(row, false, true));
    let trash = TRASH.iter().map(|row| build(row, true, false));
    regular.chain(legendary).chain(trash).collect()
}
