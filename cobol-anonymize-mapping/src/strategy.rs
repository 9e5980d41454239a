//! Deterministic naming strategies: Numeric and four word-based schemes
//! (Animals, Food, Fantasy, Corporate).

use md5::{Digest, Md5};

use cobol_anonymize_core::Role;

/// Selects which scheme `generate` uses.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NamingScheme {
    Numeric,
    Animals,
    Food,
    Fantasy,
    Corporate,
}

impl NamingScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            NamingScheme::Numeric => "numeric",
            NamingScheme::Animals => "animals",
            NamingScheme::Food => "food",
            NamingScheme::Fantasy => "fantasy",
            NamingScheme::Corporate => "corporate",
        }
    }

    /// The other three word-based schemes, used to pick a literal-scheme
    /// that differs from the identifier scheme.
    pub fn other_word_based(self) -> Vec<NamingScheme> {
        [
            NamingScheme::Animals,
            NamingScheme::Food,
            NamingScheme::Fantasy,
            NamingScheme::Corporate,
        ]
        .into_iter()
        .filter(|s| *s != self)
        .collect()
    }
}

impl std::str::FromStr for NamingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" => Ok(NamingScheme::Numeric),
            "animals" => Ok(NamingScheme::Animals),
            "food" => Ok(NamingScheme::Food),
            "fantasy" => Ok(NamingScheme::Fantasy),
            "corporate" => Ok(NamingScheme::Corporate),
            other => Err(format!("unknown naming scheme: {other}")),
        }
    }
}

const ANIMAL_ADJECTIVES: &[&str] = &[
    "FLUFFY", "GRUMPY", "SNEAKY", "WOBBLY", "DIZZY", "SLEEPY", "JUMPY", "FUZZY", "CHUNKY",
    "SPEEDY", "MIGHTY", "CLEVER", "SWIFT", "BRAVE", "SILLY",
];
const ANIMAL_NOUNS: &[&str] = &[
    "LLAMA", "PENGUIN", "WOMBAT", "PLATYPUS", "BADGER", "OTTER", "SLOTH", "KOALA", "LEMUR",
    "PANDA", "FERRET", "MARMOT", "BEAVER", "FALCON", "TOUCAN",
];

const FOOD_ADJECTIVES: &[&str] = &[
    "SPICY", "CRISPY", "SOGGY", "CHUNKY", "TANGY", "ZESTY", "GOOEY", "CRUNCHY", "SAVORY",
    "SIZZLY", "SMOKY", "CHEESY", "FRESH", "TOASTY", "SAUCY",
];
const FOOD_NOUNS: &[&str] = &[
    "TACO", "WAFFLE", "NOODLE", "PICKLE", "MUFFIN", "PRETZEL", "BURRITO", "DUMPLING", "PANCAKE",
    "NACHO", "BAGEL", "DONUT", "BISCUIT", "CRUMPET", "CHURRO",
];

const FANTASY_ADJECTIVES: &[&str] = &[
    "SNEAKY", "ANCIENT", "MIGHTY", "SLEEPY", "GRUMPY", "MYSTIC", "SHADOW", "FIERCE", "CLEVER",
    "NOBLE", "ARCANE", "GOLDEN", "SILVER", "WILD", "COSMIC",
];
const FANTASY_NOUNS: &[&str] = &[
    "DRAGON", "GOBLIN", "UNICORN", "TROLL", "PHOENIX", "WIZARD", "SPHINX", "GRIFFIN", "OGRE",
    "FAIRY", "KRAKEN", "HYDRA", "CENTAUR", "CYCLOPS", "CHIMERA",
];

const CORPORATE_ADJECTIVES: &[&str] = &[
    "AGILE", "SYNERGY", "PIVOT", "DISRUPT", "LEVERAGE", "SCALABLE", "ROBUST", "DYNAMIC",
    "HOLISTIC", "LEAN", "PROACTIVE", "NIMBLE", "OPTIMAL", "ALIGNED", "ELASTIC",
];
const CORPORATE_NOUNS: &[&str] = &[
    "PARADIGM", "BANDWIDTH", "SILO", "ROADMAP", "STAKEHOLDER", "TOUCHPOINT", "PIPELINE",
    "MINDSHARE", "VERTICAL", "METRICS", "SYNERGY", "ECOSYSTEM", "PLATFORM", "FRAMEWORK",
    "CHANNEL",
];

fn word_lists(scheme: NamingScheme) -> Option<(&'static [&'static str], &'static [&'static str])> {
    match scheme {
        NamingScheme::Numeric => None,
        NamingScheme::Animals => Some((ANIMAL_ADJECTIVES, ANIMAL_NOUNS)),
        NamingScheme::Food => Some((FOOD_ADJECTIVES, FOOD_NOUNS)),
        NamingScheme::Fantasy => Some((FANTASY_ADJECTIVES, FANTASY_NOUNS)),
        NamingScheme::Corporate => Some((CORPORATE_ADJECTIVES, CORPORATE_NOUNS)),
    }
}

/// First 8 bytes of `MD5(name.upper())`, interpreted big-endian. Stable
/// across runs and platforms; never change this without a migration plan
/// for existing mapping files.
fn hash_name(name: &str) -> u64 {
    let mut hasher = Md5::new();
    hasher.update(name.to_uppercase().as_bytes());
    let digest = hasher.finalize();
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(buf)
}

fn numeric_name(role: Role, counter: u64, target_length: usize) -> String {
    let prefix = role.prefix();
    let available = target_length.saturating_sub(prefix.len());
    if available < 1 {
        return format!("{prefix}{counter}");
    }
    let counter_str = format!("{counter:0width$}", width = available);
    let counter_str = if counter_str.len() > available {
        counter.to_string()
    } else {
        counter_str
    };
    format!("{prefix}{counter_str}")
}

/// Generates a synthetic identifier for `original_name` under `scheme`,
/// using `counter` to disambiguate repeats of the same word pair and
/// `target_length` as the length to aim for (capped at 30).
pub fn generate(
    scheme: NamingScheme,
    original_name: &str,
    role: Role,
    counter: u64,
    target_length: usize,
) -> String {
    let target_length = target_length.min(30).max(role.prefix().len() + 1);

    let Some((adjectives, nouns)) = word_lists(scheme) else {
        return numeric_name(role, counter, target_length);
    };

    let counter_str = counter.to_string();
    let min_required = 4 + counter_str.len();
    if target_length < min_required {
        return numeric_name(role, counter, target_length);
    }

    let hash = hash_name(original_name);
    let adj = adjectives[(hash % adjectives.len() as u64) as usize];
    let noun = nouns[((hash / adjectives.len() as u64) % nouns.len() as u64) as usize];

    let base = format!("{adj}-{noun}-{counter_str}");
    if base.len() <= target_length {
        return base;
    }

    truncate_word_based(adj, noun, &counter_str, target_length)
        .unwrap_or_else(|| numeric_name(role, counter, target_length))
}

/// Truncates adjective and noun symmetrically to fit `max_len`, reserving
/// space for the two hyphens and the counter. Returns `None` (caller
/// falls back to Numeric) if even a one-letter adjective and noun cannot
/// fit alongside the counter.
fn truncate_word_based(adj: &str, noun: &str, counter_str: &str, max_len: usize) -> Option<String> {
    let min_required = 4 + counter_str.len();
    if max_len < min_required {
        return None;
    }
    let available = max_len - counter_str.len() - 2;
    let adj_len = (available / 2).max(1);
    let noun_len = available.saturating_sub(adj_len).max(1);

    let adj_part = &adj[..adj_len.min(adj.len())];
    let noun_part = &noun[..noun_len.min(noun.len())];
    let result = format!("{adj_part}-{noun_part}-{counter_str}");

    if result.contains("--") {
        None
    } else {
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strategy_pads_to_target_length() {
        let name = generate(NamingScheme::Numeric, "WS-FIELD", Role::Data, 1, 10);
        assert_eq!(name, "D000000001");
    }

    #[test]
    fn numeric_counter_overflow_is_unpadded() {
        let name = generate(NamingScheme::Numeric, "WS-FIELD", Role::Data, 123456789, 5);
        assert_eq!(name, "D123456789");
    }

    #[test]
    fn word_based_is_deterministic_for_same_input() {
        let a = generate(NamingScheme::Animals, "WS-CUSTOMER-NAME", Role::Data, 1, 20);
        let b = generate(NamingScheme::Animals, "WS-CUSTOMER-NAME", Role::Data, 1, 20);
        assert_eq!(a, b);
        assert!(a.contains('-'));
    }

    #[test]
    fn word_based_falls_back_to_numeric_when_too_short() {
        let name = generate(NamingScheme::Fantasy, "X", Role::Data, 1, 3);
        assert!(name.starts_with('D'));
        assert!(!name.contains('-'));
    }

    #[test]
    fn word_based_truncation_has_no_double_hyphen() {
        let name = generate(NamingScheme::Corporate, "SOMETHING", Role::Data, 1, 6);
        assert!(!name.contains("--"));
        assert!(!name.ends_with('-'));
    }
}
