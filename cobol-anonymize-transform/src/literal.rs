//! Anonymizes string-literal bodies with an exact-length-preserving,
//! deterministic word generator.
//!
//! The original Python generator drew words with a seeded `random.Random`;
//! per the design notes' open question, this port replaces that with a
//! deterministic MD5-driven word walk so that two runs over the same
//! input with the same scheme always produce byte-identical output
//! without depending on an RNG's algorithm staying stable across Rust
//! versions.

use md5::{Digest, Md5};

use cobol_anonymize_mapping::NamingScheme;

fn word_lists(scheme: NamingScheme) -> (&'static [&'static str], &'static [&'static str]) {
    match scheme {
        NamingScheme::Animals => (
            &[
                "FLUFFY", "GRUMPY", "SNEAKY", "WOBBLY", "DIZZY", "SLEEPY", "JUMPY", "FUZZY",
                "CHUNKY", "SPEEDY", "MIGHTY", "CLEVER", "SWIFT", "BRAVE", "SILLY",
            ],
            &[
                "LLAMA", "PENGUIN", "BADGER", "OTTER", "KOALA", "WALRUS", "FERRET", "PARROT",
                "WOMBAT", "GIBBON", "MANTIS", "IGUANA", "FALCON", "COBRA", "SALMON",
            ],
        ),
        NamingScheme::Food => (
            &[
                "SPICY", "CRISPY", "TANGY", "SMOKY", "ZESTY", "CHEWY", "CREAMY", "CRUNCHY",
                "SAVORY", "SWEET", "SALTY", "FRESH", "GRILLED", "BAKED", "FRIED",
            ],
            &[
                "TACO", "WAFFLE", "PICKLE", "BAGEL", "NACHO", "MUFFIN", "PRETZEL", "BRISKET",
                "CHURRO", "RAMEN", "DONUT", "BURGER", "PIZZA", "PASTA", "SALAD",
            ],
        ),
        NamingScheme::Fantasy => (
            &[
                "SNEAKY", "ANCIENT", "MYSTIC", "SHADOW", "FROST", "FLAME", "STORM", "IRON",
                "SILVER", "GOLDEN", "DARK", "LIGHT", "WILD", "BRAVE", "WISE",
            ],
            &[
                "DRAGON", "GOBLIN", "WIZARD", "GRIFFIN", "PHOENIX", "TROLL", "PIXIE", "DWARF",
                "SPRITE", "WRAITH", "KNIGHT", "RANGER", "MAGE", "ROGUE", "CLERIC",
            ],
        ),
        NamingScheme::Corporate => (
            &[
                "AGILE", "LEAN", "CORE", "PRIME", "SMART", "RAPID", "CLOUD", "CYBER", "DATA",
                "FLEX", "ULTRA", "MEGA", "SUPER", "HYPER", "TURBO",
            ],
            &[
                "SYNERGY", "PARADIGM", "MATRIX", "NEXUS", "VERTEX", "QUANTUM", "FUSION",
                "DYNAMIC", "VORTEX", "STREAM", "SUMMIT", "BRIDGE", "ALPHA", "OMEGA", "DELTA",
            ],
        ),
        NamingScheme::Numeric => (
            &["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O"],
            &["1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "X", "Y", "Z", "W", "V"],
        ),
    }
}

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates deterministic, length-preserving replacement text for
/// string-literal bodies.
pub struct LiteralRewriter {
    scheme: NamingScheme,
    /// Advances once per literal processed, so repeated literals in the
    /// same file still walk through different words.
    position: u64,
}

impl LiteralRewriter {
    pub fn new(scheme: NamingScheme) -> Self {
        Self { scheme, position: 0 }
    }

    /// Replaces `original`'s content with generated text of exactly the
    /// same length (in bytes). Right-pads with spaces when the generated
    /// text is shorter; if the original did not end in a space, any
    /// trailing spaces in the padded result are replaced with dashes so
    /// no spurious trailing whitespace appears.
    pub fn anonymize(&mut self, original: &str) -> String {
        let target_length = original.len();
        self.position += 1;

        if target_length == 0 {
            return String::new();
        }
        if target_length == 1 {
            let idx = (self.next_hash() % ALPHABET.len() as u64) as usize;
            return (ALPHABET[idx] as char).to_string();
        }

        let (adjectives, nouns) = word_lists(self.scheme);
        let mut words = Vec::new();
        let mut current_length = 0usize;
        while current_length < target_length {
            let list = if words.len() % 2 == 0 { adjectives } else { nouns };
            let idx = (self.next_hash() % list.len() as u64) as usize;
            let word = list[idx];
            current_length += word.len() + 1;
            words.push(word);
        }

        let mut result = words.join(" ");
        if result.len() > target_length {
            result.truncate(target_length);
        } else if result.len() < target_length {
            result.push_str(&" ".repeat(target_length - result.len()));
        }

        if !original.ends_with(' ') && result.ends_with(' ') {
            let trimmed = result.trim_end();
            let trailing = result.len() - trimmed.len();
            result = format!("{trimmed}{}", "-".repeat(trailing));
        }

        result
    }

    fn next_hash(&mut self) -> u64 {
        let mut hasher = Md5::new();
        hasher.update(self.scheme.as_str().as_bytes());
        hasher.update(self.position.to_be_bytes());
        self.position += 1;
        let digest = hasher.finalize();
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_preserves_exact_length() {
        let mut rewriter = LiteralRewriter::new(NamingScheme::Animals);
        for original in ["TESTPROG", "X", "", "A BIT LONGER LITERAL VALUE"] {
            let out = rewriter.anonymize(original);
            assert_eq!(out.len(), original.len());
        }
    }

    #[test]
    fn deterministic_across_independent_instances() {
        let mut a = LiteralRewriter::new(NamingScheme::Food);
        let mut b = LiteralRewriter::new(NamingScheme::Food);
        assert_eq!(a.anonymize("CUSTOMER-NAME"), b.anonymize("CUSTOMER-NAME"));
    }

    #[test]
    fn non_space_ending_original_never_gets_trailing_spaces() {
        let mut rewriter = LiteralRewriter::new(NamingScheme::Corporate);
        let out = rewriter.anonymize("SHORT");
        assert!(!out.is_empty());
        assert!(!out.ends_with(' '));
    }
}
