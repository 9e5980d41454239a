//! The cross-file original-to-synthetic identifier mapping table.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use cobol_anonymize_core::{is_reserved, Role};

use crate::error::MappingError;
use crate::strategy::{generate, NamingScheme};

const MAX_RETRIES: u32 = 1000;

/// One mapping from an original identifier to its synthetic replacement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MappingEntry {
    pub original_name: String,
    pub anonymized_name: String,
    #[serde(with = "role_as_id_type")]
    pub id_type: Role,
    #[serde(default)]
    pub is_external: bool,
    pub first_seen_file: Option<String>,
    pub first_seen_line: Option<usize>,
    #[serde(default = "default_occurrence")]
    pub occurrence_count: u32,
}

fn default_occurrence() -> u32 {
    1
}

/// Serializes [`Role`] as its `id_type` string (e.g. `"DATA_NAME"`) to
/// match the JSON/CSV shape the rest of the toolchain expects.
mod role_as_id_type {
    use super::{role_from_display, Role};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(role: &Role, serializer: S) -> Result<S::Ok, S::Error> {
        role.to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Role, D::Error> {
        let s = String::deserialize(deserializer)?;
        role_from_display(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown id_type: {s}")))
    }
}

#[derive(Serialize, Deserialize)]
struct MappingFile {
    generated_at: String,
    naming_scheme: String,
    mappings: Vec<MappingEntry>,
    external_names: Vec<String>,
    generator_state: HashMap<String, u64>,
}

/// Case-insensitive, cross-file table of original-to-synthetic mappings.
/// Guarantees no two distinct originals ever map to the same synthetic
/// name and that EXTERNAL identifiers are always kept verbatim.
pub struct MappingTable {
    mappings: HashMap<String, MappingEntry>,
    synthetic_in_use: HashSet<String>,
    external_names: HashSet<String>,
    counters: HashMap<Role, u64>,
    scheme: NamingScheme,
}

impl MappingTable {
    pub fn new(scheme: NamingScheme) -> Self {
        Self {
            mappings: HashMap::new(),
            synthetic_in_use: HashSet::new(),
            external_names: HashSet::new(),
            counters: HashMap::new(),
            scheme,
        }
    }

    pub fn scheme(&self) -> NamingScheme {
        self.scheme
    }

    /// Returns the existing synthetic on a hit (bumping the occurrence
    /// count); on a miss, generates and records a new one unless the item
    /// is EXTERNAL, in which case the original name is kept and recorded.
    pub fn get_or_create(
        &mut self,
        original: &str,
        role: Role,
        is_external: bool,
        file: Option<&str>,
        line: Option<usize>,
    ) -> Result<String, MappingError> {
        let key = original.to_uppercase();

        if is_external || role == Role::External {
            self.external_names.insert(key.clone());
            self.mappings.entry(key).or_insert_with(|| MappingEntry {
                original_name: original.to_string(),
                anonymized_name: original.to_string(),
                id_type: role,
                is_external: true,
                first_seen_file: file.map(str::to_string),
                first_seen_line: line,
                occurrence_count: 1,
            });
            return Ok(original.to_string());
        }

        if let Some(entry) = self.mappings.get_mut(&key) {
            entry.occurrence_count += 1;
            return Ok(entry.anonymized_name.clone());
        }

        if self.external_names.contains(&key) {
            return Ok(original.to_string());
        }

        let synthetic = self.generate_unique(original, role)?;
        self.synthetic_in_use.insert(synthetic.to_uppercase());
        self.mappings.insert(
            key,
            MappingEntry {
                original_name: original.to_string(),
                anonymized_name: synthetic.clone(),
                id_type: role,
                is_external: false,
                first_seen_file: file.map(str::to_string),
                first_seen_line: line,
                occurrence_count: 1,
            },
        );
        Ok(synthetic)
    }

    fn generate_unique(&mut self, original: &str, role: Role) -> Result<String, MappingError> {
        let target_length = original.len();
        for _ in 0..MAX_RETRIES {
            let counter = self.next_counter(role);
            let candidate = generate(self.scheme, original, role, counter, target_length);
            let upper = candidate.to_uppercase();
            if !is_reserved(&candidate) && !self.synthetic_in_use.contains(&upper) {
                return Ok(candidate);
            }
        }
        Err(MappingError::NameExhaustion {
            original: original.to_string(),
            attempts: MAX_RETRIES,
        })
    }

    fn next_counter(&mut self, role: Role) -> u64 {
        let counter = self.counters.entry(role).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn get(&self, name: &str) -> Option<&MappingEntry> {
        self.mappings.get(&name.to_uppercase())
    }

    pub fn reverse(&self, synthetic: &str) -> Option<&str> {
        self.mappings
            .values()
            .find(|e| e.anonymized_name.eq_ignore_ascii_case(synthetic))
            .map(|e| e.original_name.as_str())
    }

    pub fn mark_external(&mut self, name: &str) {
        self.external_names.insert(name.to_uppercase());
    }

    pub fn is_external(&self, name: &str) -> bool {
        self.external_names.contains(&name.to_uppercase())
    }

    pub fn all_entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.mappings.values()
    }

    pub fn save_json(&self, path: &Path) -> Result<(), MappingError> {
        let file = MappingFile {
            generated_at: Local::now().to_rfc3339(),
            naming_scheme: self.scheme.as_str().to_string(),
            mappings: self.mappings.values().cloned().collect(),
            external_names: self.external_names.iter().cloned().collect(),
            generator_state: self
                .counters
                .iter()
                .map(|(role, count)| (role.to_string(), *count))
                .collect(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MappingError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(&file).map_err(|e| MappingError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| MappingError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn save_csv(&self, path: &Path) -> Result<(), MappingError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MappingError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
        }
        let timestamp = Local::now().to_rfc3339();
        let mut writer = csv::Writer::from_path(path).map_err(|e| MappingError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
        writer
            .write_record([
                "original_name",
                "anonymized_name",
                "id_type",
                "is_external",
                "first_seen_file",
                "first_seen_line",
                "occurrence_count",
                "naming_scheme",
                "generated_at",
            ])
            .map_err(|e| MappingError::Csv {
                path: path.display().to_string(),
                source: e,
            })?;

        for entry in self.mappings.values() {
            writer
                .write_record([
                    entry.original_name.as_str(),
                    entry.anonymized_name.as_str(),
                    &entry.id_type.to_string(),
                    &entry.is_external.to_string(),
                    entry.first_seen_file.as_deref().unwrap_or(""),
                    &entry
                        .first_seen_line
                        .map(|n| n.to_string())
                        .unwrap_or_default(),
                    &entry.occurrence_count.to_string(),
                    self.scheme.as_str(),
                    &timestamp,
                ])
                .map_err(|e| MappingError::Csv {
                    path: path.display().to_string(),
                    source: e,
                })?;
        }

        for name in &self.external_names {
            if !self.mappings.contains_key(name) {
                writer
                    .write_record([
                        name.as_str(),
                        name.as_str(),
                        "EXTERNAL_NAME",
                        "true",
                        "",
                        "",
                        "0",
                        self.scheme.as_str(),
                        &timestamp,
                    ])
                    .map_err(|e| MappingError::Csv {
                        path: path.display().to_string(),
                        source: e,
                    })?;
            }
        }

        writer.flush().map_err(|e| MappingError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Restores a table from a previously saved JSON file, including
    /// per-role counters, so an interrupted run can resume without
    /// regenerating already-emitted names.
    pub fn load_json(path: &Path, fallback_scheme: NamingScheme) -> Result<Self, MappingError> {
        let text = std::fs::read_to_string(path).map_err(|e| MappingError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: MappingFile = serde_json::from_str(&text).map_err(|e| MappingError::Json {
            path: path.display().to_string(),
            source: e,
        })?;

        let scheme = file.naming_scheme.parse().unwrap_or(fallback_scheme);
        let mut table = Self::new(scheme);

        for entry in file.mappings {
            let key = entry.original_name.to_uppercase();
            table.synthetic_in_use.insert(entry.anonymized_name.to_uppercase());
            table.mappings.insert(key, entry);
        }
        for name in file.external_names {
            table.external_names.insert(name.to_uppercase());
        }
        for (role_name, count) in file.generator_state {
            if let Some(role) = role_from_display(&role_name) {
                table.counters.insert(role, count);
            }
        }

        Ok(table)
    }
}

fn role_from_display(s: &str) -> Option<Role> {
    Some(match s {
        "PROGRAM_NAME" => Role::Program,
        "COPYBOOK_NAME" => Role::Copybook,
        "SECTION_NAME" => Role::Section,
        "PARAGRAPH_NAME" => Role::Paragraph,
        "DATA_NAME" => Role::Data,
        "CONDITION_NAME" => Role::Condition88,
        "FILE_NAME" => Role::File,
        "INDEX_NAME" => Role::Index,
        "EXTERNAL_NAME" => Role::External,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookup_returns_same_synthetic_and_bumps_count() {
        let mut table = MappingTable::new(NamingScheme::Numeric);
        let a = table.get_or_create("WS-FIELD", Role::Data, false, Some("P.cbl"), Some(1)).unwrap();
        let b = table.get_or_create("WS-FIELD", Role::Data, false, None, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(table.get("ws-field").unwrap().occurrence_count, 2);
    }

    #[test]
    fn external_identifiers_are_kept_verbatim() {
        let mut table = MappingTable::new(NamingScheme::Numeric);
        let name = table.get_or_create("CUST-ID", Role::External, true, None, None).unwrap();
        assert_eq!(name, "CUST-ID");
        assert!(table.is_external("cust-id"));
    }

    #[test]
    fn distinct_originals_never_collide_on_synthetic() {
        let mut table = MappingTable::new(NamingScheme::Numeric);
        let a = table.get_or_create("ALPHA", Role::Data, false, None, None).unwrap();
        let b = table.get_or_create("BETA", Role::Data, false, None, None).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn reverse_lookup_finds_original() {
        let mut table = MappingTable::new(NamingScheme::Numeric);
        let synthetic = table.get_or_create("WS-FIELD", Role::Data, false, None, None).unwrap();
        assert_eq!(table.reverse(&synthetic), Some("WS-FIELD"));
    }
}
