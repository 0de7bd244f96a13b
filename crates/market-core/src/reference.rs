//! Reference data
//!
//! Symbol → sector and sector → group lookups. The engine never hard-codes
//! these tables in its rules; callers hand in a `ReferenceData` (usually the
//! built-in default, or one loaded from JSON) so the mapping can change
//! without touching the analyzers.

use crate::types::RankedStock;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Sector grouping used for risk-on / risk-off comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectorGroup {
    Cyclical,
    Growth,
    Defensive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Symbol (upper-case) → sector id
    #[serde(default)]
    symbol_sectors: HashMap<String, String>,
    /// Sector id (upper-case) → group
    #[serde(default)]
    sector_groups: HashMap<String, SectorGroup>,
    /// Sector id (upper-case) → display name
    #[serde(default)]
    sector_names: HashMap<String, String>,
}

impl ReferenceData {
    /// Empty tables: every lookup misses
    pub fn empty() -> Self {
        Self {
            symbol_sectors: HashMap::new(),
            sector_groups: HashMap::new(),
            sector_names: HashMap::new(),
        }
    }

    /// Parse reference tables from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: ReferenceData =
            serde_json::from_str(json).context("Failed to parse reference data JSON")?;
        Ok(data.normalized())
    }

    /// Load reference tables from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference data from {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    pub fn with_symbol(mut self, symbol: &str, sector_id: &str) -> Self {
        self.symbol_sectors
            .insert(symbol.to_uppercase(), sector_id.to_uppercase());
        self
    }

    pub fn with_sector_group(mut self, sector_id: &str, group: SectorGroup) -> Self {
        self.sector_groups.insert(sector_id.to_uppercase(), group);
        self
    }

    pub fn with_sector_name(mut self, sector_id: &str, name: &str) -> Self {
        self.sector_names
            .insert(sector_id.to_uppercase(), name.to_string());
        self
    }

    /// Resolve a symbol's sector id
    pub fn sector_for(&self, symbol: &str) -> Option<&str> {
        self.symbol_sectors
            .get(&symbol.to_uppercase())
            .map(String::as_str)
    }

    /// Sector for a ranked stock: its own field (trimmed, upper-cased) first,
    /// then the symbol table
    pub fn resolve_sector(&self, stock: &RankedStock) -> Option<String> {
        stock
            .sector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .or_else(|| self.sector_for(&stock.symbol).map(str::to_string))
    }

    pub fn group_of(&self, sector_id: &str) -> Option<SectorGroup> {
        self.sector_groups.get(&sector_id.to_uppercase()).copied()
    }

    pub fn is_cyclical_or_growth(&self, sector_id: &str) -> bool {
        matches!(
            self.group_of(sector_id),
            Some(SectorGroup::Cyclical) | Some(SectorGroup::Growth)
        )
    }

    pub fn is_defensive(&self, sector_id: &str) -> bool {
        self.group_of(sector_id) == Some(SectorGroup::Defensive)
    }

    pub fn sector_name<'a>(&'a self, sector_id: &'a str) -> &'a str {
        self.sector_names
            .get(&sector_id.to_uppercase())
            .map(String::as_str)
            .unwrap_or(sector_id)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_sectors.len()
    }

    fn normalized(self) -> Self {
        Self {
            symbol_sectors: self
                .symbol_sectors
                .into_iter()
                .map(|(k, v)| (k.to_uppercase(), v.to_uppercase()))
                .collect(),
            sector_groups: self
                .sector_groups
                .into_iter()
                .map(|(k, v)| (k.to_uppercase(), v))
                .collect(),
            sector_names: self
                .sector_names
                .into_iter()
                .map(|(k, v)| (k.to_uppercase(), v))
                .collect(),
        }
    }
}

impl Default for ReferenceData {
    /// Built-in SET sector taxonomy and large-cap symbol map
    fn default() -> Self {
        const SECTORS: &[(&str, &str, SectorGroup)] = &[
            ("AGRI", "Agribusiness", SectorGroup::Defensive),
            ("FOOD", "Food & Beverage", SectorGroup::Defensive),
            ("PERSON", "Personal Products & Pharmaceuticals", SectorGroup::Defensive),
            ("COMM", "Commerce", SectorGroup::Defensive),
            ("HELTH", "Health Care Services", SectorGroup::Defensive),
            ("INSUR", "Insurance", SectorGroup::Defensive),
            ("PF&REIT", "Property Fund & REITs", SectorGroup::Defensive),
            ("BANK", "Banking", SectorGroup::Cyclical),
            ("FIN", "Finance & Securities", SectorGroup::Cyclical),
            ("AUTO", "Automotive", SectorGroup::Cyclical),
            ("IMM", "Industrial Materials & Machinery", SectorGroup::Cyclical),
            ("PETRO", "Petrochemicals & Chemicals", SectorGroup::Cyclical),
            ("PKG", "Packaging", SectorGroup::Cyclical),
            ("STEEL", "Steel & Metal Products", SectorGroup::Cyclical),
            ("CONMAT", "Construction Materials", SectorGroup::Cyclical),
            ("CONS", "Construction Services", SectorGroup::Cyclical),
            ("PROP", "Property Development", SectorGroup::Cyclical),
            ("ENERG", "Energy & Utilities", SectorGroup::Cyclical),
            ("MINE", "Mining", SectorGroup::Cyclical),
            ("TOURISM", "Tourism & Leisure", SectorGroup::Cyclical),
            ("TRANS", "Transportation & Logistics", SectorGroup::Cyclical),
            ("ETRON", "Electronic Components", SectorGroup::Growth),
            ("ICT", "Information & Communication Technology", SectorGroup::Growth),
            ("MEDIA", "Media & Publishing", SectorGroup::Growth),
            ("PROF", "Professional Services", SectorGroup::Growth),
        ];

        const SYMBOLS: &[(&str, &str)] = &[
            ("PTT", "ENERG"),
            ("PTTEP", "ENERG"),
            ("GULF", "ENERG"),
            ("GPSC", "ENERG"),
            ("BGRIM", "ENERG"),
            ("EA", "ENERG"),
            ("BANPU", "ENERG"),
            ("TOP", "ENERG"),
            ("KBANK", "BANK"),
            ("SCB", "BANK"),
            ("BBL", "BANK"),
            ("KTB", "BANK"),
            ("TTB", "BANK"),
            ("TISCO", "BANK"),
            ("KTC", "FIN"),
            ("MTC", "FIN"),
            ("SAWAD", "FIN"),
            ("TIDLOR", "FIN"),
            ("TLI", "INSUR"),
            ("BLA", "INSUR"),
            ("AOT", "TRANS"),
            ("BEM", "TRANS"),
            ("BTS", "TRANS"),
            ("ADVANC", "ICT"),
            ("TRUE", "ICT"),
            ("INTUCH", "ICT"),
            ("DELTA", "ETRON"),
            ("HANA", "ETRON"),
            ("KCE", "ETRON"),
            ("CPALL", "COMM"),
            ("CRC", "COMM"),
            ("HMPRO", "COMM"),
            ("BJC", "COMM"),
            ("COM7", "COMM"),
            ("BDMS", "HELTH"),
            ("BH", "HELTH"),
            ("BCH", "HELTH"),
            ("CPF", "FOOD"),
            ("TU", "FOOD"),
            ("OSP", "FOOD"),
            ("CBG", "FOOD"),
            ("MINT", "FOOD"),
            ("CPN", "PROP"),
            ("LH", "PROP"),
            ("AP", "PROP"),
            ("WHA", "PROP"),
            ("AMATA", "PROP"),
            ("SCC", "CONMAT"),
            ("SCGP", "PKG"),
            ("IVL", "PETRO"),
            ("PTTGC", "PETRO"),
            ("CENTEL", "TOURISM"),
            ("ERW", "TOURISM"),
            ("CK", "CONS"),
            ("STECON", "CONS"),
        ];

        let mut data = Self::empty();
        for (id, name, group) in SECTORS {
            data = data.with_sector_group(id, *group).with_sector_name(id, name);
        }
        for (symbol, sector) in SYMBOLS {
            data = data.with_symbol(symbol, sector);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookups() {
        let data = ReferenceData::default();
        assert_eq!(data.sector_for("kbank"), Some("BANK"));
        assert_eq!(data.sector_for("UNKNOWN"), None);
        assert!(data.is_cyclical_or_growth("BANK"));
        assert!(data.is_cyclical_or_growth("ict"));
        assert!(data.is_defensive("FOOD"));
        assert!(!data.is_defensive("ENERG"));
        assert_eq!(data.sector_name("HELTH"), "Health Care Services");
        assert_eq!(data.sector_name("XYZ"), "XYZ");
    }

    #[test]
    fn test_from_json_normalizes_keys() {
        let json = r#"{
            "symbol_sectors": { "abc": "tech" },
            "sector_groups": { "tech": "Growth", "food": "Defensive" }
        }"#;
        let data = ReferenceData::from_json_str(json).unwrap();
        assert_eq!(data.sector_for("ABC"), Some("TECH"));
        assert_eq!(data.group_of("TECH"), Some(SectorGroup::Growth));
        assert!(data.is_defensive("Food"));
    }

    #[test]
    fn test_resolve_sector_prefers_stock_field() {
        let data = ReferenceData::default();
        let mut stock = RankedStock {
            symbol: "kbank".to_string(),
            name: None,
            value: 100.0,
            volume: 1000.0,
            change_percent: -1.0,
            price: None,
            sector: Some(" fin ".to_string()),
        };
        assert_eq!(data.resolve_sector(&stock).as_deref(), Some("FIN"));

        stock.sector = Some("   ".to_string());
        assert_eq!(data.resolve_sector(&stock).as_deref(), Some("BANK"));

        stock.symbol = "NEWCO".to_string();
        stock.sector = None;
        assert_eq!(data.resolve_sector(&stock), None);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ReferenceData::from_json_str("not json").is_err());
    }
}
