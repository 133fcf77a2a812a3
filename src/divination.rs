// ☯️ Divination Annotator - attach an I Ching (易经) hexagram to each name
// The hexagram draw is independent of the chart and of the character draws

use crate::catalog::CharacterRecord;
use crate::elements::DeficiencySet;
use crate::error::{NamingError, Result as NamingResult};
use crate::pillars::Chart;
use crate::selector::DraftName;
use crate::symbols::Element;
use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The 64 King Wen hexagrams, embedded at compile time
const BUILTIN_HEXAGRAMS: &str = include_str!("../data/hexagrams.json");

// ============================================================================
// HEXAGRAM TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramEntry {
    /// King Wen sequence number (1-64)
    pub number: u8,
    pub name: String,
    /// Unicode hexagram glyph, e.g. ䷀
    pub symbol: String,
    pub judgement: String,
}

/// Hexagram entries keyed by number; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexagramTable {
    entries: BTreeMap<u8, HexagramEntry>,
}

impl HexagramTable {
    pub fn new(entries: Vec<HexagramEntry>) -> NamingResult<Self> {
        if entries.is_empty() {
            return Err(NamingError::EmptyHexagramTable);
        }

        let entries = entries.into_iter().map(|e| (e.number, e)).collect();
        Ok(HexagramTable { entries })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_HEXAGRAMS).context("Failed to parse built-in hexagram table")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: Vec<HexagramEntry> =
            serde_json::from_str(content).context("Failed to parse hexagram JSON")?;
        Ok(HexagramTable::new(entries)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read hexagram file: {:?}", path.as_ref()))?;
        Self::from_json_str(&content)
    }

    pub fn get(&self, number: u8) -> Option<&HexagramEntry> {
        self.entries.get(&number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Uniform draw over the keys in ascending order
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &HexagramEntry {
        let pick = rng.gen_range(0..self.entries.len());
        self.entries
            .values()
            .nth(pick)
            .unwrap_or_else(|| unreachable!("index {} within {} entries", pick, self.entries.len()))
    }
}

// ============================================================================
// NAME CANDIDATE
// ============================================================================

/// A generated name with everything the presentation layer shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCandidate {
    pub full_name: String,
    pub surname: String,
    pub given_name: String,
    /// Four pillars, space-joined
    pub chart: String,
    pub deficiency: Vec<Element>,
    /// `五行缺/弱: 金,水`
    pub analysis: String,
    pub characters: Vec<CharacterRecord>,
    /// `木+水`
    pub elements: String,
    pub meaning: String,
    pub hexagram: HexagramEntry,
}

/// Attach the chart, deficiency text and a freshly drawn hexagram to a draft
pub fn annotate<R: Rng + ?Sized>(
    draft: DraftName,
    chart: &Chart,
    deficiency: &DeficiencySet,
    table: &HexagramTable,
    rng: &mut R,
) -> NameCandidate {
    let hexagram = table.draw(rng).clone();

    NameCandidate {
        full_name: draft.full_name(),
        given_name: draft.given_name(),
        chart: chart.to_string(),
        deficiency: deficiency.elements().to_vec(),
        analysis: deficiency.describe(),
        elements: draft.elements_text(),
        meaning: draft.meaning(),
        surname: draft.surname,
        characters: draft.characters,
        hexagram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::analyze;
    use crate::pillars::{calculate_chart, BirthMoment};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn entry(number: u8, name: &str) -> HexagramEntry {
        HexagramEntry {
            number,
            name: name.to_string(),
            symbol: String::new(),
            judgement: String::new(),
        }
    }

    #[test]
    fn test_builtin_table_has_64_hexagrams() {
        let table = HexagramTable::builtin().unwrap();
        assert_eq!(table.len(), 64);
        assert_eq!(table.get(1).unwrap().name, "乾");
        assert_eq!(table.get(1).unwrap().symbol, "䷀");
        assert_eq!(table.get(64).unwrap().name, "未济");
        assert_eq!(table.get(64).unwrap().symbol, "䷿");
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(HexagramTable::new(vec![]), Err(NamingError::EmptyHexagramTable));
        assert!(HexagramTable::from_json_str("[]").is_err());
    }

    #[test]
    fn test_draw_stays_in_table() {
        let table = HexagramTable::new(vec![entry(11, "泰"), entry(12, "否")]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..50 {
            let drawn = table.draw(&mut rng);
            assert!(drawn.number == 11 || drawn.number == 12);
        }
    }

    #[test]
    fn test_draw_is_seeded() {
        let table = HexagramTable::builtin().unwrap();
        let a: Vec<u8> = {
            let mut rng = ChaCha8Rng::seed_from_u64(2024);
            (0..10).map(|_| table.draw(&mut rng).number).collect()
        };
        let b: Vec<u8> = {
            let mut rng = ChaCha8Rng::seed_from_u64(2024);
            (0..10).map(|_| table.draw(&mut rng).number).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_annotate_fills_every_field() {
        let chart = calculate_chart(&BirthMoment::new(1990, 2, 4, 10).unwrap());
        let analysis = analyze(&chart);
        let table = HexagramTable::new(vec![entry(15, "谦")]).unwrap();
        let draft = DraftName {
            surname: "王".to_string(),
            characters: vec![CharacterRecord::new("涵", Element::Water, "包容")],
        };

        let candidate = annotate(
            draft,
            &chart,
            &analysis.deficiency,
            &table,
            &mut ChaCha8Rng::seed_from_u64(0),
        );

        assert_eq!(candidate.full_name, "王涵");
        assert_eq!(candidate.given_name, "涵");
        assert_eq!(candidate.chart, "庚午 戊寅 庚申 辛巳");
        assert_eq!(candidate.analysis, "五行缺/弱: 水");
        assert_eq!(candidate.deficiency, vec![Element::Water]);
        assert_eq!(candidate.elements, "水");
        assert_eq!(candidate.meaning, "涵 (水): 包容");
        assert_eq!(candidate.hexagram.name, "谦");
    }
}
