// 📚 Character Database - name characters with their element and meaning
// Loaded once (built-in table, CSV or JSON) and shared read-only afterwards

use crate::symbols::Element;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Built-in table embedded at compile time
const BUILTIN_CHARACTERS: &str = include_str!("../data/characters.csv");

// ============================================================================
// CHARACTER RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub character: String,
    pub element: Element,
    pub meaning: String,
}

impl CharacterRecord {
    pub fn new(character: &str, element: Element, meaning: &str) -> Self {
        CharacterRecord {
            character: character.to_string(),
            element,
            meaning: meaning.to_string(),
        }
    }

    /// `林 (木): 森林茂盛`
    pub fn describe(&self) -> String {
        format!("{} ({}): {}", self.character, self.element, self.meaning)
    }
}

/// On-disk row; the element column accepts 木 or "Wood"
#[derive(Debug, Deserialize)]
struct CharacterRow {
    character: String,
    element: String,
    meaning: String,
}

impl CharacterRow {
    fn into_record(self, line: usize) -> Result<CharacterRecord> {
        let element = self
            .element
            .parse::<Element>()
            .with_context(|| format!("Bad element on row {} ({})", line, self.character))?;

        Ok(CharacterRecord {
            character: self.character.trim().to_string(),
            element,
            meaning: self.meaning.trim().to_string(),
        })
    }
}

// ============================================================================
// CHARACTER DATABASE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDatabase {
    records: Vec<CharacterRecord>,
}

impl CharacterDatabase {
    pub fn new(records: Vec<CharacterRecord>) -> Self {
        CharacterDatabase { records }
    }

    /// The embedded default table
    pub fn builtin() -> Result<Self> {
        Self::from_csv_reader(BUILTIN_CHARACTERS.as_bytes())
            .context("Failed to parse built-in character table")
    }

    /// Load from a file, picking the format by extension (.json, otherwise CSV)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_path(path)
        } else {
            Self::from_csv_path(path)
        }
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = fs::File::open(path.as_ref())
            .with_context(|| format!("Failed to open character CSV: {:?}", path.as_ref()))?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut records = Vec::new();
        for (i, row) in rdr.deserialize::<CharacterRow>().enumerate() {
            // header is line 1
            let line = i + 2;
            let row = row.with_context(|| format!("Failed to deserialize character row {}", line))?;
            records.push(row.into_record(line)?);
        }

        Ok(CharacterDatabase { records })
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read character JSON: {:?}", path.as_ref()))?;

        let rows: Vec<CharacterRow> =
            serde_json::from_str(&content).context("Failed to parse character JSON")?;

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.into_record(i + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(CharacterDatabase { records })
    }

    pub fn records(&self) -> &[CharacterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_element(&self, element: Element) -> impl Iterator<Item = &CharacterRecord> {
        self.records.iter().filter(move |r| r.element == element)
    }

    /// Records per element in `Element::ALL` order
    pub fn element_counts(&self) -> [usize; 5] {
        let mut counts = [0; 5];
        for record in &self.records {
            counts[record.element.index()] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_covers_every_element() {
        let db = CharacterDatabase::builtin().unwrap();
        assert!(!db.is_empty());
        for count in db.element_counts() {
            assert!(count >= 8, "element with only {} characters", count);
        }
    }

    #[test]
    fn test_csv_accepts_glyphs_and_names() {
        let csv = "character,element,meaning\n林,木,森林茂盛\n鑫, metal ,财富兴盛\n";
        let db = CharacterDatabase::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(db.len(), 2);
        assert_eq!(db.records()[0], CharacterRecord::new("林", Element::Wood, "森林茂盛"));
        assert_eq!(db.records()[1].element, Element::Metal);
        assert_eq!(db.by_element(Element::Wood).count(), 1);
    }

    #[test]
    fn test_csv_rejects_unknown_element() {
        let csv = "character,element,meaning\n风,风,自由\n";
        let err = CharacterDatabase::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("row 2"));
    }

    #[test]
    fn test_describe_record() {
        let record = CharacterRecord::new("涵", Element::Water, "包容");
        assert_eq!(record.describe(), "涵 (水): 包容");
    }

    #[test]
    fn test_json_file_loading() {
        let dir = std::env::temp_dir().join("bazi_naming_catalog_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("chars.json");
        fs::write(
            &path,
            r#"[{"character":"炎","element":"Fire","meaning":"光明炽热"}]"#,
        )
        .unwrap();

        let db = CharacterDatabase::from_path(&path).unwrap();
        assert_eq!(db.records(), &[CharacterRecord::new("炎", Element::Fire, "光明炽热")]);
    }
}
