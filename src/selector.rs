// 🎯 Name Candidate Selector - element-guided character draws
// Characters of the deficient elements are preferred; everything else is the fallback pool

use crate::catalog::{CharacterDatabase, CharacterRecord};
use crate::elements::DeficiencySet;
use crate::error::{NamingError, Result};
use crate::symbols::Element;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Names generated per request
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Duplicate drafts tolerated per batch before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Chance that a given name has two characters rather than one
pub const TWO_CHARACTER_PROBABILITY: f64 = 0.7;

// ============================================================================
// DRAFT NAME
// ============================================================================

/// A surname plus drawn given-name characters, before annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftName {
    pub surname: String,
    pub characters: Vec<CharacterRecord>,
}

impl DraftName {
    pub fn given_name(&self) -> String {
        self.characters.iter().map(|c| c.character.as_str()).collect()
    }

    pub fn full_name(&self) -> String {
        format!("{}{}", self.surname, self.given_name())
    }

    pub fn elements(&self) -> Vec<Element> {
        self.characters.iter().map(|c| c.element).collect()
    }

    /// `木+水`
    pub fn elements_text(&self) -> String {
        let glyphs: Vec<&str> = self.characters.iter().map(|c| c.element.glyph()).collect();
        glyphs.join("+")
    }

    /// `林 (木): 森林茂盛；涵 (水): 包容`
    pub fn meaning(&self) -> String {
        let parts: Vec<String> = self.characters.iter().map(|c| c.describe()).collect();
        parts.join("；")
    }
}

// ============================================================================
// CANDIDATE POOLS
// ============================================================================

/// Database split by membership of the deficiency set
#[derive(Debug, Clone)]
pub struct CandidatePools<'a> {
    pub candidates: Vec<&'a CharacterRecord>,
    pub backups: Vec<&'a CharacterRecord>,
}

impl<'a> CandidatePools<'a> {
    pub fn partition(db: &'a CharacterDatabase, deficiency: &DeficiencySet) -> Self {
        let (candidates, backups): (Vec<_>, Vec<_>) = db
            .records()
            .iter()
            .partition(|record| deficiency.contains(record.element));

        CandidatePools {
            candidates,
            backups,
        }
    }

    /// Pool every slot draws from: candidates, or backups when there are none
    pub fn active(&self) -> &[&'a CharacterRecord] {
        if self.candidates.is_empty() {
            &self.backups
        } else {
            &self.candidates
        }
    }
}

// ============================================================================
// NAME SELECTOR
// ============================================================================

pub struct NameSelector<'a> {
    db: &'a CharacterDatabase,
    batch_size: usize,
    max_attempts: usize,
}

impl<'a> NameSelector<'a> {
    pub fn new(db: &'a CharacterDatabase) -> Self {
        NameSelector {
            db,
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// One draft: one or two characters, each drawn uniformly from `pool`
    pub fn draft<R: Rng + ?Sized>(
        &self,
        surname: &str,
        pool: &[&CharacterRecord],
        rng: &mut R,
    ) -> DraftName {
        let length = if rng.gen_bool(TWO_CHARACTER_PROBABILITY) { 2 } else { 1 };

        let characters = (0..length)
            .map(|_| pool[rng.gen_range(0..pool.len())].clone())
            .collect();

        DraftName {
            surname: surname.to_string(),
            characters,
        }
    }

    /// Draw `batch_size` distinct full names for the deficiency set
    pub fn select<R: Rng + ?Sized>(
        &self,
        surname: &str,
        deficiency: &DeficiencySet,
        rng: &mut R,
    ) -> Result<Vec<DraftName>> {
        if self.db.is_empty() {
            return Err(NamingError::EmptyDatabase);
        }

        let pools = CandidatePools::partition(self.db, deficiency);
        if pools.candidates.is_empty() {
            tracing::debug!(%deficiency, "no characters for deficient elements, using backups");
        }
        let pool = pools.active();

        let mut drafts: Vec<DraftName> = Vec::with_capacity(self.batch_size);
        let mut rejected = 0;

        while drafts.len() < self.batch_size {
            let draft = self.draft(surname, pool, rng);
            let full_name = draft.full_name();

            if drafts.iter().any(|d| d.full_name() == full_name) {
                rejected += 1;
                if rejected > self.max_attempts {
                    tracing::warn!(
                        accepted = drafts.len(),
                        pool = pool.len(),
                        "duplicate redraw bound exceeded"
                    );
                    return Err(NamingError::SelectionExhausted {
                        accepted: drafts.len(),
                        requested: self.batch_size,
                        attempts: rejected,
                    });
                }
                continue;
            }

            tracing::debug!(name = %full_name, elements = %draft.elements_text(), "accepted draft");
            drafts.push(draft);
        }

        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{DeficiencySet, ElementTally};
    use crate::pillars::{calculate_chart, BirthMoment};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn water_deficiency() -> DeficiencySet {
        // 1990-02-04 10h has no Water
        let chart = calculate_chart(&BirthMoment::new(1990, 2, 4, 10).unwrap());
        DeficiencySet::from_tally(&ElementTally::from_chart(&chart))
    }

    fn small_db() -> CharacterDatabase {
        CharacterDatabase::new(vec![
            CharacterRecord::new("林", Element::Wood, "森林茂盛"),
            CharacterRecord::new("松", Element::Wood, "坚贞不屈"),
            CharacterRecord::new("涵", Element::Water, "包容"),
            CharacterRecord::new("泽", Element::Water, "恩泽"),
            CharacterRecord::new("鑫", Element::Metal, "财富兴盛"),
        ])
    }

    #[test]
    fn test_partition_by_deficiency() {
        let db = small_db();
        let pools = CandidatePools::partition(&db, &water_deficiency());

        assert_eq!(pools.candidates.len(), 2);
        assert_eq!(pools.backups.len(), 3);
        assert!(pools.active().iter().all(|r| r.element == Element::Water));
    }

    #[test]
    fn test_backups_used_when_no_candidates() {
        let db = CharacterDatabase::new(vec![
            CharacterRecord::new("林", Element::Wood, "森林茂盛"),
            CharacterRecord::new("松", Element::Wood, "坚贞不屈"),
            CharacterRecord::new("柏", Element::Wood, "高洁长寿"),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let drafts = NameSelector::new(&db)
            .select("李", &water_deficiency(), &mut rng)
            .unwrap();

        assert_eq!(drafts.len(), 3);
        for draft in drafts {
            assert!(draft.elements().iter().all(|el| *el == Element::Wood));
        }
    }

    #[test]
    fn test_select_draws_only_deficient_elements() {
        let db = small_db();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let drafts = NameSelector::new(&db)
            .select("王", &water_deficiency(), &mut rng)
            .unwrap();

        assert_eq!(drafts.len(), 3);
        for draft in &drafts {
            assert!(draft.full_name().starts_with("王"));
            assert!((1..=2).contains(&draft.characters.len()));
            assert!(draft.elements().iter().all(|el| *el == Element::Water));
        }

        let mut names: Vec<String> = drafts.iter().map(|d| d.full_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_same_seed_same_drafts() {
        let db = small_db();
        let selector = NameSelector::new(&db);

        let a = selector
            .select("王", &water_deficiency(), &mut ChaCha8Rng::seed_from_u64(99))
            .unwrap();
        let b = selector
            .select("王", &water_deficiency(), &mut ChaCha8Rng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_database() {
        let db = CharacterDatabase::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let err = NameSelector::new(&db)
            .select("王", &water_deficiency(), &mut rng)
            .unwrap_err();
        assert_eq!(err, NamingError::EmptyDatabase);
    }

    #[test]
    fn test_tiny_database_exhausts() {
        // Only 王涵 and 王涵涵 exist
        let db = CharacterDatabase::new(vec![CharacterRecord::new("涵", Element::Water, "包容")]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let err = NameSelector::new(&db)
            .with_max_attempts(16)
            .select("王", &water_deficiency(), &mut rng)
            .unwrap_err();

        match err {
            NamingError::SelectionExhausted {
                requested,
                attempts,
                ..
            } => {
                assert_eq!(requested, 3);
                assert_eq!(attempts, 17);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_draft_text_fields() {
        let draft = DraftName {
            surname: "张".to_string(),
            characters: vec![
                CharacterRecord::new("林", Element::Wood, "森林茂盛"),
                CharacterRecord::new("涵", Element::Water, "包容"),
            ],
        };

        assert_eq!(draft.given_name(), "林涵");
        assert_eq!(draft.full_name(), "张林涵");
        assert_eq!(draft.elements_text(), "木+水");
        assert_eq!(draft.meaning(), "林 (木): 森林茂盛；涵 (水): 包容");
    }
}
