// ⚙️ Naming Engine - birth moment → chart → element analysis → annotated names
//
// Shared read-only data sits behind Arc so hosting shells can clone the engine
// into handlers freely. The only non-determinism is the caller's random source.

use crate::catalog::CharacterDatabase;
use crate::divination::{annotate, HexagramTable, NameCandidate};
use crate::elements::{analyze, ElementAnalysis};
use crate::error::Result;
use crate::pillars::{calculate_chart, BirthMoment, Chart};
use crate::selector::{NameSelector, DEFAULT_BATCH_SIZE, DEFAULT_MAX_ATTEMPTS};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingRequest {
    pub surname: String,
    pub birth: BirthMoment,
}

impl NamingRequest {
    pub fn new(surname: &str, birth: BirthMoment) -> Self {
        NamingRequest {
            surname: surname.trim().to_string(),
            birth,
        }
    }
}

/// Everything computed for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingReport {
    pub chart: Chart,
    pub chart_text: String,
    pub zodiac: String,
    pub analysis: ElementAnalysis,
    pub candidates: Vec<NameCandidate>,
}

#[derive(Debug, Clone)]
pub struct NamingEngine {
    characters: Arc<CharacterDatabase>,
    hexagrams: Arc<HexagramTable>,
    batch_size: usize,
    max_attempts: usize,
}

impl NamingEngine {
    pub fn new(characters: CharacterDatabase, hexagrams: HexagramTable) -> Self {
        NamingEngine {
            characters: Arc::new(characters),
            hexagrams: Arc::new(hexagrams),
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Engine over the embedded character and hexagram tables
    pub fn builtin() -> anyhow::Result<Self> {
        Ok(NamingEngine::new(
            CharacterDatabase::builtin()?,
            HexagramTable::builtin()?,
        ))
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn characters(&self) -> &CharacterDatabase {
        &self.characters
    }

    pub fn hexagrams(&self) -> &HexagramTable {
        &self.hexagrams
    }

    /// Chart and element analysis only; no randomness involved
    pub fn chart(&self, birth: &BirthMoment) -> (Chart, ElementAnalysis) {
        let chart = calculate_chart(birth);
        let analysis = analyze(&chart);
        (chart, analysis)
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &NamingRequest,
        rng: &mut R,
    ) -> Result<NamingReport> {
        let (chart, analysis) = self.chart(&request.birth);

        let drafts = NameSelector::new(&self.characters)
            .with_batch_size(self.batch_size)
            .with_max_attempts(self.max_attempts)
            .select(&request.surname, &analysis.deficiency, rng)?;

        let candidates = drafts
            .into_iter()
            .map(|draft| annotate(draft, &chart, &analysis.deficiency, &self.hexagrams, rng))
            .collect();

        tracing::info!(
            surname = %request.surname,
            chart = %chart,
            deficiency = %analysis.deficiency,
            "generated names"
        );

        Ok(NamingReport {
            chart,
            chart_text: chart.to_string(),
            zodiac: chart.zodiac().to_string(),
            analysis,
            candidates,
        })
    }

    /// Reproducible generation from a seed
    pub fn generate_seeded(&self, request: &NamingRequest, seed: u64) -> Result<NamingReport> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(request, &mut rng)
    }

    /// Generation seeded from OS entropy
    pub fn generate_random(&self, request: &NamingRequest) -> Result<NamingReport> {
        let mut rng = ChaCha8Rng::from_entropy();
        self.generate(request, &mut rng)
    }
}
