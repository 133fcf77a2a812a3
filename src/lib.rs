// Bazi Naming - Core Library
// Four-pillars chart, five-element balance and element-guided names
// Exposes all modules for use in CLI, API server, and tests

pub mod error;
pub mod symbols;     // Stems, branches, elements
pub mod pillars;     // Year / month / day / hour pillars
pub mod elements;    // Element tally + deficiency set
pub mod catalog;     // Character database
pub mod selector;    // Element-guided character draws
pub mod divination;  // Hexagram annotation
pub mod engine;      // Full pipeline
pub mod config;

// Re-export commonly used types
pub use error::{NamingError, Result};
pub use symbols::{Branch, Element, Stem};
pub use pillars::{
    BirthMoment, Chart, Pillar,
    calculate_chart, year_pillar, month_pillar, day_pillar, hour_pillar,
};
pub use elements::{analyze, DeficiencySet, ElementAnalysis, ElementTally};
pub use catalog::{CharacterDatabase, CharacterRecord};
pub use selector::{CandidatePools, DraftName, NameSelector};
pub use divination::{annotate, HexagramEntry, HexagramTable, NameCandidate};
pub use engine::{NamingEngine, NamingReport, NamingRequest};
pub use config::NamingConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the fmt subscriber used by the binaries (RUST_LOG overrides the default)
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bazi_naming=info,bazi_server=info"));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
