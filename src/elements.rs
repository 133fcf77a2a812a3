// ⚖️ Element Analyzer - Five-Element (五行) balance of a chart
// "缺什么补什么": the weakest elements drive name-character selection

use crate::pillars::Chart;
use crate::symbols::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbols in a chart: four stems plus four branches
pub const CHART_SYMBOLS: u32 = 8;

// ============================================================================
// ELEMENT TALLY
// ============================================================================

/// Count per element, slots in `Element::ALL` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementTally {
    counts: [u32; 5],
}

impl ElementTally {
    pub fn from_chart(chart: &Chart) -> Self {
        let mut tally = ElementTally::default();
        for (stem, branch) in chart.symbols() {
            tally.counts[stem.element().index()] += 1;
            tally.counts[branch.element().index()] += 1;
        }
        tally
    }

    pub fn count(&self, element: Element) -> u32 {
        self.counts[element.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn min_count(&self) -> u32 {
        self.counts.iter().copied().min().unwrap_or(0)
    }

    /// Elements with count 0, in `Element::ALL` order
    pub fn missing(&self) -> Vec<Element> {
        self.iter()
            .filter(|(_, count)| *count == 0)
            .map(|(el, _)| el)
            .collect()
    }

    /// (element, count) pairs, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        Element::ALL.iter().map(move |el| (*el, self.count(*el)))
    }
}

impl fmt::Display for ElementTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(el, count)| format!("{}{}", el, count))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

// ============================================================================
// DEFICIENCY SET
// ============================================================================

/// Absent elements, or failing that every element tied at the minimum count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDeficiencySet")]
pub struct DeficiencySet {
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct RawDeficiencySet {
    elements: Vec<Element>,
}

impl TryFrom<RawDeficiencySet> for DeficiencySet {
    type Error = String;

    fn try_from(raw: RawDeficiencySet) -> Result<Self, Self::Error> {
        if raw.elements.is_empty() {
            return Err("deficiency set needs at least one element".to_string());
        }
        Ok(DeficiencySet {
            elements: raw.elements,
        })
    }
}

impl DeficiencySet {
    pub fn from_tally(tally: &ElementTally) -> Self {
        Self::from_missing(tally, &tally.missing())
    }

    /// `missing` must be `tally.missing()`
    fn from_missing(tally: &ElementTally, missing: &[Element]) -> Self {
        let elements = if !missing.is_empty() {
            missing.to_vec()
        } else {
            let min = tally.min_count();
            tally
                .iter()
                .filter(|(_, count)| *count == min)
                .map(|(el, _)| el)
                .collect()
        };

        assert!(!elements.is_empty(), "deficiency set of {} is empty", tally);
        DeficiencySet { elements }
    }

    pub fn contains(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false; kept for the `len` convention
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Human-readable summary, e.g. `五行缺/弱: 金,水`
    pub fn describe(&self) -> String {
        format!("五行缺/弱: {}", self)
    }
}

impl fmt::Display for DeficiencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyphs: Vec<&str> = self.elements.iter().map(|el| el.glyph()).collect();
        f.write_str(&glyphs.join(","))
    }
}

// ============================================================================
// ANALYSIS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementAnalysis {
    pub tally: ElementTally,
    /// Elements with count 0 (may be empty)
    pub missing: Vec<Element>,
    pub deficiency: DeficiencySet,
}

/// Tally the chart and derive its deficiency set
pub fn analyze(chart: &Chart) -> ElementAnalysis {
    let tally = ElementTally::from_chart(chart);
    debug_assert_eq!(tally.total(), CHART_SYMBOLS);

    let missing = tally.missing();
    let deficiency = DeficiencySet::from_missing(&tally, &missing);

    ElementAnalysis {
        tally,
        missing,
        deficiency,
    }
}
