// 🀄 Symbol Tables - stems, branches, elements
// Fixed cyclic sequences and the stem/branch → element map

use crate::error::NamingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ELEMENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Metal,
    Wood,
    Water,
    Fire,
    Earth,
}

impl Element {
    /// Canonical order 金木水火土, used for tallies and deficiency listings
    pub const ALL: [Element; 5] = [
        Element::Metal,
        Element::Wood,
        Element::Water,
        Element::Fire,
        Element::Earth,
    ];

    /// Slot in `ALL`
    pub fn index(&self) -> usize {
        match self {
            Element::Metal => 0,
            Element::Wood => 1,
            Element::Water => 2,
            Element::Fire => 3,
            Element::Earth => 4,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Element::Metal => "金",
            Element::Wood => "木",
            Element::Water => "水",
            Element::Fire => "火",
            Element::Earth => "土",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::Metal => "Metal",
            Element::Wood => "Wood",
            Element::Water => "Water",
            Element::Fire => "Fire",
            Element::Earth => "Earth",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl FromStr for Element {
    type Err = NamingError;

    /// Accepts the glyph (木) or the English name in any case (wood)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Element::ALL
            .iter()
            .copied()
            .find(|el| el.glyph() == trimmed || el.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| NamingError::UnknownElement(trimmed.to_string()))
    }
}

// ============================================================================
// HEAVENLY STEMS (天干)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    const GLYPHS: [&'static str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

    /// Panics on an index outside 0..10; callers reduce with `rem_euclid` first
    pub fn from_index(index: usize) -> Stem {
        Stem::ALL[index]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn glyph(&self) -> &'static str {
        Stem::GLYPHS[self.index()]
    }

    /// Stems pair up by element: 甲乙 Wood, 丙丁 Fire, 戊己 Earth, 庚辛 Metal, 壬癸 Water
    pub fn element(&self) -> Element {
        match self {
            Stem::Jia | Stem::Yi => Element::Wood,
            Stem::Bing | Stem::Ding => Element::Fire,
            Stem::Wu | Stem::Ji => Element::Earth,
            Stem::Geng | Stem::Xin => Element::Metal,
            Stem::Ren | Stem::Gui => Element::Water,
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

// ============================================================================
// EARTHLY BRANCHES (地支)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    const GLYPHS: [&'static str; 12] = [
        "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
    ];

    const ANIMALS: [&'static str; 12] = [
        "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
    ];

    /// Panics on an index outside 0..12; callers reduce with `rem_euclid` first
    pub fn from_index(index: usize) -> Branch {
        Branch::ALL[index]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn glyph(&self) -> &'static str {
        Branch::GLYPHS[self.index()]
    }

    /// Zodiac animal (生肖) sharing this branch
    pub fn zodiac(&self) -> &'static str {
        Branch::ANIMALS[self.index()]
    }

    pub fn element(&self) -> Element {
        match self {
            Branch::Zi | Branch::Hai => Element::Water,
            Branch::Yin | Branch::Mao => Element::Wood,
            Branch::Si | Branch::Wu => Element::Fire,
            Branch::Shen | Branch::You => Element::Metal,
            Branch::Chen | Branch::Xu | Branch::Chou | Branch::Wei => Element::Earth,
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

// ============================================================================
// STARTING-STEM TABLES
// ============================================================================

/// 五虎遁: stem of the Tiger (寅) month, indexed by year stem mod 5
/// 甲己→丙, 乙庚→戊, 丙辛→庚, 丁壬→壬, 戊癸→甲
pub const MONTH_START_STEMS: [usize; 5] = [2, 4, 6, 8, 0];

/// 五鼠遁: stem of the Rat (子) hour, indexed by day stem mod 5
/// 甲己→甲, 乙庚→丙, 丙辛→戊, 丁壬→庚, 戊癸→壬
pub const HOUR_START_STEMS: [usize; 5] = [0, 2, 4, 6, 8];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_glyphs_and_elements() {
        assert_eq!(Stem::Jia.glyph(), "甲");
        assert_eq!(Stem::Gui.glyph(), "癸");
        assert_eq!(Stem::from_index(6), Stem::Geng);
        assert_eq!(Stem::Geng.element(), Element::Metal);
        assert_eq!(Stem::Ding.element(), Element::Fire);
    }

    #[test]
    fn test_branch_glyphs_and_elements() {
        assert_eq!(Branch::from_index(0).glyph(), "子");
        assert_eq!(Branch::Hai.glyph(), "亥");
        assert_eq!(Branch::Chou.element(), Element::Earth);
        assert_eq!(Branch::Hai.element(), Element::Water);
        assert_eq!(Branch::Wu.zodiac(), "马");
    }

    #[test]
    fn test_every_symbol_has_an_element() {
        let stem_counts = Stem::ALL.iter().fold([0; 5], |mut acc, s| {
            acc[s.element().index()] += 1;
            acc
        });
        assert_eq!(stem_counts, [2, 2, 2, 2, 2]);

        // Earth holds the four "storehouse" branches
        let branch_counts = Branch::ALL.iter().fold([0; 5], |mut acc, b| {
            acc[b.element().index()] += 1;
            acc
        });
        assert_eq!(branch_counts[Element::Earth.index()], 4);
        assert_eq!(branch_counts.iter().sum::<usize>(), 12);
    }

    #[test]
    fn test_element_from_str() {
        assert_eq!("木".parse::<Element>().unwrap(), Element::Wood);
        assert_eq!("water".parse::<Element>().unwrap(), Element::Water);
        assert_eq!(" Metal ".parse::<Element>().unwrap(), Element::Metal);
        assert_eq!(
            "aether".parse::<Element>(),
            Err(NamingError::UnknownElement("aether".to_string()))
        );
    }

    #[test]
    fn test_element_index_matches_canonical_order() {
        for (i, el) in Element::ALL.iter().enumerate() {
            assert_eq!(el.index(), i);
        }
    }
}
