// End-to-end checks of the public pipeline plus calendar properties

use bazi_naming::{
    analyze, calculate_chart, day_pillar, year_pillar, BirthMoment, CharacterDatabase,
    CharacterRecord, Element, HexagramTable, NamingEngine, NamingRequest,
};
use chrono::NaiveDate;
use proptest::prelude::*;

fn two_per_element() -> CharacterDatabase {
    CharacterDatabase::new(vec![
        CharacterRecord::new("林", Element::Wood, "森林茂盛"),
        CharacterRecord::new("松", Element::Wood, "坚贞不屈"),
        CharacterRecord::new("炎", Element::Fire, "光明炽热"),
        CharacterRecord::new("煜", Element::Fire, "照耀辉煌"),
        CharacterRecord::new("坤", Element::Earth, "大地厚德"),
        CharacterRecord::new("岳", Element::Earth, "高山峻岭"),
        CharacterRecord::new("鑫", Element::Metal, "财富兴盛"),
        CharacterRecord::new("铭", Element::Metal, "铭记于心"),
        CharacterRecord::new("涵", Element::Water, "涵养包容"),
        CharacterRecord::new("泽", Element::Water, "恩泽广布"),
    ])
}

#[test]
fn test_known_birth_moment() {
    let birth = BirthMoment::new(1990, 2, 4, 10).unwrap();
    let chart = calculate_chart(&birth);

    assert_eq!(chart.year.stem.index(), 6);
    assert_eq!(chart.year.branch.index(), 6);
    assert_eq!(chart.to_string(), "庚午 戊寅 庚申 辛巳");
    assert_eq!(analyze(&chart).deficiency.elements(), &[Element::Water]);
}

#[test]
fn test_wang_gets_three_distinct_names() {
    let engine = NamingEngine::new(two_per_element(), HexagramTable::builtin().unwrap());

    for seed in 0..50 {
        let birth = BirthMoment::new(1970 + seed as i32, 1 + (seed % 12) as u32, 15, (seed % 24) as u32)
            .unwrap();
        let report = engine
            .generate_seeded(&NamingRequest::new("王", birth), seed)
            .unwrap();

        let mut names: Vec<&str> = report.candidates.iter().map(|c| c.full_name.as_str()).collect();
        assert_eq!(names.len(), 3);
        assert!(names.iter().all(|n| n.starts_with('王')));
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 3, "duplicate names for seed {}", seed);
    }
}

#[test]
fn test_report_serializes_for_presentation() {
    let engine = NamingEngine::builtin().unwrap();
    let request = NamingRequest::new("李", BirthMoment::new(1985, 6, 15, 22).unwrap());
    let report = engine.generate_seeded(&request, 77).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["candidates"].as_array().unwrap().len(), 3);
    assert!(json["candidates"][0]["hexagram"]["name"].is_string());
    assert!(json["chart_text"].as_str().unwrap().contains(' '));
}

proptest! {
    #[test]
    fn prop_year_cycle_closes(year in -100_000i32..100_000) {
        prop_assert_eq!(year_pillar(year), year_pillar(year + 60));
    }

    #[test]
    fn prop_chart_is_deterministic(
        year in 1i32..3000,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
    ) {
        let birth = BirthMoment::new(year, month, day, hour).unwrap();
        prop_assert_eq!(calculate_chart(&birth), calculate_chart(&birth));
    }

    #[test]
    fn prop_tally_sums_to_eight_and_deficiency_bounded(
        year in -3000i32..3000,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
    ) {
        let birth = BirthMoment::new(year, month, day, hour).unwrap();
        let chart = calculate_chart(&birth);
        let analysis = analyze(&chart);

        prop_assert_eq!(analysis.tally.total(), 8);
        prop_assert!((1..=5).contains(&analysis.deficiency.len()));
        prop_assert_eq!(analysis.clone(), analyze(&chart));

        // Deficient elements never outnumber any other element
        let min = analysis.tally.min_count();
        for el in analysis.deficiency.elements() {
            prop_assert_eq!(analysis.tally.count(*el), min);
        }
    }

    #[test]
    fn prop_day_indices_in_range_before_reference(offset in 1i64..2_000_000) {
        let reference = NaiveDate::from_ymd_opt(1900, 1, 31).unwrap();
        let date = reference - chrono::Duration::days(offset);
        let pillar = day_pillar(date);

        prop_assert!(pillar.stem.index() < 10);
        prop_assert!(pillar.branch.index() < 12);
        // stem and branch share parity within the cycle
        prop_assert_eq!(pillar.stem.index() % 2, pillar.branch.index() % 2);
    }
}
