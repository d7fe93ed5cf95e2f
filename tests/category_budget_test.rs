// ==========================================
// 类别能量预算集成测试
// ==========================================
// 职责: 各动物类别的分量组合、哺乳扣减、年化天数
// ==========================================

mod test_helpers;

use afolu_ef::domain::{DataQualityWarning, FeedComposition, ProfileInput};
use afolu_ef::engine::enteric::METHANE_ENERGY_CONTENT;
use afolu_ef::engine::{CategoryBudget, EmissionEngine, DAYS_PER_YEAR, PRE_WEANING_DAYS_PER_YEAR};
use afolu_ef::{AnimalType, EnergyComponent};
use test_helpers::{assert_close, calf_input, dairy_input, feedlot_input, reference_provider};

#[test]
fn test_calf_total_energy_subtracts_milk_intake() {
    let report = EmissionEngine::default()
        .evaluate_input(calf_input(), &reference_provider())
        .unwrap();

    let energy = &report.energy;
    let expected = energy.components.sum() - energy.milk_energy_intake;
    assert_close(energy.total_gross_energy, expected, "calf tge");
    assert!(energy.milk_energy_intake > 0.0);
}

#[test]
fn test_non_calf_total_energy_equals_component_sum() {
    for input in [dairy_input(), feedlot_input()] {
        let report = EmissionEngine::default()
            .evaluate_input(input, &reference_provider())
            .unwrap();
        assert_eq!(report.energy.milk_energy_intake, 0.0);
        assert_close(
            report.energy.total_gross_energy,
            report.energy.components.sum(),
            "tge",
        );
    }
}

#[test]
fn test_enteric_annualization_days_per_category() {
    let provider = reference_provider();
    let engine = EmissionEngine::default();

    for (input, days) in [
        (calf_input(), PRE_WEANING_DAYS_PER_YEAR),
        (dairy_input(), DAYS_PER_YEAR),
        (feedlot_input(), DAYS_PER_YEAR),
    ] {
        let report = engine.evaluate_input(input, &provider).unwrap();
        let daily_methane_kg =
            report.total_gross_energy() * report.methane_conversion_ratio() / 100.0 / METHANE_ENERGY_CONTENT;
        assert_close(report.enteric_emission_factor(), daily_methane_kg * days, "enteric ef");
    }
    assert_close(PRE_WEANING_DAYS_PER_YEAR / DAYS_PER_YEAR, 0.75, "day ratio");
}

#[test]
fn test_calf_and_heifer_differ_only_in_annualization() {
    let provider = reference_provider();
    let engine = EmissionEngine::default();

    // 无哺乳、闭合日粮时犊牛与后备母牛的能量预算一致
    let calf = ProfileInput {
        forage_pct: 70.0,
        supplement_pct: 30.0,
        milk_l_year: 0.0,
        milk_fat_pct: 0.0,
        ..calf_input()
    };
    let heifer = ProfileInput {
        animal_type_id: AnimalType::ReplacementHeifer.id(),
        ..calf.clone()
    };

    let calf_report = engine.evaluate_input(calf, &provider).unwrap();
    let heifer_report = engine.evaluate_input(heifer, &provider).unwrap();

    assert_eq!(calf_report.total_gross_energy(), heifer_report.total_gross_energy());
    assert_eq!(
        calf_report.methane_conversion_ratio(),
        heifer_report.methane_conversion_ratio()
    );
    assert_close(
        calf_report.enteric_emission_factor() / heifer_report.enteric_emission_factor(),
        PRE_WEANING_DAYS_PER_YEAR / DAYS_PER_YEAR,
        "calf / heifer enteric ef",
    );
    assert_close(
        calf_report.enteric_emission_factor() / heifer_report.enteric_emission_factor(),
        273.75 / 365.0,
        "day ratio",
    );
    // 粪便排放始终按 365 天年化
    assert_eq!(
        calf_report.manure_emission_factor(),
        heifer_report.manure_emission_factor()
    );
}

#[test]
fn test_feedlot_reference_values() {
    let report = EmissionEngine::default()
        .evaluate_input(feedlot_input(), &reference_provider())
        .unwrap();

    assert_close(report.diet_digestibility(), 67.00450450450451, "dep");
    assert_close(report.total_gross_energy(), 152.9440653798457, "tge");
    assert_close(report.energy.components.growth, 73.44484011282134, "eg");
    assert_close(report.dry_matter_intake(), 8.38049673314223, "cms");
    assert_close(report.methane_conversion_ratio(), 6.686559571526544, "ym");
    assert_close(report.enteric_emission_factor(), 67.07536488049111, "enteric ef");
    assert_close(report.potential_dry_matter_intake().unwrap(), 9.39908075194686, "cpms");
    assert_close(report.volatile_solids(), 47.51099597347071, "vs");
    // 实际采食量低于潜在采食量
    assert!(!report.has_warnings());
}

#[test]
fn test_feedlot_low_net_energy_diet_reports_factors_without_intake_check() {
    // NEm 1.5 MJ/kg 时 0.2435·NEm − 0.0466·NEm² − 0.0869 < 0，潜在采食量无定义
    let mut provider = reference_provider();
    let low_nem: Vec<(u32, FeedComposition)> = provider
        .feeds()
        .map(|(id, feed)| {
            (
                id,
                FeedComposition {
                    net_energy_maintenance: 1.5,
                    ..*feed
                },
            )
        })
        .collect();
    for (id, feed) in low_nem {
        provider.insert_feed(id, feed).unwrap();
    }

    let report = EmissionEngine::default()
        .evaluate_input(feedlot_input(), &provider)
        .expect("undefined potential intake must not abort the evaluation");

    assert_close(report.enteric_emission_factor(), 67.07536488049111, "enteric ef");
    assert_close(report.volatile_solids(), 47.51099597347071, "vs");
    assert!(report.manure_emission_factor() > 0.0);
    assert!(report.enteric.intake_check.is_none());
    assert!(report.potential_dry_matter_intake().is_none());
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(
        report.warnings[0],
        DataQualityWarning::PotentialIntakeUndefined { ref quantity, .. }
            if quantity == "potential_dry_matter_intake"
    ));
}

#[test]
fn test_breeding_bull_ignores_lactation_and_pregnancy_inputs() {
    let input = ProfileInput {
        animal_type_id: 4,
        category_id: 2,
        live_weight_kg: 600.0,
        adult_weight_kg: 650.0,
        sexual_condition_id: 3,
        work_hours: 2.0,
        ..dairy_input()
    };
    let report = EmissionEngine::default()
        .evaluate_input(input, &reference_provider())
        .unwrap();

    let components = &report.energy.components;
    assert_eq!(components.lactation, 0.0);
    assert_eq!(components.pregnancy, 0.0);
    assert_eq!(components.growth, 0.0);
    assert!(components.work > 0.0);
    assert!(report.energy.growth_energy_ratio.is_none());
}

#[test]
fn test_components_outside_budget_are_zero_for_every_type() {
    let provider = reference_provider();
    let engine = EmissionEngine::default();

    for animal_type in AnimalType::ALL {
        let base = if animal_type == AnimalType::PreWeanedCalf {
            calf_input()
        } else if matches!(animal_type, AnimalType::ReplacementHeifer | AnimalType::FeedlotCattle) {
            feedlot_input()
        } else {
            dairy_input()
        };
        let input = ProfileInput {
            animal_type_id: animal_type.id(),
            work_hours: 1.0,
            ..base
        };
        let report = engine
            .evaluate_input(input, &provider)
            .unwrap_or_else(|e| panic!("{}: {}", animal_type, e));

        let budget = CategoryBudget::for_type(animal_type);
        for component in [
            EnergyComponent::Maintenance,
            EnergyComponent::Activity,
            EnergyComponent::Lactation,
            EnergyComponent::Pregnancy,
            EnergyComponent::Growth,
            EnergyComponent::Work,
        ] {
            let value = report.energy.components.get(component);
            if !budget.includes(component) {
                assert_eq!(value, 0.0, "{} {:?}", animal_type, component);
            }
        }
        assert_eq!(
            report.energy.growth_energy_ratio.is_some(),
            budget.includes(EnergyComponent::Growth),
            "{}",
            animal_type
        );
    }
}
