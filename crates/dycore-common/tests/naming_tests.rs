//! Tests for model variant lookup and density-slot naming.

use dycore_common::{DensityNames, ModelVariant, PlotError};

// ============================================================================
// Variant lookup
// ============================================================================

#[test]
fn test_parse_known_tags() {
    assert_eq!("swe".parse::<ModelVariant>().unwrap(), ModelVariant::Swe);
    assert_eq!("tswe".parse::<ModelVariant>().unwrap(), ModelVariant::Tswe);
    assert_eq!("ce".parse::<ModelVariant>().unwrap(), ModelVariant::Ce);
    assert_eq!("mce".parse::<ModelVariant>().unwrap(), ModelVariant::Mce);
}

#[test]
fn test_unknown_tag_is_rejected() {
    let err = "euler".parse::<ModelVariant>().unwrap_err();
    assert!(matches!(err, PlotError::UnknownModel(ref tag) if tag == "euler"));
    assert_eq!(err.code(), "unknown_model");
    assert!(err.to_string().contains("euler"));
}

#[test]
fn test_empty_tag_is_rejected() {
    assert!("".parse::<ModelVariant>().is_err());
}

#[test]
fn test_variant_deserializes_from_lowercase() {
    let variant: ModelVariant = serde_json::from_str("\"tswe\"").unwrap();
    assert_eq!(variant, ModelVariant::Tswe);
}

// ============================================================================
// Name resolution
// ============================================================================

#[test]
fn test_swe_single_slot() {
    let names = DensityNames::resolve(ModelVariant::Swe, 1).unwrap();
    assert_eq!(names.field_names(), ["h"]);
    assert_eq!(names.stat_names(), ["mass"]);
    assert_eq!(names.tracer_count(), 0);
}

#[test]
fn test_mce_names_in_slot_order() {
    let names = DensityNames::resolve(ModelVariant::Mce, 5).unwrap();
    assert_eq!(names.field_names(), ["rho", "Theta", "rho_v", "rho_l", "rho_i"]);
    assert_eq!(
        names.stat_names(),
        ["mass", "entropic_var_density", "vapor", "liquid", "ice"]
    );
}

#[test]
fn test_tracers_are_numbered_from_prognostic_count() {
    let names = DensityNames::resolve(ModelVariant::Tswe, 5).unwrap();
    assert_eq!(names.len(), 5);
    assert_eq!(names.prognostic_count(), 2);
    assert_eq!(names.tracer_count(), 3);
    assert_eq!(names.field_names(), ["h", "S", "T0", "T1", "T2"]);
    assert_eq!(
        names.stat_names(),
        ["mass", "bouyancy", "tracer0", "tracer1", "tracer2"]
    );
}

#[test]
fn test_resolved_length_matches_slot_count() {
    for variant in ModelVariant::ALL {
        let p = variant.prognostic_count();
        for d in p..p + 6 {
            let names = DensityNames::resolve(variant, d).unwrap();
            assert_eq!(names.len(), d);
            assert_eq!(names.field_names().len(), d);
            assert_eq!(names.stat_names().len(), d);
            for slot in p..d {
                assert_eq!(names.field_names()[slot], format!("T{}", slot - p));
                assert_eq!(names.stat_names()[slot], format!("tracer{}", slot - p));
            }
        }
    }
}

#[test]
fn test_too_few_slots_is_an_error() {
    let err = DensityNames::resolve(ModelVariant::Mce, 2).unwrap_err();
    match err {
        PlotError::InsufficientDensitySlots {
            model,
            required,
            available,
        } => {
            assert_eq!(model, ModelVariant::Mce);
            assert_eq!(required, 5);
            assert_eq!(available, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_slot_iteration() {
    let names = DensityNames::resolve(ModelVariant::Ce, 3).unwrap();
    let slots: Vec<_> = names.iter().collect();
    assert_eq!(slots.len(), 3);
    assert_eq!(slots[0].index, 0);
    assert_eq!(slots[0].field_name, "rho");
    assert_eq!(slots[1].stat_name, "entropic_var_density");
    assert_eq!(slots[2].field_name, "T0");
    assert_eq!(slots[2].stat_name, "tracer0");
    assert_eq!(names.slot(2), Some(slots[2]));
    assert!(names.slot(3).is_none());
}
