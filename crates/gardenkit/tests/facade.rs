//! The facade re-exports enough to drive a garden end to end.

use gardenkit::prelude::*;
use gardenkit::{Error, strict_config_with};
use pretty_assertions::assert_eq;

#[test]
fn strict_config_reports_first_bad_value() {
    let err = strict_config_with(|key| match key {
        "GARDENKIT_BULK_COLUMNS" => Some("0".to_string()),
        _ => None,
    })
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("GARDENKIT_BULK_COLUMNS"));
}

#[test]
fn strict_config_accepts_valid_env() {
    let config = strict_config_with(|key| match key {
        "GARDENKIT_NAMESPACE" => Some("plot".to_string()),
        "GARDENKIT_SEASON" => Some("spring".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.namespace, "plot");

    let garden = Garden::in_memory(config);
    assert_eq!(garden.season(), "spring");
}

#[test]
fn prelude_places_a_plant() {
    let mut garden = Garden::in_memory(GardenConfig::default());
    let carrot = garden.add_plant(PlantDraft::new("Carrot", "Root")).unwrap();
    garden
        .place_plant(&carrot, &BedId::new("bed-1"), 0.1, 0.9)
        .unwrap();

    let layout = garden.layout();
    let position = layout.positions().get(&carrot).unwrap();
    assert_eq!(position.bed_id, BedId::new("bed-1"));
    assert_eq!(garden.stats().placed_plants, 1);
}
