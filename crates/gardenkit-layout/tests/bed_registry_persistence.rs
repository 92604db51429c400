use std::collections::HashMap;

use gardenkit_core::geometry::GridPosition;
use gardenkit_core::id::{BedId, PlantId};
use gardenkit_layout::capacity::garden_capacity;
use gardenkit_layout::{
    BedDraft, BedRegistry, BedType, GardenBed, GardenBoundary, GardenLayout, PositionStore,
};
use pretty_assertions::assert_eq;

#[test]
fn registry_survives_json_round_trip() {
    let mut registry = BedRegistry::with_example_beds();
    registry.add(BedDraft::new("Pots", 1, 1).with_type(BedType::Container));
    registry.add_bulk(BedDraft::new("Row", 3, 1).with_type(BedType::Ground), 3, 6);

    let json = serde_json::to_string(registry.beds()).unwrap();
    let reloaded = BedRegistry::from_beds(serde_json::from_str::<Vec<GardenBed>>(&json).unwrap());
    assert_eq!(reloaded, registry);
}

#[test]
fn reloaded_registry_keeps_allocating_fresh_ids() {
    let registry = BedRegistry::with_example_beds();
    let json = serde_json::to_string(registry.beds()).unwrap();
    let mut reloaded = BedRegistry::from_beds(serde_json::from_str(&json).unwrap());
    let id = reloaded.add(BedDraft::new("New", 2, 2)).unwrap();
    assert_eq!(id, BedId::new("bed-3"));
}

#[test]
fn stored_bed_json_uses_type_field_and_sentinel() {
    let json = r#"[{"id":"bed-7","name":"Legacy","width":3,"height":2,"type":"ground"}]"#;
    let registry = BedRegistry::from_beds(serde_json::from_str(json).unwrap());
    let bed = registry.get(&BedId::new("bed-7")).unwrap();
    assert_eq!(bed.bed_type, BedType::Ground);
    assert_eq!(bed.position, GridPosition::UNPLACED);

    let value = serde_json::to_value(bed).unwrap();
    assert_eq!(value["type"], "ground");
    assert_eq!(value["position"]["x"], -1);
}

#[test]
fn capacity_across_layout() {
    let mut beds = BedRegistry::default();
    let small = beds.add(BedDraft::new("Small", 2, 2).at(0, 0)).unwrap();
    let big = beds.add(BedDraft::new("Big", 4, 4).at(3, 0)).unwrap();
    let mut layout = GardenLayout::new(beds, PositionStore::new(), GardenBoundary::default());
    layout.place_plant(PlantId::new("tomato"), &small, 0.25, 0.25);
    layout.place_plant(PlantId::new("squash"), &small, 0.75, 0.75);
    layout.place_plant(PlantId::new("basil"), &big, 0.5, 0.5);

    let space: HashMap<PlantId, f64> = [
        (PlantId::new("tomato"), 3.0),
        (PlantId::new("squash"), 3.0),
        (PlantId::new("basil"), 1.0),
    ]
    .into();
    let report = garden_capacity(&layout, &space);

    assert_eq!(report.len(), 2);
    assert_eq!((report[0].used, report[0].total, report[0].overcrowded), (6.0, 4.0, true));
    assert_eq!((report[1].used, report[1].total, report[1].overcrowded), (1.0, 16.0, false));
    assert_eq!(report[1].utilization_pct, 6.25);
}
