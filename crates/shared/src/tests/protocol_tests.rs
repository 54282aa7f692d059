use crate::{
    domain::{CellState, Coord, Quantity, ShelfAttributes},
    error::{ApiError, ErrorCode},
    protocol::{Positions, RemovePositionRequest, ShelfLookupEntry, ShelfPlacement, ShelfRecord},
};

#[test]
fn shelf_record_reads_position_pair_and_flattened_stock() {
    let record: ShelfRecord = serde_json::from_value(serde_json::json!({
        "position": [3, 4],
        "flower": "tulip",
        "color": "red",
        "quantity": 12
    }))
    .expect("shelf record");

    assert_eq!(record.coord(), Coord::new(3, 4));
    assert_eq!(record.attributes.flower, "tulip");
    assert_eq!(record.attributes.quantity, Quantity::from(12_u32));
}

#[test]
fn quantity_entered_as_text_is_accepted() {
    let entry: ShelfLookupEntry = serde_json::from_value(serde_json::json!({
        "flower": "rose",
        "color": "white",
        "quantity": " 7 "
    }))
    .expect("lookup entry");

    assert_eq!(entry.position, None);
    assert_eq!(entry.attributes.quantity, Quantity::from(" 7 "));
}

#[test]
fn fractional_and_negative_quantities_load_as_stored() {
    let records: Vec<ShelfRecord> = serde_json::from_value(serde_json::json!([
        { "position": [1, 1], "flower": "rose", "color": "white", "quantity": "2.5" },
        { "position": [2, 2], "flower": "lily", "color": "pink", "quantity": 4 },
        { "position": [3, 3], "flower": "iris", "color": "blue", "quantity": -3 },
        { "position": [4, 4], "flower": "aster", "color": "red", "quantity": 0.75 }
    ]))
    .expect("every shelf loads");

    let shown: Vec<String> = records
        .iter()
        .map(|record| record.attributes.quantity.to_string())
        .collect();
    assert_eq!(shown, vec!["2.5", "4", "-3", "0.75"]);

    assert_eq!(
        serde_json::to_value(&records[0].attributes).expect("json")["quantity"],
        serde_json::json!("2.5")
    );
    assert_eq!(
        serde_json::to_value(&records[3].attributes).expect("json")["quantity"],
        serde_json::json!(0.75)
    );
}

#[test]
fn shelf_placement_serializes_flat() {
    let placement = ShelfPlacement::new(
        Coord::new(1, 2),
        ShelfAttributes {
            flower: "lily".to_string(),
            color: "yellow".to_string(),
            quantity: 3_u32.into(),
        },
    );

    assert_eq!(
        serde_json::to_value(&placement).expect("json"),
        serde_json::json!({
            "row": 1,
            "col": 2,
            "flower": "lily",
            "color": "yellow",
            "quantity": 3
        })
    );
}

#[test]
fn single_and_multiple_positions_use_distinct_shapes() {
    let one = RemovePositionRequest {
        position: Positions::One(Coord::new(0, 1)),
    };
    let many = RemovePositionRequest {
        position: Positions::Many(vec![Coord::new(0, 1), Coord::new(2, 2)]),
    };

    assert_eq!(
        serde_json::to_value(&one).expect("json"),
        serde_json::json!({ "position": { "row": 0, "col": 1 } })
    );
    assert_eq!(
        serde_json::to_value(&many).expect("json"),
        serde_json::json!({ "position": [{ "row": 0, "col": 1 }, { "row": 2, "col": 2 }] })
    );
}

#[test]
fn bare_message_error_body_defaults_to_internal() {
    let err: ApiError =
        serde_json::from_str(r#"{"message":"No path found"}"#).expect("error body");
    assert_eq!(err.code, ErrorCode::Internal);
    assert_eq!(err.message, "No path found");
}

#[test]
fn only_start_and_goal_are_markers() {
    assert!(CellState::Start.is_marker());
    assert!(CellState::Goal.is_marker());
    assert!(!CellState::Shelf.is_marker());
    assert_eq!(CellState::Obstacle.to_string(), "obstacle");
}
