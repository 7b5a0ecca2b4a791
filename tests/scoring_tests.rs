//! Scoring tests - event values, rounding and batch additivity

use jelly_cascade::core::{combo_multiplier, score_batch, score_event, ScoreEvent};
use jelly_cascade::types::PowerupKind;

#[test]
fn test_reference_values() {
    let cases = [
        (
            ScoreEvent::Clear {
                tiles: 3,
                chain_index: 0,
            },
            30,
        ),
        (
            ScoreEvent::Clear {
                tiles: 4,
                chain_index: 2,
            },
            80,
        ),
        (
            ScoreEvent::Powerup {
                kind: PowerupKind::Laser,
                tiles: 10,
                chain_index: 1,
            },
            195,
        ),
        (
            ScoreEvent::Powerup {
                kind: PowerupKind::Bomb,
                tiles: 12,
                chain_index: 3,
            },
            420,
        ),
        (
            ScoreEvent::Powerup {
                kind: PowerupKind::Laser,
                tiles: 7,
                chain_index: 1,
            },
            137,
        ),
        (ScoreEvent::BonusGranted, 150),
        (ScoreEvent::BonusUsed { row: 2 }, 100),
    ];
    for (event, expected) in cases {
        assert_eq!(score_event(&event), expected, "{:?}", event);
    }
}

#[test]
fn test_batch_equals_sum_of_parts() {
    let events: Vec<ScoreEvent> = (0..6)
        .flat_map(|chain_index| {
            [
                ScoreEvent::Clear {
                    tiles: 3 + chain_index,
                    chain_index,
                },
                ScoreEvent::Powerup {
                    kind: PowerupKind::Bomb,
                    tiles: 5 + chain_index,
                    chain_index,
                },
            ]
        })
        .chain([ScoreEvent::BonusGranted, ScoreEvent::BonusUsed { row: 0 }])
        .collect();

    let pointwise: u64 = events.iter().map(score_event).sum();
    assert_eq!(score_batch(&events), pointwise);
}

#[test]
fn test_combo_multiplier_is_integer_step() {
    let values: Vec<u64> = (0..5).map(combo_multiplier).collect();
    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_score_event_serializes_with_type_tag() {
    let json = serde_json::to_string(&ScoreEvent::Clear {
        tiles: 3,
        chain_index: 1,
    })
    .unwrap();
    assert_eq!(json, r#"{"type":"clear","tiles":3,"chain_index":1}"#);
}
