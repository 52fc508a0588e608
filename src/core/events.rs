use crate::core::board::BoardController;
use crate::core::keyboard::{KeyCommand, KeyboardSensor};
use crate::domain::model::{DropTarget, ItemId};
use crate::utils::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// One input to the board, as emitted by the gesture layer or read from an
/// event script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BoardEvent {
    Start {
        active: ItemId,
    },
    Over {
        active: ItemId,
        #[serde(default)]
        over: Option<DropTarget>,
    },
    End {
        active: ItemId,
        #[serde(default)]
        over: Option<DropTarget>,
    },
    Key {
        key: KeyCommand,
        #[serde(default)]
        item: Option<ItemId>,
    },
    /// Replace the order pool with the orders of a CSV file.
    Import {
        path: String,
    },
}

/// Applies a drag or key event. Imports need I/O and are left to the
/// session; for them this returns `false` without touching the board.
pub fn apply_event(board: &mut BoardController, keyboard: &mut KeyboardSensor, event: &BoardEvent) -> bool {
    match event {
        BoardEvent::Start { active } => {
            board.on_drag_start(active.clone());
            false
        }
        BoardEvent::Over { active, over } => board.on_drag_over(active, over.as_ref()),
        BoardEvent::End { active, over } => board.on_drag_end(active, over.as_ref()),
        BoardEvent::Key { key, item } => {
            let changed = keyboard.press(board, *key, item.as_ref());
            tracing::debug!("Key {:?}: target now {:?}", key, keyboard.over());
            changed
        }
        BoardEvent::Import { .. } => false,
    }
}

/// Parses a JSON array of events.
pub fn parse_script(content: &str) -> Result<Vec<BoardEvent>> {
    let events: Vec<BoardEvent> = serde_json::from_str(content)?;
    validate_script(&events)?;
    Ok(events)
}

fn validate_script(events: &[BoardEvent]) -> Result<()> {
    for (index, event) in events.iter().enumerate() {
        match event {
            BoardEvent::Key {
                key: KeyCommand::Pickup,
                item: None,
            } => {
                return Err(BoardError::ScriptError {
                    message: format!("event {}: pickup needs an \"item\"", index),
                });
            }
            BoardEvent::Import { path } => {
                crate::utils::validation::validate_path(&format!("events[{}].path", index), path)?;
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::BoardState;
    use crate::domain::model::ContainerId;

    #[test]
    fn test_parse_script() {
        let script = r#"[
            {"type": "start", "active": "B"},
            {"type": "over", "active": "B", "over": "container2"},
            {"type": "over", "active": "B"},
            {"type": "end", "active": "B", "over": "X"},
            {"type": "key", "key": "pickup", "item": "A"},
            {"type": "key", "key": "right"},
            {"type": "import", "path": "orders.csv"}
        ]"#;

        let events = parse_script(script).unwrap();
        assert_eq!(events.len(), 7);
        assert_eq!(
            events[1],
            BoardEvent::Over {
                active: ItemId::new("B"),
                over: Some(DropTarget::Container(ContainerId::Machine(2))),
            }
        );
        assert_eq!(
            events[2],
            BoardEvent::Over {
                active: ItemId::new("B"),
                over: None,
            }
        );
        assert_eq!(
            events[3],
            BoardEvent::End {
                active: ItemId::new("B"),
                over: Some(DropTarget::Item(ItemId::new("X"))),
            }
        );
    }

    #[test]
    fn test_parse_script_rejects_pickup_without_item() {
        let err = parse_script(r#"[{"type": "key", "key": "pickup"}]"#).unwrap_err();
        assert!(matches!(err, BoardError::ScriptError { .. }));
    }

    #[test]
    fn test_parse_script_rejects_unknown_event() {
        let err = parse_script(r#"[{"type": "teleport", "active": "A"}]"#).unwrap_err();
        assert!(matches!(err, BoardError::SerializationError(_)));
    }

    #[test]
    fn test_apply_event_sequence() {
        let mut board = BoardController::new(BoardState::from_containers([(
            ContainerId::Machine(1),
            vec!["A", "B", "C"],
        )]));
        let mut keyboard = KeyboardSensor::new();

        let events = parse_script(
            r#"[
                {"type": "start", "active": "B"},
                {"type": "over", "active": "B", "over": "container2"},
                {"type": "end", "active": "B", "over": "container2"}
            ]"#,
        )
        .unwrap();

        let changes: Vec<bool> = events
            .iter()
            .map(|event| apply_event(&mut board, &mut keyboard, event))
            .collect();

        assert_eq!(changes, vec![false, true, false]);
        assert!(board.active().is_none());
        assert_eq!(board.state().items(ContainerId::Machine(2)), &[ItemId::new("B")]);
    }
}
