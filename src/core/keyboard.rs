use crate::core::board::BoardController;
use crate::domain::model::{ContainerId, DropTarget, ItemId, MACHINE_COUNT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCommand {
    Pickup,
    Up,
    Down,
    Left,
    Right,
    Drop,
    Cancel,
}

/// Keyboard drag driver.
///
/// Arrow keys move the drop target the way a sortable keyboard sensor does:
/// up/down walk the items of the container the dragged item is in, left/right
/// jump to the neighbouring container. Every target change is reported to the
/// board as a drag-over, so cross-container moves preview live exactly like
/// pointer drags.
#[derive(Debug, Clone, Default)]
pub struct KeyboardSensor {
    over: Option<DropTarget>,
}

impl KeyboardSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn over(&self) -> Option<&DropTarget> {
        self.over.as_ref()
    }

    /// Handles one key. `focused` is the item holding keyboard focus and is
    /// only consulted by `Pickup`. Returns whether the board changed.
    pub fn press(
        &mut self,
        board: &mut BoardController,
        key: KeyCommand,
        focused: Option<&ItemId>,
    ) -> bool {
        match key {
            KeyCommand::Pickup => {
                self.pick_up(board, focused);
                false
            }
            KeyCommand::Up => self.step(board, -1),
            KeyCommand::Down => self.step(board, 1),
            KeyCommand::Left => self.jump(board, -1),
            KeyCommand::Right => self.jump(board, 1),
            KeyCommand::Drop => {
                let Some(active) = board.active().cloned() else {
                    return false;
                };
                let over = self.over.take();
                board.on_drag_end(&active, over.as_ref())
            }
            KeyCommand::Cancel => {
                self.over = None;
                match board.active().cloned() {
                    Some(active) => board.on_drag_end(&active, None),
                    None => false,
                }
            }
        }
    }

    fn pick_up(&mut self, board: &mut BoardController, focused: Option<&ItemId>) {
        if board.is_dragging() {
            tracing::debug!("Pickup ignored: a drag is already in progress");
            return;
        }
        let Some(item) = focused else {
            tracing::debug!("Pickup ignored: nothing focused");
            return;
        };
        if board.state().locate(item).is_none() {
            tracing::debug!("Pickup ignored: {} is not on the board", item);
            return;
        }
        board.on_drag_start(item.clone());
        self.over = Some(DropTarget::Item(item.clone()));
    }

    fn step(&mut self, board: &mut BoardController, delta: isize) -> bool {
        let Some(active) = board.active().cloned() else {
            return false;
        };
        let Some(container) = board.state().locate(&active) else {
            return false;
        };
        let items = board.state().items(container);

        let current = match &self.over {
            Some(DropTarget::Item(over)) => board.state().position(container, over),
            _ => None,
        }
        .or_else(|| board.state().position(container, &active));
        let Some(current) = current else {
            return false;
        };

        let Some(next) = current.checked_add_signed(delta).filter(|next| *next < items.len()) else {
            return false;
        };
        let target = DropTarget::Item(items[next].clone());
        let changed = board.on_drag_over(&active, Some(&target));
        self.over = Some(target);
        changed
    }

    fn jump(&mut self, board: &mut BoardController, delta: isize) -> bool {
        let Some(active) = board.active().cloned() else {
            return false;
        };
        let Some(container) = board.state().locate(&active) else {
            return false;
        };
        let Some(slot) = container
            .slot()
            .and_then(|slot| slot.checked_add_signed(delta))
            .filter(|slot| *slot <= MACHINE_COUNT)
        else {
            return false;
        };
        let neighbour = ContainerId::all().nth(slot).unwrap_or(container);
        let target = DropTarget::Container(neighbour);
        let changed = board.on_drag_over(&active, Some(&target));
        self.over = Some(target);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::BoardState;

    fn id(value: &str) -> ItemId {
        ItemId::new(value)
    }

    fn contents(board: &BoardController, container: ContainerId) -> Vec<&str> {
        board.state().items(container).iter().map(ItemId::as_str).collect()
    }

    fn board() -> BoardController {
        BoardController::new(BoardState::from_containers([
            (ContainerId::Pool, vec!["P"]),
            (ContainerId::Machine(1), vec!["A", "B", "C"]),
        ]))
    }

    #[test]
    fn test_pickup_and_drop_in_place() {
        let mut board = board();
        let mut keys = KeyboardSensor::new();

        keys.press(&mut board, KeyCommand::Pickup, Some(&id("B")));
        assert_eq!(board.active(), Some(&id("B")));

        assert!(!keys.press(&mut board, KeyCommand::Drop, None));
        assert!(board.active().is_none());
        assert_eq!(contents(&board, ContainerId::Machine(1)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_down_then_drop_reorders() {
        let mut board = board();
        let mut keys = KeyboardSensor::new();

        keys.press(&mut board, KeyCommand::Pickup, Some(&id("A")));
        keys.press(&mut board, KeyCommand::Down, None);
        keys.press(&mut board, KeyCommand::Down, None);
        assert_eq!(keys.over(), Some(&DropTarget::Item(id("C"))));
        // 已經在最後一個，不再移動
        keys.press(&mut board, KeyCommand::Down, None);
        assert_eq!(keys.over(), Some(&DropTarget::Item(id("C"))));

        assert!(keys.press(&mut board, KeyCommand::Drop, None));
        assert_eq!(contents(&board, ContainerId::Machine(1)), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_up_at_top_stays() {
        let mut board = board();
        let mut keys = KeyboardSensor::new();

        keys.press(&mut board, KeyCommand::Pickup, Some(&id("A")));
        assert!(!keys.press(&mut board, KeyCommand::Up, None));
        assert_eq!(keys.over(), Some(&DropTarget::Item(id("A"))));
    }

    #[test]
    fn test_right_moves_to_next_container_live() {
        let mut board = board();
        let mut keys = KeyboardSensor::new();

        keys.press(&mut board, KeyCommand::Pickup, Some(&id("B")));
        assert!(keys.press(&mut board, KeyCommand::Right, None));
        assert_eq!(contents(&board, ContainerId::Machine(1)), vec!["A", "C"]);
        assert_eq!(contents(&board, ContainerId::Machine(2)), vec!["B"]);

        assert!(!keys.press(&mut board, KeyCommand::Drop, None));
        assert!(board.active().is_none());
        assert_eq!(contents(&board, ContainerId::Machine(2)), vec!["B"]);
    }

    #[test]
    fn test_left_from_pool_is_noop() {
        let mut board = board();
        let mut keys = KeyboardSensor::new();

        keys.press(&mut board, KeyCommand::Pickup, Some(&id("P")));
        assert!(!keys.press(&mut board, KeyCommand::Left, None));
        assert_eq!(contents(&board, ContainerId::Pool), vec!["P"]);
    }

    #[test]
    fn test_right_stops_at_last_machine() {
        let mut board = board();
        let mut keys = KeyboardSensor::new();

        keys.press(&mut board, KeyCommand::Pickup, Some(&id("P")));
        for _ in 0..10 {
            keys.press(&mut board, KeyCommand::Right, None);
        }
        assert_eq!(contents(&board, ContainerId::Machine(6)), vec!["P"]);
        assert!(board.state().items(ContainerId::Pool).is_empty());
    }

    #[test]
    fn test_cancel_keeps_preview_and_clears_active() {
        let mut board = board();
        let mut keys = KeyboardSensor::new();

        keys.press(&mut board, KeyCommand::Pickup, Some(&id("A")));
        keys.press(&mut board, KeyCommand::Left, None);
        assert!(!keys.press(&mut board, KeyCommand::Cancel, None));

        assert!(board.active().is_none());
        assert!(keys.over().is_none());
        assert_eq!(contents(&board, ContainerId::Pool), vec!["P", "A"]);
    }

    #[test]
    fn test_keys_without_drag_are_ignored() {
        let mut board = board();
        let mut keys = KeyboardSensor::new();

        for key in [KeyCommand::Up, KeyCommand::Down, KeyCommand::Left, KeyCommand::Right, KeyCommand::Drop] {
            assert!(!keys.press(&mut board, key, None));
        }
        keys.press(&mut board, KeyCommand::Pickup, Some(&id("ghost")));
        assert!(!board.is_dragging());
        keys.press(&mut board, KeyCommand::Pickup, None);
        assert!(!board.is_dragging());
    }
}
