use crate::domain::model::{ContainerId, DropTarget, ItemId, SeedVariant, MACHINE_COUNT};
use std::collections::{BTreeMap, HashMap};

const SLOT_COUNT: usize = MACHINE_COUNT + 1;

fn container_at(slot: usize) -> ContainerId {
    if slot == 0 {
        ContainerId::Pool
    } else {
        ContainerId::Machine(slot as u8)
    }
}

fn slot_of(container: ContainerId) -> Option<usize> {
    let slot = container.slot();
    if slot.is_none() {
        tracing::warn!("Ignoring {}: not a container on this board", container);
    }
    slot
}

/// Container contents plus a reverse index `item -> {slot -> occurrences}`.
///
/// The index answers "which container holds this token" without scanning
/// every sequence. Occurrence counts keep it exact when the same token is
/// present more than once (e.g. several blank CSV rows).
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    containers: [Vec<ItemId>; SLOT_COUNT],
    index: HashMap<ItemId, BTreeMap<usize, usize>>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_containers<I, T>(contents: I) -> Self
    where
        I: IntoIterator<Item = (ContainerId, Vec<T>)>,
        T: Into<ItemId>,
    {
        let mut state = Self::new();
        for (container, items) in contents {
            state.replace(container, items.into_iter().map(Into::into).collect());
        }
        state
    }

    pub fn seeded(variant: SeedVariant) -> Self {
        match variant {
            SeedVariant::Empty => Self::new(),
            SeedVariant::Example => Self::from_containers([
                (
                    ContainerId::Machine(1),
                    vec![
                        "20240401,山田印刷,チラシA4,5000,2024/04/05",
                        "20240402,佐藤商事,名刺,200,2024/04/03",
                        "20240403,鈴木工業,パンフレットA5,1200,2024/04/10",
                    ],
                ),
                (ContainerId::Machine(2), vec!["A", "B", "C"]),
                (ContainerId::Machine(3), vec!["D", "E"]),
                (ContainerId::Machine(4), vec!["F"]),
                (ContainerId::Machine(5), vec![]),
                (ContainerId::Machine(6), vec!["G", "H"]),
            ]),
        }
    }

    /// Items of `container`; empty for a machine number that is not on the board.
    pub fn items(&self, container: ContainerId) -> &[ItemId] {
        match container.slot() {
            Some(slot) => &self.containers[slot],
            None => &[],
        }
    }

    /// Containers in board order with their items.
    pub fn iter(&self) -> impl Iterator<Item = (ContainerId, &[ItemId])> {
        self.containers
            .iter()
            .enumerate()
            .map(|(slot, items)| (container_at(slot), items.as_slice()))
    }

    pub fn total_items(&self) -> usize {
        self.containers.iter().map(Vec::len).sum()
    }

    /// First container in board order holding `item`.
    pub fn locate(&self, item: &ItemId) -> Option<ContainerId> {
        self.index
            .get(item)
            .and_then(|slots| slots.keys().next())
            .map(|slot| container_at(*slot))
    }

    pub fn position(&self, container: ContainerId, item: &ItemId) -> Option<usize> {
        self.items(container).iter().position(|candidate| candidate == item)
    }

    pub(crate) fn replace(&mut self, container: ContainerId, items: Vec<ItemId>) {
        let Some(slot) = slot_of(container) else {
            return;
        };
        for old in std::mem::take(&mut self.containers[slot]) {
            self.unindex(&old, slot);
        }
        for item in &items {
            self.reindex(item, slot);
        }
        self.containers[slot] = items;
    }

    /// Removes the first occurrence of `item`; returns the index it had.
    pub(crate) fn remove_one(&mut self, container: ContainerId, item: &ItemId) -> Option<usize> {
        let slot = slot_of(container)?;
        let index = self.position(container, item)?;
        let removed = self.containers[slot].remove(index);
        self.unindex(&removed, slot);
        Some(index)
    }

    /// Inserts at `index`, clamped to the sequence length.
    pub(crate) fn insert(&mut self, container: ContainerId, index: usize, item: ItemId) {
        let Some(slot) = slot_of(container) else {
            return;
        };
        let index = index.min(self.containers[slot].len());
        self.reindex(&item, slot);
        self.containers[slot].insert(index, item);
    }

    /// Moves the element at `from` to `to`, keeping the relative order of
    /// everything else.
    pub(crate) fn move_within(&mut self, container: ContainerId, from: usize, to: usize) {
        let Some(slot) = slot_of(container) else {
            return;
        };
        let items = &mut self.containers[slot];
        if from >= items.len() || from == to {
            return;
        }
        let item = items.remove(from);
        let to = to.min(items.len());
        items.insert(to, item);
    }

    fn reindex(&mut self, item: &ItemId, slot: usize) {
        *self
            .index
            .entry(item.clone())
            .or_default()
            .entry(slot)
            .or_insert(0) += 1;
    }

    fn unindex(&mut self, item: &ItemId, slot: usize) {
        let Some(slots) = self.index.get_mut(item) else {
            return;
        };
        if let Some(count) = slots.get_mut(&slot) {
            *count -= 1;
            if *count == 0 {
                slots.remove(&slot);
            }
        }
        if slots.is_empty() {
            self.index.remove(item);
        }
    }
}

/// Handle for one CSV import; only the most recently issued ticket may
/// replace the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTicket(u64);

impl ImportTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Owns the board state and the active drag, and applies the drag and
/// import transitions.
///
/// A drag gesture is `Idle -> Dragging (start) -> Dragging (zero or more
/// over) -> Idle (end)`. Transitions never fail: a target that cannot be
/// resolved leaves the board untouched. The returned `bool` says whether
/// the containers changed.
#[derive(Debug, Clone, Default)]
pub struct BoardController {
    state: BoardState,
    active: Option<ItemId>,
    last_ticket: u64,
}

impl BoardController {
    pub fn new(state: BoardState) -> Self {
        Self {
            state,
            active: None,
            last_ticket: 0,
        }
    }

    pub fn seeded(variant: SeedVariant) -> Self {
        Self::new(BoardState::seeded(variant))
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn active(&self) -> Option<&ItemId> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Container holding the target, or the target itself when it names a
    /// container. `None` for tokens that are on no container (stale ids) and
    /// for machine numbers that are not on the board.
    pub fn locate_container(&self, target: &DropTarget) -> Option<ContainerId> {
        match target {
            DropTarget::Container(container) => container.slot().map(|_| *container),
            DropTarget::Item(item) => self.state.locate(item),
        }
    }

    pub fn on_drag_start(&mut self, active: ItemId) {
        if let Some(previous) = self.active.replace(active.clone()) {
            tracing::debug!("Drag start for {} replaces unfinished drag of {}", active, previous);
        } else {
            tracing::debug!("Drag start: {}", active);
        }
    }

    /// Live cross-container move while the pointer is over a foreign container.
    pub fn on_drag_over(&mut self, active: &ItemId, over: Option<&DropTarget>) -> bool {
        let Some(over) = over else {
            return false;
        };
        let Some((source, destination)) = self.resolve(active, over) else {
            return false;
        };
        if source == destination {
            return false;
        }

        let destination_items = self.state.items(destination);
        let new_index = match over {
            DropTarget::Container(_) => destination_items.len(),
            DropTarget::Item(over_item) => {
                match self.state.position(destination, over_item) {
                    // 停在最後一個項目上時，插入到它的後面
                    Some(index) if index + 1 == destination_items.len() => index + 1,
                    Some(index) => index,
                    None => destination_items.len(),
                }
            }
        };

        if self.state.remove_one(source, active).is_none() {
            return false;
        }
        self.state.insert(destination, new_index, active.clone());
        tracing::debug!(
            "Moved {} from {} to {} at index {}",
            active,
            source,
            destination,
            new_index
        );
        true
    }

    /// Settles the gesture: reorders within one container when the target
    /// is in the active item's container, then clears the active drag.
    pub fn on_drag_end(&mut self, active: &ItemId, over: Option<&DropTarget>) -> bool {
        let reordered = over.is_some_and(|over| self.reorder(active, over));
        self.active = None;
        reordered
    }

    fn reorder(&mut self, active: &ItemId, over: &DropTarget) -> bool {
        let Some((source, destination)) = self.resolve(active, over) else {
            return false;
        };
        if source != destination {
            // 跨容器的移動已經在 drag over 時處理
            return false;
        }

        let Some(old_index) = self.state.position(source, active) else {
            return false;
        };
        let new_index = match over {
            DropTarget::Container(_) => self.state.items(source).len().saturating_sub(1),
            DropTarget::Item(over_item) => match self.state.position(source, over_item) {
                Some(index) => index,
                None => return false,
            },
        };

        if old_index == new_index {
            return false;
        }
        self.state.move_within(source, old_index, new_index);
        tracing::debug!("Reordered {} in {}: {} -> {}", active, source, old_index, new_index);
        true
    }

    fn resolve(&self, active: &ItemId, over: &DropTarget) -> Option<(ContainerId, ContainerId)> {
        if ContainerId::parse(active.as_str()).is_some() {
            tracing::debug!("Ignoring drag of container {}", active);
            return None;
        }
        let source = self.state.locate(active);
        let destination = self.locate_container(over);
        match (source, destination) {
            (Some(source), Some(destination)) => Some((source, destination)),
            _ => {
                tracing::debug!("Ignoring drag of {}: container not found", active);
                None
            }
        }
    }

    /// Replaces the pool wholesale.
    pub fn replace_pool(&mut self, orders: Vec<ItemId>) {
        tracing::info!("Order pool replaced with {} orders", orders.len());
        self.state.replace(ContainerId::Pool, orders);
    }

    pub fn begin_import(&mut self) -> ImportTicket {
        self.last_ticket += 1;
        ImportTicket(self.last_ticket)
    }

    /// Applies an import result unless a newer import was started since.
    pub fn complete_import(&mut self, ticket: ImportTicket, orders: Vec<ItemId>) -> bool {
        if ticket.0 != self.last_ticket {
            tracing::warn!(
                "Discarding stale CSV import #{} (latest is #{})",
                ticket.0,
                self.last_ticket
            );
            return false;
        }
        self.replace_pool(orders);
        true
    }
}
