pub mod container_view;
pub mod item_view;

use crate::core::board::BoardController;
use crate::domain::model::{BoardSnapshot, ContainerId, ContainerSnapshot};
use crate::domain::ports::ConfigProvider;
use container_view::{render_container, ContainerView};

pub const DEFAULT_TITLE: &str = "生産計画システム";
pub const DEFAULT_POOL_LABEL: &str = "注文一覧";
pub const DEFAULT_MACHINE_PREFIX: &str = "印刷機";

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLabels {
    pub title: String,
    pub pool: String,
    pub machine_prefix: String,
}

impl Default for BoardLabels {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            pool: DEFAULT_POOL_LABEL.to_string(),
            machine_prefix: DEFAULT_MACHINE_PREFIX.to_string(),
        }
    }
}

impl BoardLabels {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            title: config.title().to_string(),
            pool: config.pool_label().to_string(),
            machine_prefix: config.machine_prefix().to_string(),
        }
    }

    pub fn label_for(&self, container: ContainerId) -> String {
        match container {
            ContainerId::Pool => self.pool.clone(),
            ContainerId::Machine(n) => format!("{}{}", self.machine_prefix, n),
        }
    }
}

/// Title, then the seven containers side by side, then the drag overlay
/// when a drag is in progress.
pub fn render_board(board: &BoardController, labels: &BoardLabels) -> String {
    let columns: Vec<ContainerView> = board
        .state()
        .iter()
        .map(|(container, items)| render_container(&labels.label_for(container), items))
        .collect();
    let rows = columns.iter().map(|c| c.lines.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&labels.title);
    out.push_str("\n\n");
    for row in 0..rows {
        let line = columns
            .iter()
            .map(|column| column.padded_line(row))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if let Some(active) = board.active() {
        out.push('\n');
        out.push_str(&item_view::render_overlay(active));
        out.push('\n');
    }
    out
}

pub fn snapshot(board: &BoardController, labels: &BoardLabels) -> BoardSnapshot {
    BoardSnapshot {
        title: labels.title.clone(),
        containers: board
            .state()
            .iter()
            .map(|(container, items)| ContainerSnapshot {
                id: container,
                label: labels.label_for(container),
                items: items.to_vec(),
            })
            .collect(),
        active: board.active().cloned(),
    }
}
