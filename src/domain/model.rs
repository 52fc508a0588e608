use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the order pool container.
pub const POOL_ID: &str = "allOrders";

/// Number of machine slots next to the pool.
pub const MACHINE_COUNT: usize = 6;

/// Opaque order token. Seeded data uses short labels, CSV imports use the
/// comma-joined fields of one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One of the seven fixed containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerId {
    Pool,
    /// 印刷機 1..=6
    Machine(u8),
}

impl ContainerId {
    /// Board order: pool first, then machines 1..=6.
    pub fn all() -> impl Iterator<Item = ContainerId> {
        std::iter::once(ContainerId::Pool)
            .chain((1..=MACHINE_COUNT as u8).map(ContainerId::Machine))
    }

    /// Position of this container in board order; `None` for machine
    /// numbers outside 1..=6.
    pub fn slot(self) -> Option<usize> {
        match self {
            ContainerId::Pool => Some(0),
            ContainerId::Machine(n) if (1..=MACHINE_COUNT).contains(&usize::from(n)) => Some(usize::from(n)),
            ContainerId::Machine(_) => None,
        }
    }

    /// `allOrders` / `container1` .. `container6`; anything else is not a container.
    pub fn parse(value: &str) -> Option<Self> {
        if value == POOL_ID {
            return Some(ContainerId::Pool);
        }
        match value.strip_prefix("container")?.as_bytes() {
            [digit @ b'1'..=b'9'] if usize::from(digit - b'0') <= MACHINE_COUNT => {
                Some(ContainerId::Machine(digit - b'0'))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Pool => f.write_str(POOL_ID),
            ContainerId::Machine(n) => write!(f, "container{}", n),
        }
    }
}

impl Serialize for ContainerId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContainerId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ContainerId::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown container: {}", raw)))
    }
}

/// The thing under the pointer: a container or an item.
///
/// Event payloads carry a bare string, the same namespace the gesture layer
/// uses; container identifiers win over equally named items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Container(ContainerId),
    Item(ItemId),
}

impl DropTarget {
    pub fn from_raw(raw: &str) -> Self {
        match ContainerId::parse(raw) {
            Some(container) => DropTarget::Container(container),
            None => DropTarget::Item(ItemId::new(raw)),
        }
    }
}

impl Serialize for DropTarget {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DropTarget::Container(container) => serializer.collect_str(container),
            DropTarget::Item(item) => serializer.serialize_str(item.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for DropTarget {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DropTarget::from_raw(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedVariant {
    #[default]
    Empty,
    Example,
}

impl std::str::FromStr for SeedVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "empty" => Ok(SeedVariant::Empty),
            "example" => Ok(SeedVariant::Example),
            other => Err(format!("unknown seed variant: {} (expected empty or example)", other)),
        }
    }
}

/// One parsed CSV row as the reader delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvRow {
    Fields(Vec<String>),
    /// The reader could not produce a record for this row.
    Malformed,
}

/// Serializable view of the board for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub title: String,
    pub containers: Vec<ContainerSnapshot>,
    pub active: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub id: ContainerId,
    pub label: String,
    pub items: Vec<ItemId>,
}
