//! Service-order lifecycle states.

use serde::{Deserialize, Serialize};

/// Where a vehicle is in the repair workflow.
///
/// Lifecycle order: reception → quotation → process → quality → completed → delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    #[default]
    Reception,
    Quotation,
    Process,
    Quality,
    Completed,
    Delivered,
}

impl OrderState {
    /// All states in lifecycle order.
    pub const ALL: [OrderState; 6] = [
        OrderState::Reception,
        OrderState::Quotation,
        OrderState::Process,
        OrderState::Quality,
        OrderState::Completed,
        OrderState::Delivered,
    ];

    /// Parse the wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reception" => Some(Self::Reception),
            "quotation" => Some(Self::Quotation),
            "process" => Some(Self::Process),
            "quality" => Some(Self::Quality),
            "completed" => Some(Self::Completed),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reception => "reception",
            Self::Quotation => "quotation",
            Self::Process => "process",
            Self::Quality => "quality",
            Self::Completed => "completed",
            Self::Delivered => "delivered",
        }
    }

    /// Human readable label used in notifications and documents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reception => "Received",
            Self::Quotation => "Awaiting quotation approval",
            Self::Process => "In repair",
            Self::Quality => "Quality inspection",
            Self::Completed => "Ready for pickup",
            Self::Delivered => "Delivered",
        }
    }

    /// The state that follows this one, if any.
    pub fn next(&self) -> Option<Self> {
        let index = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(index + 1).copied()
    }

    /// Whether an order may move from `self` to `target` through the
    /// transition endpoint: one step forward, or back from quality to process
    /// when the inspection fails.
    pub fn can_transition_to(&self, target: OrderState) -> bool {
        self.next() == Some(target)
            || (*self == OrderState::Quality && target == OrderState::Process)
    }

    /// No further transitions once the vehicle is handed back.
    pub fn is_terminal(&self) -> bool {
        *self == OrderState::Delivered
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
