//! Node and link boundary status.

use std::fmt;

/// Boundary classification of a node.
///
/// The numeric codes returned by [`NodeStatus::code`] are stable and match
/// the conventional landscape-model encoding (0 = core ... 4 = closed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NodeStatus {
    /// Interior node updated by the normal rules of every component.
    #[default]
    Core,
    /// Boundary node whose value is held fixed.
    FixedValue,
    /// Boundary node whose gradient toward its core neighbour is held fixed.
    FixedGradient,
    /// Boundary node that tracks its counterpart on the opposite edge.
    Looped,
    /// Boundary node that carries no flux at all.
    Closed,
}

impl NodeStatus {
    /// Stable numeric code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Core => 0,
            Self::FixedValue => 1,
            Self::FixedGradient => 2,
            Self::Looped => 3,
            Self::Closed => 4,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Core),
            1 => Some(Self::FixedValue),
            2 => Some(Self::FixedGradient),
            3 => Some(Self::Looped),
            4 => Some(Self::Closed),
            _ => None,
        }
    }

    /// Any status other than [`NodeStatus::Core`].
    pub const fn is_boundary(self) -> bool {
        !matches!(self, Self::Core)
    }

    /// A boundary node that can still exchange flux with the interior.
    pub const fn is_open_boundary(self) -> bool {
        matches!(self, Self::FixedValue | Self::FixedGradient | Self::Looped)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Core => "core",
            Self::FixedValue => "fixed-value",
            Self::FixedGradient => "fixed-gradient",
            Self::Looped => "looped",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Boundary kinds accepted by the per-edge setters.
///
/// A narrower type than [`NodeStatus`]: an edge can never be made core,
/// and looped edges are set in opposite pairs through their own operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// See [`NodeStatus::Closed`].
    Closed,
    /// See [`NodeStatus::FixedValue`].
    FixedValue,
    /// See [`NodeStatus::FixedGradient`].
    FixedGradient,
}

impl From<BoundaryKind> for NodeStatus {
    fn from(kind: BoundaryKind) -> Self {
        match kind {
            BoundaryKind::Closed => NodeStatus::Closed,
            BoundaryKind::FixedValue => NodeStatus::FixedValue,
            BoundaryKind::FixedGradient => NodeStatus::FixedGradient,
        }
    }
}

/// Derived status of a link.
///
/// Never set directly: it is a pure function of the status of the link's
/// two end nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    /// Carries flux: no closed endpoint and at least one core endpoint.
    Active,
    /// Carries no flux.
    Inactive,
}

impl LinkStatus {
    /// Status of a link joining nodes with statuses `tail` and `head`.
    pub fn from_endpoints(tail: NodeStatus, head: NodeStatus) -> Self {
        let closed = tail == NodeStatus::Closed || head == NodeStatus::Closed;
        let has_core = tail == NodeStatus::Core || head == NodeStatus::Core;
        if !closed && has_core {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// `true` for [`LinkStatus::Active`].
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}
