//! Architectural role kinds a type can be classified into.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Role family a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationTarget {
    Domain,
    Port,
    Model,
}

impl ClassificationTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "DOMAIN",
            Self::Port => "PORT",
            Self::Model => "MODEL",
        }
    }
}

impl fmt::Display for ClassificationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainKind {
    AggregateRoot,
    Entity,
    ValueObject,
    Identifier,
    DomainEvent,
    DomainService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortKind {
    UseCase,
    Command,
    Query,
    Repository,
    Gateway,
    EventPublisher,
    DrivenPort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelKind {
    CommandModel,
    QueryModel,
    Dto,
}

/// Whether a port is invoked into the core or by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortDirection {
    Driving,
    Driven,
}

impl PortKind {
    pub fn direction(&self) -> PortDirection {
        match self {
            Self::UseCase | Self::Command | Self::Query => PortDirection::Driving,
            Self::Repository | Self::Gateway | Self::EventPublisher | Self::DrivenPort => {
                PortDirection::Driven
            }
        }
    }
}

/// A kind from any role family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleKind {
    Domain(DomainKind),
    Port(PortKind),
    Model(ModelKind),
}

impl RoleKind {
    pub fn target(&self) -> ClassificationTarget {
        match self {
            Self::Domain(_) => ClassificationTarget::Domain,
            Self::Port(_) => ClassificationTarget::Port,
            Self::Model(_) => ClassificationTarget::Model,
        }
    }

    pub fn port_direction(&self) -> Option<PortDirection> {
        match self {
            Self::Port(kind) => Some(kind.direction()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain(DomainKind::AggregateRoot) => "AGGREGATE_ROOT",
            Self::Domain(DomainKind::Entity) => "ENTITY",
            Self::Domain(DomainKind::ValueObject) => "VALUE_OBJECT",
            Self::Domain(DomainKind::Identifier) => "IDENTIFIER",
            Self::Domain(DomainKind::DomainEvent) => "DOMAIN_EVENT",
            Self::Domain(DomainKind::DomainService) => "DOMAIN_SERVICE",
            Self::Port(PortKind::UseCase) => "USE_CASE",
            Self::Port(PortKind::Command) => "COMMAND",
            Self::Port(PortKind::Query) => "QUERY",
            Self::Port(PortKind::Repository) => "REPOSITORY",
            Self::Port(PortKind::Gateway) => "GATEWAY",
            Self::Port(PortKind::EventPublisher) => "EVENT_PUBLISHER",
            Self::Port(PortKind::DrivenPort) => "DRIVEN_PORT",
            Self::Model(ModelKind::CommandModel) => "COMMAND_MODEL",
            Self::Model(ModelKind::QueryModel) => "QUERY_MODEL",
            Self::Model(ModelKind::Dto) => "DTO",
        }
    }

    /// Whether two kinds may both describe the same type without a conflict.
    ///
    /// ```
    /// use archlens::classification::{DomainKind, PortKind, RoleKind};
    ///
    /// let root = RoleKind::Domain(DomainKind::AggregateRoot);
    /// let entity = RoleKind::Domain(DomainKind::Entity);
    /// assert!(root.is_compatible_with(&entity));
    /// assert!(!root.is_compatible_with(&RoleKind::Domain(DomainKind::ValueObject)));
    /// assert!(RoleKind::Port(PortKind::Repository)
    ///     .is_compatible_with(&RoleKind::Port(PortKind::DrivenPort)));
    /// ```
    pub fn is_compatible_with(&self, other: &RoleKind) -> bool {
        use DomainKind::*;
        if self == other {
            return true;
        }
        match (self, other) {
            (Self::Domain(a), Self::Domain(b)) => matches!(
                (a, b),
                (AggregateRoot, Entity)
                    | (Entity, AggregateRoot)
                    | (ValueObject, Identifier)
                    | (Identifier, ValueObject)
            ),
            (Self::Port(a), Self::Port(b)) => match (a.direction(), b.direction()) {
                (PortDirection::Driving, PortDirection::Driving) => true,
                (PortDirection::Driven, PortDirection::Driven) => {
                    *a == PortKind::DrivenPort || *b == PortKind::DrivenPort
                }
                _ => false,
            },
            _ => false,
        }
    }

    pub const ALL: [RoleKind; 16] = [
        RoleKind::Domain(DomainKind::AggregateRoot),
        RoleKind::Domain(DomainKind::Entity),
        RoleKind::Domain(DomainKind::ValueObject),
        RoleKind::Domain(DomainKind::Identifier),
        RoleKind::Domain(DomainKind::DomainEvent),
        RoleKind::Domain(DomainKind::DomainService),
        RoleKind::Port(PortKind::UseCase),
        RoleKind::Port(PortKind::Command),
        RoleKind::Port(PortKind::Query),
        RoleKind::Port(PortKind::Repository),
        RoleKind::Port(PortKind::Gateway),
        RoleKind::Port(PortKind::EventPublisher),
        RoleKind::Port(PortKind::DrivenPort),
        RoleKind::Model(ModelKind::CommandModel),
        RoleKind::Model(ModelKind::QueryModel),
        RoleKind::Model(ModelKind::Dto),
    ];
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

impl From<DomainKind> for RoleKind {
    fn from(kind: DomainKind) -> Self {
        Self::Domain(kind)
    }
}

impl From<PortKind> for RoleKind {
    fn from(kind: PortKind) -> Self {
        Self::Port(kind)
    }
}

impl From<ModelKind> for RoleKind {
    fn from(kind: ModelKind) -> Self {
        Self::Model(kind)
    }
}
