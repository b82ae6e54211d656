use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a lead, the prospective customer a simulation is run for.
///
/// Leads are registered by referrers and owned by the external lead
/// registry; the simulator only carries the identifier around.
///
/// # Examples
///
/// ```
/// use moto_financing::core::ids::LeadId;
///
/// let lead = LeadId::new("lead-0042");
/// assert_eq!(lead.as_str(), "lead-0042");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(String);

impl LeadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user who ran a simulation, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role attribute attached to a user by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Oversees statistics and commissions.
    Admin,
    /// Salesperson: converts leads and runs financing simulations.
    Vendedor,
    /// Referrer: registers leads.
    Indicador,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Vendedor => "vendedor",
            Role::Indicador => "indicador",
        }
    }

    /// Whether users with this role may run and save financing simulations.
    pub fn can_simulate(&self) -> bool {
        matches!(self, Role::Admin | Role::Vendedor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role '{0}', expected admin, vendedor or indicador")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "vendedor" => Ok(Role::Vendedor),
            "indicador" => Ok(Role::Indicador),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
