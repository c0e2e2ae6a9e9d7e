//! Status vocabulary shared across the public page, dashboard and lifecycle code.
//!
//! The three enums are stored as short strings in the database; parsing happens
//! at the form and query boundaries so everything past them is typed.

pub mod aggregate;
pub mod timeline;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

/// Current health label of a monitored service.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    Operational,
    Degraded,
    Partial,
    Major,
    Maintenance,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 5] = [
        ServiceStatus::Operational,
        ServiceStatus::Degraded,
        ServiceStatus::Partial,
        ServiceStatus::Major,
        ServiceStatus::Maintenance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Operational => "operational",
            ServiceStatus::Degraded => "degraded",
            ServiceStatus::Partial => "partial",
            ServiceStatus::Major => "major",
            ServiceStatus::Maintenance => "maintenance",
        }
    }

    /// Human-readable label shown next to a single service.
    pub fn label(self) -> &'static str {
        match self {
            ServiceStatus::Operational => "Operational",
            ServiceStatus::Degraded => "Degraded Performance",
            ServiceStatus::Partial => "Partial Outage",
            ServiceStatus::Major => "Major Outage",
            ServiceStatus::Maintenance => "Under Maintenance",
        }
    }

    /// Site-wide banner message when this is the overall status.
    pub fn banner(self) -> &'static str {
        match self {
            ServiceStatus::Operational => "All Systems Operational",
            ServiceStatus::Degraded => "Degraded Performance",
            ServiceStatus::Partial => "Partial System Outage",
            ServiceStatus::Major => "Major System Outage",
            ServiceStatus::Maintenance => "Scheduled Maintenance",
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operational" => Ok(ServiceStatus::Operational),
            "degraded" => Ok(ServiceStatus::Degraded),
            "partial" => Ok(ServiceStatus::Partial),
            "major" => Ok(ServiceStatus::Major),
            "maintenance" => Ok(ServiceStatus::Maintenance),
            other => Err(ParseStatusError {
                kind: "service status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle stage of an incident investigation.
///
/// Transitions are deliberately permissive: an operator may select any status
/// on any update, including moving backwards from resolved. The only guarded
/// field is `resolved_at`, which is stamped once and never overwritten.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IncidentStatus {
    Investigating,
    Identified,
    Monitoring,
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 4] = [
        IncidentStatus::Investigating,
        IncidentStatus::Identified,
        IncidentStatus::Monitoring,
        IncidentStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Identified => "identified",
            IncidentStatus::Monitoring => "monitoring",
            IncidentStatus::Resolved => "resolved",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IncidentStatus::Investigating => "Investigating",
            IncidentStatus::Identified => "Identified",
            IncidentStatus::Monitoring => "Monitoring",
            IncidentStatus::Resolved => "Resolved",
        }
    }
}

impl FromStr for IncidentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "investigating" => Ok(IncidentStatus::Investigating),
            "identified" => Ok(IncidentStatus::Identified),
            "monitoring" => Ok(IncidentStatus::Monitoring),
            "resolved" => Ok(IncidentStatus::Resolved),
            other => Err(ParseStatusError {
                kind: "incident status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-declared severity of an incident, independent of service status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Impact {
    None,
    Minor,
    Major,
    Critical,
}

impl Impact {
    pub const ALL: [Impact; 4] = [Impact::None, Impact::Minor, Impact::Major, Impact::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Impact::None => "none",
            Impact::Minor => "minor",
            Impact::Major => "major",
            Impact::Critical => "critical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Impact::None => "None",
            Impact::Minor => "Minor",
            Impact::Major => "Major",
            Impact::Critical => "Critical",
        }
    }

    /// Precedence when several incidents cover the same hour.
    pub fn priority(self) -> u8 {
        match self {
            Impact::None => 1,
            Impact::Minor => 2,
            Impact::Major => 3,
            Impact::Critical => 4,
        }
    }

    /// Display status a service takes on while an incident of this impact is active.
    pub fn service_status(self) -> ServiceStatus {
        match self {
            Impact::None => ServiceStatus::Operational,
            Impact::Minor => ServiceStatus::Degraded,
            Impact::Major => ServiceStatus::Partial,
            Impact::Critical => ServiceStatus::Major,
        }
    }
}

impl FromStr for Impact {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Impact::None),
            "minor" => Ok(Impact::Minor),
            "major" => Ok(Impact::Major),
            "critical" => Ok(Impact::Critical),
            other => Err(ParseStatusError {
                kind: "impact",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_strings() {
        for status in ServiceStatus::ALL {
            assert_eq!(status.as_str().parse::<ServiceStatus>().unwrap(), status);
        }
        for status in IncidentStatus::ALL {
            assert_eq!(status.as_str().parse::<IncidentStatus>().unwrap(), status);
        }
        for impact in Impact::ALL {
            assert_eq!(impact.as_str().parse::<Impact>().unwrap(), impact);
        }
    }

    #[test]
    fn rejects_unknown_values() {
        assert!("broken".parse::<ServiceStatus>().is_err());
        assert!("".parse::<IncidentStatus>().is_err());
        assert!("catastrophic".parse::<Impact>().is_err());
    }

    #[test]
    fn impact_priority_ordering() {
        assert!(Impact::Critical.priority() > Impact::Major.priority());
        assert!(Impact::Major.priority() > Impact::Minor.priority());
        assert!(Impact::Minor.priority() > Impact::None.priority());
    }

    #[test]
    fn impact_maps_to_service_status() {
        assert_eq!(Impact::None.service_status(), ServiceStatus::Operational);
        assert_eq!(Impact::Minor.service_status(), ServiceStatus::Degraded);
        assert_eq!(Impact::Major.service_status(), ServiceStatus::Partial);
        assert_eq!(Impact::Critical.service_status(), ServiceStatus::Major);
    }
}
