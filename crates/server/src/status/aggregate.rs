//! Site-wide banner status derived from the worst current service status.

use crate::entity::service;
use crate::status::ServiceStatus;

/// Strict descending severity; the first status present among the services wins.
const PRIORITY: [ServiceStatus; 4] = [
    ServiceStatus::Major,
    ServiceStatus::Partial,
    ServiceStatus::Degraded,
    ServiceStatus::Maintenance,
];

/// Compute the overall status and its banner message for the given services.
///
/// Services whose stored status fails to parse are ignored; with no services
/// (or only operational ones) the answer is "all systems operational".
pub fn overall_status(services: &[service::Model]) -> (ServiceStatus, &'static str) {
    let statuses: Vec<ServiceStatus> = services
        .iter()
        .filter_map(|s| s.status.parse().ok())
        .collect();

    for candidate in PRIORITY {
        if statuses.contains(&candidate) {
            return (candidate, candidate.banner());
        }
    }
    (
        ServiceStatus::Operational,
        ServiceStatus::Operational.banner(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(id: i32, status: &str) -> service::Model {
        service::Model {
            id,
            name: format!("svc-{id}"),
            description: String::new(),
            status: status.to_string(),
            sort_order: id,
        }
    }

    #[test]
    fn all_operational() {
        let services = vec![svc(1, "operational"), svc(2, "operational")];
        assert_eq!(
            overall_status(&services),
            (ServiceStatus::Operational, "All Systems Operational")
        );
    }

    #[test]
    fn single_degraded_service_sets_banner() {
        let services = vec![svc(1, "operational"), svc(2, "degraded"), svc(3, "operational")];
        assert_eq!(
            overall_status(&services),
            (ServiceStatus::Degraded, "Degraded Performance")
        );
    }

    #[test]
    fn major_beats_partial() {
        let services = vec![svc(1, "major"), svc(2, "partial")];
        assert_eq!(
            overall_status(&services),
            (ServiceStatus::Major, "Major System Outage")
        );
    }

    #[test]
    fn partial_beats_degraded_and_maintenance() {
        let services = vec![svc(1, "maintenance"), svc(2, "degraded"), svc(3, "partial")];
        assert_eq!(
            overall_status(&services),
            (ServiceStatus::Partial, "Partial System Outage")
        );
    }

    #[test]
    fn maintenance_only() {
        let services = vec![svc(1, "maintenance"), svc(2, "operational")];
        assert_eq!(
            overall_status(&services),
            (ServiceStatus::Maintenance, "Scheduled Maintenance")
        );
    }

    #[test]
    fn empty_service_list_is_operational() {
        assert_eq!(
            overall_status(&[]),
            (ServiceStatus::Operational, "All Systems Operational")
        );
    }
}
