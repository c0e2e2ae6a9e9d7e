//! Hourly status timeline reconstructed from incident windows.
//!
//! No stored snapshot is consulted: a service's trailing 24-hour history is
//! rebuilt at query time from the creation/resolution timestamps of the
//! incidents linked to it. An incident occupies every hour bucket its active
//! interval touches, the highest impact wins per bucket, and hours nothing
//! covers render as operational.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, Condition, ConnectionTrait, ModelTrait, QueryFilter};
use time::{Duration, OffsetDateTime, Time};

use crate::entity::{incident, service};
use crate::status::{Impact, ServiceStatus};

/// Trailing window length, in hourly buckets.
pub const WINDOW_HOURS: i64 = 24;

/// One hour bucket of a service's reconstructed history, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HourlyStatus {
    /// Start of the hour, truncated to `:00:00`.
    pub hour: OffsetDateTime,
    pub status: ServiceStatus,
    /// Title of the winning incident, or empty when the hour was quiet.
    pub incident: String,
}

/// Zero out everything below the hour.
pub fn truncate_to_hour(ts: OffsetDateTime) -> OffsetDateTime {
    ts.replace_time(Time::from_hms(ts.hour(), 0, 0).expect("hour taken from a valid time"))
}

/// Rebuild the hourly timeline for one service from its already-fetched incidents.
///
/// The window runs from `truncate(now) - (hours - 1)` through `truncate(now)`
/// inclusive. Per hour the incident with the highest impact priority wins;
/// strict-greater comparison keeps the first-seen assignment on ties.
pub fn reconstruct(
    incidents: &[incident::Model],
    now: OffsetDateTime,
    hours: i64,
) -> Vec<HourlyStatus> {
    let now_hour = truncate_to_hour(now);
    let window_start = now_hour - Duration::hours(hours - 1);

    struct Winner<'a> {
        impact: Impact,
        title: &'a str,
    }

    let mut by_hour: HashMap<OffsetDateTime, Winner<'_>> = HashMap::new();

    for inc in incidents {
        if inc.created_at > now {
            continue;
        }
        let Ok(impact) = inc.impact.parse::<Impact>() else {
            tracing::warn!(incident = inc.id, impact = %inc.impact, "skipping incident with unknown impact");
            continue;
        };

        let start = truncate_to_hour(inc.created_at);
        // Unresolved incidents extend through the current hour.
        let end = inc.resolved_at.map_or(now_hour, truncate_to_hour);

        // Both bounds sit on hour boundaries, so clamping keeps the stepping aligned.
        let mut cursor = start.max(window_start);
        let last = end.min(now_hour);
        while cursor <= last {
            let replace = by_hour
                .get(&cursor)
                .is_none_or(|existing| impact.priority() > existing.impact.priority());
            if replace {
                by_hour.insert(
                    cursor,
                    Winner {
                        impact,
                        title: &inc.title,
                    },
                );
            }
            cursor += Duration::hours(1);
        }
    }

    (0..hours)
        .rev()
        .map(|offset| {
            let hour = now_hour - Duration::hours(offset);
            match by_hour.get(&hour) {
                Some(winner) => HourlyStatus {
                    hour,
                    status: winner.impact.service_status(),
                    incident: winner.title.to_string(),
                },
                None => HourlyStatus {
                    hour,
                    status: ServiceStatus::Operational,
                    incident: String::new(),
                },
            }
        })
        .collect()
}

/// Fetch the incidents overlapping the trailing window and rebuild the timeline
/// for one service.
pub async fn service_timeline<C: ConnectionTrait>(
    db: &C,
    svc: &service::Model,
    now: OffsetDateTime,
) -> Result<Vec<HourlyStatus>, sea_orm::DbErr> {
    let window_start = truncate_to_hour(now) - Duration::hours(WINDOW_HOURS - 1);

    let incidents = svc
        .find_related(incident::Entity)
        .filter(incident::Column::CreatedAt.lte(now))
        .filter(
            Condition::any()
                .add(incident::Column::ResolvedAt.is_null())
                .add(incident::Column::ResolvedAt.gte(window_start)),
        )
        .all(db)
        .await?;

    Ok(reconstruct(&incidents, now, WINDOW_HOURS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn incident_model(
        id: i32,
        title: &str,
        impact: &str,
        created_at: OffsetDateTime,
        resolved_at: Option<OffsetDateTime>,
    ) -> incident::Model {
        incident::Model {
            id,
            title: title.to_string(),
            status: if resolved_at.is_some() {
                "resolved".to_string()
            } else {
                "investigating".to_string()
            },
            impact: impact.to_string(),
            created_at,
            updated_at: created_at,
            resolved_at,
        }
    }

    const NOW: OffsetDateTime = datetime!(2026-08-05 14:37:21 UTC);

    #[test]
    fn truncation_zeroes_minutes_and_below() {
        assert_eq!(truncate_to_hour(NOW), datetime!(2026-08-05 14:00:00 UTC));
        assert_eq!(
            truncate_to_hour(datetime!(2026-08-05 00:00:00 UTC)),
            datetime!(2026-08-05 00:00:00 UTC)
        );
    }

    #[test]
    fn no_incidents_means_fully_operational() {
        let timeline = reconstruct(&[], NOW, WINDOW_HOURS);
        assert_eq!(timeline.len(), 24);
        assert_eq!(timeline[0].hour, datetime!(2026-08-04 15:00:00 UTC));
        assert_eq!(timeline[23].hour, datetime!(2026-08-05 14:00:00 UTC));
        assert!(
            timeline
                .iter()
                .all(|h| h.status == ServiceStatus::Operational && h.incident.is_empty())
        );
    }

    #[test]
    fn critical_incident_marks_exactly_its_hours() {
        // Active 10:05 -> 12:40, so buckets 10:00, 11:00 and 12:00.
        let incidents = vec![incident_model(
            1,
            "Database outage",
            "critical",
            datetime!(2026-08-05 10:05:00 UTC),
            Some(datetime!(2026-08-05 12:40:00 UTC)),
        )];
        let timeline = reconstruct(&incidents, NOW, WINDOW_HOURS);

        for bucket in &timeline {
            let affected = (datetime!(2026-08-05 10:00:00 UTC)..=datetime!(2026-08-05 12:00:00 UTC))
                .contains(&bucket.hour);
            if affected {
                assert_eq!(bucket.status, ServiceStatus::Major);
                assert_eq!(bucket.incident, "Database outage");
            } else {
                assert_eq!(bucket.status, ServiceStatus::Operational);
                assert!(bucket.incident.is_empty());
            }
        }
    }

    #[test]
    fn higher_impact_wins_overlapping_hour() {
        let incidents = vec![
            incident_model(
                1,
                "Slow responses",
                "minor",
                datetime!(2026-08-05 09:00:00 UTC),
                Some(datetime!(2026-08-05 13:00:00 UTC)),
            ),
            incident_model(
                2,
                "Full outage",
                "critical",
                datetime!(2026-08-05 11:10:00 UTC),
                Some(datetime!(2026-08-05 11:50:00 UTC)),
            ),
        ];
        let timeline = reconstruct(&incidents, NOW, WINDOW_HOURS);

        let eleven = timeline
            .iter()
            .find(|h| h.hour == datetime!(2026-08-05 11:00:00 UTC))
            .unwrap();
        assert_eq!(eleven.status, ServiceStatus::Major);
        assert_eq!(eleven.incident, "Full outage");

        let ten = timeline
            .iter()
            .find(|h| h.hour == datetime!(2026-08-05 10:00:00 UTC))
            .unwrap();
        assert_eq!(ten.status, ServiceStatus::Degraded);
        assert_eq!(ten.incident, "Slow responses");
    }

    #[test]
    fn equal_priority_keeps_first_assignment() {
        let incidents = vec![
            incident_model(
                1,
                "First",
                "major",
                datetime!(2026-08-05 12:00:00 UTC),
                None,
            ),
            incident_model(
                2,
                "Second",
                "major",
                datetime!(2026-08-05 13:00:00 UTC),
                None,
            ),
        ];
        let timeline = reconstruct(&incidents, NOW, WINDOW_HOURS);
        let one_pm = timeline
            .iter()
            .find(|h| h.hour == datetime!(2026-08-05 13:00:00 UTC))
            .unwrap();
        assert_eq!(one_pm.incident, "First");
    }

    #[test]
    fn same_hour_create_and_resolve_occupies_one_bucket() {
        let incidents = vec![incident_model(
            1,
            "Blip",
            "minor",
            datetime!(2026-08-05 13:02:00 UTC),
            Some(datetime!(2026-08-05 13:17:00 UTC)),
        )];
        let timeline = reconstruct(&incidents, NOW, WINDOW_HOURS);
        let marked: Vec<_> = timeline.iter().filter(|h| !h.incident.is_empty()).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].hour, datetime!(2026-08-05 13:00:00 UTC));
        assert_eq!(marked[0].status, ServiceStatus::Degraded);
    }

    #[test]
    fn unresolved_incident_extends_through_current_hour() {
        let incidents = vec![incident_model(
            1,
            "Ongoing",
            "major",
            datetime!(2026-08-05 12:30:00 UTC),
            None,
        )];
        let timeline = reconstruct(&incidents, NOW, WINDOW_HOURS);
        let current = timeline.last().unwrap();
        assert_eq!(current.hour, datetime!(2026-08-05 14:00:00 UTC));
        assert_eq!(current.status, ServiceStatus::Partial);
        assert_eq!(current.incident, "Ongoing");
    }

    #[test]
    fn hours_before_window_are_excluded() {
        // Started two days ago, still unresolved: only the 24 in-window buckets appear.
        let incidents = vec![incident_model(
            1,
            "Long running",
            "minor",
            datetime!(2026-08-03 06:00:00 UTC),
            None,
        )];
        let timeline = reconstruct(&incidents, NOW, WINDOW_HOURS);
        assert_eq!(timeline.len(), 24);
        assert_eq!(timeline[0].hour, datetime!(2026-08-04 15:00:00 UTC));
        assert!(
            timeline
                .iter()
                .all(|h| h.status == ServiceStatus::Degraded && h.incident == "Long running")
        );
    }

    #[test]
    fn incident_resolved_before_window_is_ignored() {
        let incidents = vec![incident_model(
            1,
            "Old news",
            "critical",
            datetime!(2026-08-01 06:00:00 UTC),
            Some(datetime!(2026-08-01 09:00:00 UTC)),
        )];
        let timeline = reconstruct(&incidents, NOW, WINDOW_HOURS);
        assert!(
            timeline
                .iter()
                .all(|h| h.status == ServiceStatus::Operational)
        );
    }
}
