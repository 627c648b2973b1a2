use time::{Duration, OffsetDateTime};

use crate::{
    applications::repo_types::Application,
    dashboard::dto::{StaleApplication, StatusCount},
    pipeline::ApplicationStatus,
};

/// Aggregates over every application a user owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationStats {
    pub total: usize,
    pub status_counts: Vec<StatusCount>,
    pub stale: Vec<StaleApplication>,
    pub last_activity_at: Option<OffsetDateTime>,
}

impl ApplicationStats {
    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.status_counts
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.count)
    }
}

/// Open applications idle for longer than `stale_after` are listed oldest
/// first.
pub(crate) fn summarize(
    applications: &[Application],
    now: OffsetDateTime,
    stale_after: Duration,
) -> ApplicationStats {
    let status_counts = ApplicationStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            label: status.label().to_string(),
            count: applications.iter().filter(|a| a.status == status).count(),
        })
        .collect();

    let cutoff = now - stale_after;
    let mut stale: Vec<_> = applications
        .iter()
        .filter(|a| !a.status.is_closed())
        .filter_map(|a| {
            let last = a.last_activity_at();
            (last < cutoff).then(|| StaleApplication {
                id: a.id,
                board_id: a.board_id,
                company: a.company.clone(),
                job_title: a.job_title.clone(),
                status: a.status,
                last_activity_at: last,
                idle_days: (now - last).whole_days(),
            })
        })
        .collect();
    stale.sort_by_key(|s| s.last_activity_at);

    ApplicationStats {
        total: applications.len(),
        status_counts,
        stale,
        last_activity_at: applications.iter().map(Application::last_activity_at).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::repo_types::tests::fields;
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn empty_input_has_zero_counts() {
        let stats = summarize(&[], datetime!(2025-03-01 10:00 UTC), Duration::days(14));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.status_counts.len(), 6);
        assert!(stats.status_counts.iter().all(|c| c.count == 0));
        assert_eq!(stats.last_activity_at, None);
    }

    #[test]
    fn counts_and_stale_list() {
        let board = Uuid::new_v4();
        let now = datetime!(2025-03-31 12:00 UTC);
        let old = now - Duration::days(30);
        let older = now - Duration::days(40);

        let fresh = Application::create(board, fields("Fresh", ApplicationStatus::Applied), now);
        let idle = Application::create(board, fields("Idle", ApplicationStatus::Applied), old);
        let idler = Application::create(board, fields("Idler", ApplicationStatus::Wishlist), older);
        let closed = Application::create(board, fields("Closed", ApplicationStatus::Rejected), older);

        let stats = summarize(
            &[fresh, idle, idler, closed],
            now,
            Duration::days(14),
        );

        assert_eq!(stats.total, 4);
        assert_eq!(stats.count(ApplicationStatus::Applied), 2);
        assert_eq!(stats.count(ApplicationStatus::Rejected), 1);
        assert_eq!(stats.count(ApplicationStatus::Interview), 0);

        let stale: Vec<_> = stats.stale.iter().map(|s| s.company.as_str()).collect();
        assert_eq!(stale, vec!["Idler", "Idle"]);
        assert_eq!(stats.stale[0].idle_days, 40);
        assert_eq!(stats.last_activity_at, Some(now));
    }

    #[test]
    fn recent_move_keeps_old_application_fresh() {
        let board = Uuid::new_v4();
        let now = datetime!(2025-03-31 12:00 UTC);
        let mut app = Application::create(
            board,
            fields("Moved", ApplicationStatus::Wishlist),
            now - Duration::days(60),
        );
        app.transition_to(ApplicationStatus::Interview, now - Duration::days(2));

        let stats = summarize(&[app], now, Duration::days(14));
        assert!(stats.stale.is_empty());
    }
}
