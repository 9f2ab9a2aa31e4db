//! Administrator dashboard.

use tracing::warn;
use wayfare_protocol::DashboardStats;

use super::{FlowResult, require_token};
use crate::client::ApiClient;
use crate::session::Session;

/// Figures shown when the dashboard cannot be fetched.
pub const SAMPLE_STATS: DashboardStats = DashboardStats {
    total_users: 500,
    total_hotel_owners: 50,
    total_packages: 200,
    total_bookings: 300,
};

/// Dashboard figures and whether they are placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub sample: bool,
}

/// Fetch platform statistics, falling back to [`SAMPLE_STATS`] when
/// `sample_on_error` is set.
pub async fn dashboard(
    client: &ApiClient,
    session: &Session,
    sample_on_error: bool,
) -> FlowResult<Dashboard> {
    let token = require_token(session)?;
    match client.dashboard(token).await {
        Ok(stats) => Ok(Dashboard {
            stats,
            sample: false,
        }),
        Err(e) if sample_on_error => {
            warn!(error = %e, "failed to fetch dashboard; showing sample data");
            Ok(Dashboard {
                stats: SAMPLE_STATS,
                sample: true,
            })
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use std::time::Duration;

    #[tokio::test]
    async fn test_dashboard_falls_back_to_sample() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = ApiClient::with_timeout(
            format!("http://127.0.0.1:{port}/api"),
            Duration::from_secs(2),
        )
        .unwrap();
        let session = Session::new("abc", Role::Admin, None);

        let shown = dashboard(&client, &session, true).await.unwrap();
        assert!(shown.sample);
        assert_eq!(shown.stats, SAMPLE_STATS);

        assert!(dashboard(&client, &session, false).await.is_err());
    }
}
