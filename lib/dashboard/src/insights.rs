//! Read-only dashboards: analytics, conversations and contacts.

use crate::error::DashboardError;
use agentdesk_api::{AnalyticsSummary, Contact, ContactsApi, ConversationSummary, InsightsApi};
use rootcause::prelude::Report;

/// Everything the overview page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub analytics: AnalyticsSummary,
    pub conversations: Vec<ConversationSummary>,
    pub contacts: Vec<Contact>,
}

/// Fetches the three summaries concurrently.
pub async fn load_overview<A>(api: &A) -> Result<Overview, Report<DashboardError>>
where
    A: InsightsApi + ContactsApi,
{
    let (analytics, conversations, contacts) = futures::try_join!(
        async {
            api.analytics()
                .await
                .map_err(DashboardError::request("load analytics"))
        },
        async {
            api.list_conversations()
                .await
                .map_err(DashboardError::request("load conversations"))
        },
        async {
            api.list_contacts()
                .await
                .map_err(DashboardError::request("load contacts"))
        },
    )?;
    Ok(Overview {
        analytics,
        conversations,
        contacts,
    })
}
