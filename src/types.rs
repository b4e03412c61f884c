use serde::{Deserialize, Serialize};

/// Summary of a dashboard panel alert, as listed by `GET /api/alerts`
///
/// `state` is passed through as the server reports it (`alerting`, `ok`,
/// `pending`, `no_data`, `paused`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Dashboard the alert belongs to
    pub dashboard_id: i64,

    /// Panel the alert rule is defined on
    pub panel_id: i64,

    pub name: String,

    pub state: String,

    /// Link to the panel, relative to the server root
    pub url: String,
}
