use serde::Serialize;

// =============================================================================
// HISTORY
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellingStats {
    pub listed: usize,
    pub reserved: usize,
    pub collected: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellingHistoryEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: f64,
    /// Ledger status when a reservation exists, `Available` otherwise.
    pub status: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyingStats {
    pub booked: usize,
    pub active: usize,
    pub collected: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyingHistoryEntry {
    pub id: String,
    pub title: String,
    pub status: String,
    pub price: f64,
    pub date: String,
    pub seller: String,
    pub location: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub selling_stats: SellingStats,
    pub selling_history: Vec<SellingHistoryEntry>,
    pub buying_stats: BuyingStats,
    pub buying_history: Vec<BuyingHistoryEntry>,
}
