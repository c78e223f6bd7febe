//! Simulated market figures for the recommendation charts
//!
//! These numbers are illustrative only and are not derived from any market feed.

use serde::{Deserialize, Serialize};

/// Number of daily price points on the price chart
pub const PRICE_POINTS: usize = 7;

/// Fixed share of the third demand bucket
pub const DEMAND_OTHER_BUCKET: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketChartData {
    /// One price per day, oldest first
    pub prices: Vec<u32>,
    /// Local, export, other
    pub demand: [u32; 3],
    pub simulated: bool,
}
