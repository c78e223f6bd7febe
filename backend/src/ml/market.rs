//! Synthetic market chart data
//!
//! Prices and demand shares are drawn at random for display. They are not
//! market data.

use rand::Rng;
use shared::{MarketChartData, PriceBand, DEMAND_OTHER_BUCKET, PRICE_POINTS};

/// Draw seven daily prices in `band` and a three-bucket demand split
pub fn simulate_market<R: Rng + ?Sized>(band: PriceBand, rng: &mut R) -> MarketChartData {
    let (lo, hi) = if band.min <= band.max {
        (band.min, band.max)
    } else {
        (band.max, band.min)
    };

    let prices = (0..PRICE_POINTS).map(|_| rng.gen_range(lo..=hi)).collect();
    let demand = [
        rng.gen_range(50..=90),
        rng.gen_range(10..=40),
        DEMAND_OTHER_BUCKET,
    ];

    MarketChartData {
        prices,
        demand,
        simulated: true,
    }
}
