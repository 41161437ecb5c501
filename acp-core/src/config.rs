use std::time::Duration;

/// Tunables for the auction lifecycle manager.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuctionConfig {
    /// How many read-validate-write cycles a bid may go through before the
    /// manager gives up with a conflict
    #[cfg_attr(feature = "serde", serde(default = "default_max_bid_attempts"))]
    pub max_bid_attempts: usize,

    /// The default look-ahead window for "ending soon" queries
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_ending_soon", with = "humantime_serde")
    )]
    pub ending_soon: Duration,

    /// The default number of auctions returned by "ending soon" queries
    #[cfg_attr(feature = "serde", serde(default = "default_ending_soon_limit"))]
    pub ending_soon_limit: usize,
}

fn default_max_bid_attempts() -> usize {
    5
}

fn default_ending_soon() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_ending_soon_limit() -> usize {
    10
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            max_bid_attempts: default_max_bid_attempts(),
            ending_soon: default_ending_soon(),
            ending_soon_limit: default_ending_soon_limit(),
        }
    }
}
