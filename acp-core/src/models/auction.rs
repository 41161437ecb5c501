use std::{fmt::Display, str::FromStr, time::Duration};
use thiserror::Error;

/// The two states of an auction.
///
/// An auction starts `Ongoing` and may only ever move to `Completed`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum AuctionStatus {
    /// Accepting bids, as long as the end time has not passed
    Ongoing,
    /// No longer accepting bids
    Completed,
}

impl AuctionStatus {
    /// The canonical lowercase name, as persisted and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }
}

impl Display for AuctionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when parsing an unrecognized auction status.
#[derive(Debug, Error)]
#[error("unknown auction status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AuctionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// An immutable record of a user offering an amount at a point in time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Bid<DateTime, UserId> {
    /// The bidding user
    pub user_id: UserId,
    /// The offered amount, strictly greater than the current bid at the time it was placed
    pub amount: i64,
    /// When the bid was accepted
    pub time: DateTime,
}

/// A time-bounded competitive bidding process for a single artwork.
///
/// `bids` is append-only and in chronological order; `current_bid` equals the
/// start price until the first bid, and the amount of the last bid afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AuctionRecord<DateTime, UserId, ArtworkId, AuctionId> {
    /// The unique identifier of the auction
    pub id: AuctionId,
    /// The artwork being auctioned
    pub artwork_id: ArtworkId,
    /// The owner of the artwork
    pub artist_id: UserId,
    /// The floor bid, fixed at creation
    pub start_price: i64,
    /// The highest accepted amount so far
    pub current_bid: i64,
    /// The user holding the current bid, if any bid has been placed
    pub current_bidder: Option<UserId>,
    /// Every accepted bid, oldest first
    pub bids: Vec<Bid<DateTime, UserId>>,
    /// When bidding opened
    pub start_time: DateTime,
    /// When bidding closes
    pub end_time: DateTime,
    /// The persisted status
    pub status: AuctionStatus,
    /// When the record was created
    pub created_at: DateTime,
}

/// The reasons an auction may refuse a bid, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidRejection {
    /// The auction is completed, or its end time has passed
    #[error("auction has ended")]
    AuctionClosed,
    /// The amount is zero or negative
    #[error("bid amount must be a positive number")]
    InvalidAmount,
    /// The amount does not exceed the current bid
    #[error("bid amount must be higher than current bid of {current_bid}")]
    BidTooLow {
        /// The current bid at the time of validation
        current_bid: i64,
    },
}

impl<DateTime: Ord, UserId, ArtworkId, AuctionId>
    AuctionRecord<DateTime, UserId, ArtworkId, AuctionId>
{
    /// Whether the auction accepts bids at `as_of`.
    ///
    /// An auction whose end time has passed is closed even if its persisted
    /// status still reads `ongoing`.
    pub fn is_open(&self, as_of: &DateTime) -> bool {
        self.status == AuctionStatus::Ongoing && *as_of <= self.end_time
    }

    /// The status as observed at `as_of`, accounting for lazy expiry.
    pub fn effective_status(&self, as_of: &DateTime) -> AuctionStatus {
        if self.status == AuctionStatus::Ongoing && *as_of > self.end_time {
            AuctionStatus::Completed
        } else {
            self.status
        }
    }

    /// Check whether a bid of `amount` would be admitted at `as_of`.
    pub fn validate_bid(&self, amount: i64, as_of: &DateTime) -> Result<(), BidRejection> {
        if !self.is_open(as_of) {
            Err(BidRejection::AuctionClosed)
        } else if amount <= 0 {
            Err(BidRejection::InvalidAmount)
        } else if amount <= self.current_bid {
            Err(BidRejection::BidTooLow {
                current_bid: self.current_bid,
            })
        } else {
            Ok(())
        }
    }
}

/// The filters supported when listing auctions.
///
/// Each variant carries its own ordering, which implementations must honor.
#[derive(Debug, Clone, PartialEq)]
pub enum AuctionQuery<DateTime, UserId> {
    /// Ongoing auctions whose end time is after `as_of`, soonest-ending first
    Ongoing {
        /// The reference time
        as_of: DateTime,
    },
    /// Completed auctions, most recently ended first
    Ended,
    /// Every auction of an artist regardless of status, soonest-ending first
    ByArtist {
        /// The artist to filter on
        artist_id: UserId,
    },
    /// Ongoing auctions ending after `as_of` but no later than `as_of + within`,
    /// soonest-ending first
    EndingSoon {
        /// The reference time
        as_of: DateTime,
        /// The look-ahead window
        within: Duration,
    },
}
