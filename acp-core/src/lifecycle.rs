use crate::{
    config::AuctionConfig,
    models::{AuctionQuery, Bid, BidRejection},
    ports::{ArtworkRepository, AuctionOf, AuctionRepository, Repository},
};
use std::time::Duration;
use thiserror::Error;
use tracing::{Level, event};

/// The ways an auction operation can fail.
///
/// Every variant except `Repository` is detected before any write is issued
/// (or, for `ConcurrentBidConflict`, after every write attempt was rejected),
/// so none of them leaves a partial mutation behind.
#[derive(Debug, Error)]
pub enum AuctionFailure<E> {
    /// The auction does not exist
    #[error("auction not found")]
    NotFound,

    /// The artwork being auctioned or removed does not exist
    #[error("artwork not found")]
    ArtworkNotFound,

    /// The auction is completed or its end time has passed
    #[error("auction has ended")]
    AuctionClosed,

    /// The bid amount is zero or negative
    #[error("bid amount must be a positive number")]
    InvalidAmount,

    /// The bid amount does not exceed the current bid
    #[error("bid amount must be higher than current bid of {current_bid}")]
    BidTooLow {
        /// The current bid the amount was compared against
        current_bid: i64,
    },

    /// Every conditional write was beaten by a concurrent writer
    #[error("bid conflicted with concurrent bids, re-read the auction and retry")]
    ConcurrentBidConflict,

    /// The start price is zero or negative
    #[error("start price must be a positive number")]
    InvalidStartPrice,

    /// The end time is not in the future
    #[error("end time must be after the start time")]
    InvalidEndTime,

    /// The artwork already has an open auction
    #[error("artwork is already in an ongoing auction")]
    AlreadyInAuction,

    /// The underlying storage failed
    #[error("repository error: {0}")]
    Repository(E),
}

impl<E> From<BidRejection> for AuctionFailure<E> {
    fn from(value: BidRejection) -> Self {
        match value {
            BidRejection::AuctionClosed => Self::AuctionClosed,
            BidRejection::InvalidAmount => Self::InvalidAmount,
            BidRejection::BidTooLow { current_bid } => Self::BidTooLow { current_bid },
        }
    }
}

/// The result type of manager operations over repository `R`.
pub type AuctionResult<T, R> = Result<T, AuctionFailure<<R as Repository>::Error>>;

/// Drives the auction lifecycle against an injected repository.
///
/// The manager holds no state of its own beyond configuration: every
/// operation loads what it needs, validates in memory, and issues at most one
/// conditional write per attempt. It is cheap to construct per request.
pub struct AuctionManager<'a, R> {
    repo: &'a R,
    max_bid_attempts: usize,
}

impl<'a, R: AuctionRepository + ArtworkRepository> AuctionManager<'a, R> {
    /// Build a manager over `repo`.
    pub fn new(repo: &'a R, config: &AuctionConfig) -> Self {
        Self {
            repo,
            max_bid_attempts: config.max_bid_attempts.max(1),
        }
    }

    /// Open an auction for an artwork and link the artwork to it.
    ///
    /// The caller is responsible for checking that the artwork and artist exist
    /// and that the artist owns the artwork.
    ///
    /// If linking the artwork fails after the auction was inserted, the
    /// auction is removed again before the error is returned, so no orphaned
    /// auction survives a failed creation.
    pub async fn create_auction(
        &self,
        auction_id: R::AuctionId,
        artwork_id: R::ArtworkId,
        artist_id: R::UserId,
        start_price: i64,
        end_time: R::DateTime,
        as_of: R::DateTime,
    ) -> AuctionResult<AuctionOf<R>, R> {
        if start_price <= 0 {
            return Err(AuctionFailure::InvalidStartPrice);
        }
        if end_time <= as_of {
            return Err(AuctionFailure::InvalidEndTime);
        }

        let existing = self
            .repo
            .get_auction_by_artwork(artwork_id.clone())
            .await
            .map_err(AuctionFailure::Repository)?;
        if existing.is_some_and(|auction| auction.is_open(&as_of)) {
            return Err(AuctionFailure::AlreadyInAuction);
        }

        let auction = self
            .repo
            .create_auction(
                auction_id,
                artwork_id.clone(),
                artist_id,
                start_price,
                end_time,
                as_of.clone(),
            )
            .await
            .map_err(AuctionFailure::Repository)?;

        let failure = match self
            .repo
            .mark_as_in_auction(artwork_id, auction.id.clone(), as_of)
            .await
        {
            Ok(true) => return Ok(auction),
            Ok(false) => AuctionFailure::ArtworkNotFound,
            Err(err) => AuctionFailure::Repository(err),
        };

        // compensate for the half-finished creation
        if let Err(err) = self.repo.delete_auction(auction.id.clone()).await {
            event!(
                Level::ERROR,
                err = err.to_string(),
                "failed to remove auction after artwork linkage failed"
            );
        }
        Err(failure)
    }

    /// Place a bid of `amount` on behalf of `user_id`.
    ///
    /// Preconditions are checked in order: the auction exists, it is open at
    /// the current time, the amount is positive, and the amount exceeds the
    /// current bid. The write is conditional on the current bid observed during
    /// validation; if a concurrent bid got there first, the cycle is repeated
    /// against the fresh state.
    ///
    /// `clock` is read once per attempt: a bid is validated against, and
    /// stamped with, the time of the attempt that writes it.
    ///
    /// # Returns
    ///
    /// The auction as it stands after the bid was appended.
    pub async fn place_bid(
        &self,
        auction_id: R::AuctionId,
        user_id: R::UserId,
        amount: i64,
        clock: impl Fn() -> R::DateTime,
    ) -> AuctionResult<AuctionOf<R>, R> {
        for attempt in 1..=self.max_bid_attempts {
            let auction = self
                .repo
                .get_auction(auction_id.clone())
                .await
                .map_err(AuctionFailure::Repository)?
                .ok_or(AuctionFailure::NotFound)?;

            let as_of = clock();
            auction.validate_bid(amount, &as_of)?;

            let bid = Bid {
                user_id: user_id.clone(),
                amount,
                time: as_of,
            };

            if let Some(updated) = self
                .repo
                .append_bid(auction_id.clone(), bid, auction.current_bid)
                .await
                .map_err(AuctionFailure::Repository)?
            {
                return Ok(updated);
            }

            event!(
                Level::DEBUG,
                attempt,
                observed_bid = auction.current_bid,
                "conditional bid write rejected"
            );
        }

        Err(AuctionFailure::ConcurrentBidConflict)
    }

    /// Mark an auction completed. Completing an already-completed auction succeeds.
    pub async fn end_auction(&self, auction_id: R::AuctionId) -> AuctionResult<bool, R> {
        if self
            .repo
            .complete_auction(auction_id)
            .await
            .map_err(AuctionFailure::Repository)?
        {
            Ok(true)
        } else {
            Err(AuctionFailure::NotFound)
        }
    }

    /// Complete every ongoing auction whose end time is at or before `as_of`.
    ///
    /// Only ever moves auctions from ongoing to completed, so it is safe to call
    /// concurrently and on any schedule.
    pub async fn auto_end_expired_auctions(&self, as_of: R::DateTime) -> AuctionResult<u64, R> {
        let count = self
            .repo
            .complete_expired_auctions(as_of)
            .await
            .map_err(AuctionFailure::Repository)?;

        if count > 0 {
            event!(Level::INFO, count, "completed expired auctions");
        }
        Ok(count)
    }

    /// Delete an artwork together with its auction linkage.
    ///
    /// The linked auction is removed first and the linkage cleared, then the
    /// artwork itself is deleted.
    pub async fn remove_artwork(
        &self,
        artwork_id: R::ArtworkId,
        as_of: R::DateTime,
    ) -> AuctionResult<(), R> {
        let artwork = self
            .repo
            .get_artwork(artwork_id.clone())
            .await
            .map_err(AuctionFailure::Repository)?
            .ok_or(AuctionFailure::ArtworkNotFound)?;

        if let Some(auction_id) = artwork.auction_id.filter(|_| artwork.is_auction) {
            self.repo
                .delete_auction(auction_id)
                .await
                .map_err(AuctionFailure::Repository)?;
            self.repo
                .clear_auction_link(artwork_id.clone(), as_of)
                .await
                .map_err(AuctionFailure::Repository)?;
        }

        self.repo
            .delete_artwork(artwork_id)
            .await
            .map_err(AuctionFailure::Repository)?;
        Ok(())
    }

    /// Retrieve an auction.
    pub async fn get_auction(&self, auction_id: R::AuctionId) -> AuctionResult<AuctionOf<R>, R> {
        self.repo
            .get_auction(auction_id)
            .await
            .map_err(AuctionFailure::Repository)?
            .ok_or(AuctionFailure::NotFound)
    }

    /// Retrieve the ongoing auction of an artwork, if any.
    pub async fn get_auction_by_artwork(
        &self,
        artwork_id: R::ArtworkId,
    ) -> AuctionResult<Option<AuctionOf<R>>, R> {
        self.repo
            .get_auction_by_artwork(artwork_id)
            .await
            .map_err(AuctionFailure::Repository)
    }

    /// Ongoing auctions that have not yet expired, soonest-ending first.
    pub async fn get_ongoing_auctions(
        &self,
        as_of: R::DateTime,
        limit: usize,
        skip: usize,
    ) -> AuctionResult<Vec<AuctionOf<R>>, R> {
        self.query(AuctionQuery::Ongoing { as_of }, limit, skip)
            .await
    }

    /// Completed auctions, most recently ended first.
    pub async fn get_ended_auctions(
        &self,
        limit: usize,
        skip: usize,
    ) -> AuctionResult<Vec<AuctionOf<R>>, R> {
        self.query(AuctionQuery::Ended, limit, skip).await
    }

    /// An artist's auctions, soonest-ending first.
    pub async fn get_auctions_by_artist(
        &self,
        artist_id: R::UserId,
        limit: usize,
        skip: usize,
    ) -> AuctionResult<Vec<AuctionOf<R>>, R> {
        self.query(AuctionQuery::ByArtist { artist_id }, limit, skip)
            .await
    }

    /// Ongoing auctions ending within `within` of `as_of`, soonest-ending first.
    pub async fn get_auctions_ending_soon(
        &self,
        as_of: R::DateTime,
        within: Duration,
        limit: usize,
    ) -> AuctionResult<Vec<AuctionOf<R>>, R> {
        self.query(AuctionQuery::EndingSoon { as_of, within }, limit, 0)
            .await
    }

    /// How many auctions an artist has run, regardless of status.
    pub async fn count_auctions_by_artist(&self, artist_id: R::UserId) -> AuctionResult<u64, R> {
        self.repo
            .count_auctions_by_artist(artist_id)
            .await
            .map_err(AuctionFailure::Repository)
    }

    async fn query(
        &self,
        query: AuctionQuery<R::DateTime, R::UserId>,
        limit: usize,
        skip: usize,
    ) -> AuctionResult<Vec<AuctionOf<R>>, R> {
        self.repo
            .query_auctions(query, limit, skip)
            .await
            .map_err(AuctionFailure::Repository)
    }
}
