use super::AuctionOf;
use crate::models::{AuctionQuery, Bid};

/// Repository interface for auction persistence.
///
/// Implementations must make every method that mutates an auction a single
/// atomic operation against the stored record. Cross-record atomicity is not
/// required; the lifecycle manager compensates where it needs it.
pub trait AuctionRepository: super::Repository {
    /// Persist a new auction in the `ongoing` state with no bids, a current
    /// bid equal to `start_price`, and `as_of` as both start and creation time.
    fn create_auction(
        &self,
        auction_id: Self::AuctionId,
        artwork_id: Self::ArtworkId,
        artist_id: Self::UserId,
        start_price: i64,
        end_time: Self::DateTime,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<AuctionOf<Self>, Self::Error>> + Send;

    /// Retrieve an auction by id, returning Option::None if it does not exist.
    fn get_auction(
        &self,
        auction_id: Self::AuctionId,
    ) -> impl Future<Output = Result<Option<AuctionOf<Self>>, Self::Error>> + Send;

    /// Retrieve the persisted-ongoing auction of an artwork, if there is one.
    fn get_auction_by_artwork(
        &self,
        artwork_id: Self::ArtworkId,
    ) -> impl Future<Output = Result<Option<AuctionOf<Self>>, Self::Error>> + Send;

    /// List auctions matching `query`, in the order the query prescribes.
    fn query_auctions(
        &self,
        query: AuctionQuery<Self::DateTime, Self::UserId>,
        limit: usize,
        skip: usize,
    ) -> impl Future<Output = Result<Vec<AuctionOf<Self>>, Self::Error>> + Send;

    /// Conditionally append a bid.
    ///
    /// In a single atomic operation, append `bid` to the auction's bids and set
    /// the current bid and bidder from it, but only if the stored current bid
    /// still equals `observed_bid`, the stored status is `ongoing`, and the end
    /// time is not before `bid.time`.
    ///
    /// # Returns
    ///
    /// - Ok(Some(record)) with the updated auction if the write was applied
    /// - Ok(None) if the auction does not exist or a guard rejected the write
    /// - Err otherwise
    fn append_bid(
        &self,
        auction_id: Self::AuctionId,
        bid: Bid<Self::DateTime, Self::UserId>,
        observed_bid: i64,
    ) -> impl Future<Output = Result<Option<AuctionOf<Self>>, Self::Error>> + Send;

    /// Set the auction's status to `completed`.
    ///
    /// # Returns
    ///
    /// - Ok(true) if the auction exists (whether or not it was already completed)
    /// - Ok(false) if no such auction exists
    /// - Err otherwise
    fn complete_auction(
        &self,
        auction_id: Self::AuctionId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Complete every ongoing auction whose end time is at or before `as_of`.
    ///
    /// # Returns
    ///
    /// The number of auctions transitioned.
    fn complete_expired_auctions(
        &self,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Remove an auction.
    ///
    /// # Returns
    ///
    /// - Ok(true) if an auction was removed
    /// - Ok(false) if no such auction exists
    /// - Err otherwise
    fn delete_auction(
        &self,
        auction_id: Self::AuctionId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Count the auctions of an artist, regardless of status.
    fn count_auctions_by_artist(
        &self,
        artist_id: Self::UserId,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}
