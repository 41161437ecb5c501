use super::ArtworkOf;
use crate::models::ArtworkData;

/// Repository interface for the artwork slice the auction subsystem touches.
///
/// Artworks are owned by an external collaborator; besides creation and
/// lookup, only the auction linkage fields are written through this port.
pub trait ArtworkRepository: super::Repository {
    /// Create a new artwork that is not linked to any auction.
    fn create_artwork(
        &self,
        artwork_id: Self::ArtworkId,
        artist_id: Self::UserId,
        artform_id: Self::ArtformId,
        data: ArtworkData,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<ArtworkOf<Self>, Self::Error>> + Send;

    /// Retrieve an artwork, returning Option::None if it does not exist.
    fn get_artwork(
        &self,
        artwork_id: Self::ArtworkId,
    ) -> impl Future<Output = Result<Option<ArtworkOf<Self>>, Self::Error>> + Send;

    /// Atomically set `is_auction` and the back-reference to `auction_id`.
    ///
    /// # Returns
    ///
    /// - Ok(true) if the artwork was updated
    /// - Ok(false) if no such artwork exists
    /// - Err otherwise
    fn mark_as_in_auction(
        &self,
        artwork_id: Self::ArtworkId,
        auction_id: Self::AuctionId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Atomically unset `is_auction` and the auction back-reference.
    ///
    /// # Returns
    ///
    /// - Ok(true) if the artwork was updated
    /// - Ok(false) if no such artwork exists
    /// - Err otherwise
    fn clear_auction_link(
        &self,
        artwork_id: Self::ArtworkId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Remove an artwork. Any auctions still referencing it are removed with it.
    ///
    /// # Returns
    ///
    /// - Ok(true) if the artwork was removed
    /// - Ok(false) if no such artwork exists
    /// - Err otherwise
    fn delete_artwork(
        &self,
        artwork_id: Self::ArtworkId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
