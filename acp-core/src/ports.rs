mod app;
mod artform;
mod artwork;
mod auction;
mod user;

pub use app::Application;
pub use artform::ArtformRepository;
pub use artwork::ArtworkRepository;
pub use auction::AuctionRepository;
pub use user::UserRepository;

use crate::models::{ArtformRecord, ArtworkRecord, AuctionRecord, UserRecord};

/// The base trait shared by every repository port.
///
/// Implementations choose their own identifier and timestamp representations;
/// the remaining ports and the lifecycle manager are written against these
/// associated types only.
pub trait Repository: Sized {
    /// The error type for underlying storage operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// The type used for timestamps. Later instants must compare greater.
    type DateTime: Clone + Ord + Send + Sync + 'static;

    /// A unique identifier for users
    type UserId: Clone + Eq + Send + Sync + 'static;

    /// A unique identifier for artforms
    type ArtformId: Clone + Eq + Send + Sync + 'static;

    /// A unique identifier for artworks
    type ArtworkId: Clone + Eq + Send + Sync + 'static;

    /// A unique identifier for auctions
    type AuctionId: Clone + Eq + Send + Sync + 'static;
}

/// The auction record type of a repository.
pub type AuctionOf<R> = AuctionRecord<
    <R as Repository>::DateTime,
    <R as Repository>::UserId,
    <R as Repository>::ArtworkId,
    <R as Repository>::AuctionId,
>;

/// The artwork record type of a repository.
pub type ArtworkOf<R> = ArtworkRecord<
    <R as Repository>::DateTime,
    <R as Repository>::UserId,
    <R as Repository>::ArtformId,
    <R as Repository>::ArtworkId,
    <R as Repository>::AuctionId,
>;

/// The artform record type of a repository.
pub type ArtformOf<R> = ArtformRecord<<R as Repository>::DateTime, <R as Repository>::ArtformId>;

/// The user record type of a repository.
pub type UserOf<R> = UserRecord<<R as Repository>::DateTime, <R as Repository>::UserId>;
