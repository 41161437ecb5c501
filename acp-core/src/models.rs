mod artwork;
mod auction;
mod user;

pub use artwork::{ArtformData, ArtformRecord, ArtworkData, ArtworkRecord};
pub use auction::{AuctionQuery, AuctionRecord, AuctionStatus, Bid, BidRejection, UnknownStatus};
pub use user::{UnknownRole, UserData, UserRecord, UserRole};
