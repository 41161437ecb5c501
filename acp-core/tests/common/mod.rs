#![allow(dead_code)]

use acp_core::{
    models::{
        ArtworkData, ArtworkRecord, AuctionQuery, AuctionRecord, AuctionStatus, Bid,
    },
    ports::{ArtworkOf, ArtworkRepository, AuctionOf, AuctionRepository, Repository},
};
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

// Timestamps are plain seconds and every id is a u64; the core never looks
// inside either, which keeps these tests free of any clock.
pub type Auction = AuctionRecord<i64, u64, u64, u64>;
pub type Artwork = ArtworkRecord<i64, u64, u64, u64, u64>;

#[derive(Debug, thiserror::Error)]
#[error("storage unavailable")]
pub struct Unavailable;

#[derive(Default)]
pub struct State {
    pub auctions: BTreeMap<u64, Auction>,
    pub artworks: BTreeMap<u64, Artwork>,
}

impl State {
    /// Apply a bid directly, as a competing writer would.
    pub fn push_bid(&mut self, auction_id: u64, user_id: u64, amount: i64, time: i64) {
        let auction = self.auctions.get_mut(&auction_id).expect("unknown auction");
        auction.bids.push(Bid {
            user_id,
            amount,
            time,
        });
        auction.current_bid = amount;
        auction.current_bidder = Some(user_id);
    }
}

type Hook = Box<dyn FnOnce(&mut State) + Send>;

/// An in-memory repository.
///
/// Hooks registered with [`MemoryRepo::interleave`] run inside `append_bid`,
/// after the manager has validated against the state it read but before the
/// guard is evaluated, which is exactly the window a concurrent writer hits.
#[derive(Default)]
pub struct MemoryRepo {
    pub state: Mutex<State>,
    hooks: Mutex<Vec<Hook>>,
    pub fail_linkage: AtomicBool,
}

impl MemoryRepo {
    pub fn interleave(&self, hook: impl FnOnce(&mut State) + Send + 'static) {
        self.hooks.lock().unwrap().push(Box::new(hook));
    }

    pub fn with_artwork(artwork_id: u64, artist_id: u64) -> Self {
        let repo = Self::default();
        repo.state.lock().unwrap().artworks.insert(
            artwork_id,
            ArtworkRecord {
                id: artwork_id,
                artist_id,
                artform_id: 1,
                data: ArtworkData {
                    title: "Tree of Life".into(),
                    description: "Warli on cloth".into(),
                    final_image_url: "https://img.example/tree.jpg".into(),
                    price: 5000,
                    for_sale: true,
                },
                is_auction: false,
                auction_id: None,
                created_at: 0,
                updated_at: 0,
            },
        );
        repo
    }

    pub fn auction(&self, auction_id: u64) -> Auction {
        self.state.lock().unwrap().auctions[&auction_id].clone()
    }

    pub fn artwork(&self, artwork_id: u64) -> Option<Artwork> {
        self.state.lock().unwrap().artworks.get(&artwork_id).cloned()
    }

    /// Insert an auction directly, bypassing the manager's validation.
    pub fn insert_auction(&self, auction_id: u64, end_time: i64, status: AuctionStatus) {
        self.state.lock().unwrap().auctions.insert(
            auction_id,
            AuctionRecord {
                id: auction_id,
                artwork_id: 100 + auction_id,
                artist_id: 7,
                start_price: 100,
                current_bid: 100,
                current_bidder: None,
                bids: Vec::new(),
                start_time: 0,
                end_time,
                status,
                created_at: 0,
            },
        );
    }
}

impl Repository for MemoryRepo {
    type Error = Unavailable;
    type DateTime = i64;
    type UserId = u64;
    type ArtformId = u64;
    type ArtworkId = u64;
    type AuctionId = u64;
}

impl AuctionRepository for MemoryRepo {
    async fn create_auction(
        &self,
        auction_id: u64,
        artwork_id: u64,
        artist_id: u64,
        start_price: i64,
        end_time: i64,
        as_of: i64,
    ) -> Result<AuctionOf<Self>, Self::Error> {
        let record = AuctionRecord {
            id: auction_id,
            artwork_id,
            artist_id,
            start_price,
            current_bid: start_price,
            current_bidder: None,
            bids: Vec::new(),
            start_time: as_of,
            end_time,
            status: AuctionStatus::Ongoing,
            created_at: as_of,
        };
        self.state
            .lock()
            .unwrap()
            .auctions
            .insert(auction_id, record.clone());
        Ok(record)
    }

    async fn get_auction(&self, auction_id: u64) -> Result<Option<AuctionOf<Self>>, Self::Error> {
        Ok(self.state.lock().unwrap().auctions.get(&auction_id).cloned())
    }

    async fn get_auction_by_artwork(
        &self,
        artwork_id: u64,
    ) -> Result<Option<AuctionOf<Self>>, Self::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .auctions
            .values()
            .find(|a| a.artwork_id == artwork_id && a.status == AuctionStatus::Ongoing)
            .cloned())
    }

    async fn query_auctions(
        &self,
        query: AuctionQuery<i64, u64>,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<AuctionOf<Self>>, Self::Error> {
        let state = self.state.lock().unwrap();
        let mut matches: Vec<Auction> = state
            .auctions
            .values()
            .filter(|a| match &query {
                AuctionQuery::Ongoing { as_of } => {
                    a.status == AuctionStatus::Ongoing && a.end_time > *as_of
                }
                AuctionQuery::Ended => a.status == AuctionStatus::Completed,
                AuctionQuery::ByArtist { artist_id } => a.artist_id == *artist_id,
                AuctionQuery::EndingSoon { as_of, within } => {
                    a.status == AuctionStatus::Ongoing
                        && a.end_time > *as_of
                        && a.end_time <= *as_of + within.as_secs() as i64
                }
            })
            .cloned()
            .collect();

        if matches!(query, AuctionQuery::Ended) {
            matches.sort_by(|a, b| b.end_time.cmp(&a.end_time));
        } else {
            matches.sort_by_key(|a| a.end_time);
        }

        Ok(matches.into_iter().skip(skip).take(limit).collect())
    }

    async fn append_bid(
        &self,
        auction_id: u64,
        bid: Bid<i64, u64>,
        observed_bid: i64,
    ) -> Result<Option<AuctionOf<Self>>, Self::Error> {
        let hook = {
            let mut hooks = self.hooks.lock().unwrap();
            (!hooks.is_empty()).then(|| hooks.remove(0))
        };

        let mut state = self.state.lock().unwrap();
        if let Some(hook) = hook {
            hook(&mut state);
        }

        let Some(auction) = state.auctions.get_mut(&auction_id) else {
            return Ok(None);
        };
        if auction.current_bid != observed_bid
            || auction.status != AuctionStatus::Ongoing
            || auction.end_time < bid.time
        {
            return Ok(None);
        }

        auction.current_bid = bid.amount;
        auction.current_bidder = Some(bid.user_id);
        auction.bids.push(bid);
        Ok(Some(auction.clone()))
    }

    async fn complete_auction(&self, auction_id: u64) -> Result<bool, Self::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .auctions
            .get_mut(&auction_id)
            .map(|a| a.status = AuctionStatus::Completed)
            .is_some())
    }

    async fn complete_expired_auctions(&self, as_of: i64) -> Result<u64, Self::Error> {
        let mut count = 0;
        for auction in self.state.lock().unwrap().auctions.values_mut() {
            if auction.status == AuctionStatus::Ongoing && auction.end_time <= as_of {
                auction.status = AuctionStatus::Completed;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_auction(&self, auction_id: u64) -> Result<bool, Self::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .auctions
            .remove(&auction_id)
            .is_some())
    }

    async fn count_auctions_by_artist(&self, artist_id: u64) -> Result<u64, Self::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .auctions
            .values()
            .filter(|a| a.artist_id == artist_id)
            .count() as u64)
    }
}

impl ArtworkRepository for MemoryRepo {
    async fn create_artwork(
        &self,
        artwork_id: u64,
        artist_id: u64,
        artform_id: u64,
        data: ArtworkData,
        as_of: i64,
    ) -> Result<ArtworkOf<Self>, Self::Error> {
        let record = ArtworkRecord {
            id: artwork_id,
            artist_id,
            artform_id,
            data,
            is_auction: false,
            auction_id: None,
            created_at: as_of,
            updated_at: as_of,
        };
        self.state
            .lock()
            .unwrap()
            .artworks
            .insert(artwork_id, record.clone());
        Ok(record)
    }

    async fn get_artwork(&self, artwork_id: u64) -> Result<Option<ArtworkOf<Self>>, Self::Error> {
        Ok(self.artwork(artwork_id))
    }

    async fn mark_as_in_auction(
        &self,
        artwork_id: u64,
        auction_id: u64,
        as_of: i64,
    ) -> Result<bool, Self::Error> {
        if self.fail_linkage.load(Ordering::SeqCst) {
            return Err(Unavailable);
        }
        let mut state = self.state.lock().unwrap();
        Ok(match state.artworks.get_mut(&artwork_id) {
            Some(artwork) => {
                artwork.is_auction = true;
                artwork.auction_id = Some(auction_id);
                artwork.updated_at = as_of;
                true
            }
            None => false,
        })
    }

    async fn clear_auction_link(&self, artwork_id: u64, as_of: i64) -> Result<bool, Self::Error> {
        let mut state = self.state.lock().unwrap();
        Ok(match state.artworks.get_mut(&artwork_id) {
            Some(artwork) => {
                artwork.is_auction = false;
                artwork.auction_id = None;
                artwork.updated_at = as_of;
                true
            }
            None => false,
        })
    }

    async fn delete_artwork(&self, artwork_id: u64) -> Result<bool, Self::Error> {
        let mut state = self.state.lock().unwrap();
        state.auctions.retain(|_, a| a.artwork_id != artwork_id);
        Ok(state.artworks.remove(&artwork_id).is_some())
    }
}
