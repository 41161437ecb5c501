//! Application implementation with JWT-based identity.
//!
//! Bearer tokens are HS256 JWTs. The standard `sub` claim is the external
//! subject that maps onto a platform user, and a custom `admin` claim marks
//! operators.

use acp_core::ports::Application;
use acp_sqlite::{
    Db,
    types::{AuctionId, DateTime},
};
use headers::{Authorization, authorization::Bearer};
use jwt_simple::{
    claims::JWTClaims,
    prelude::{HS256Key, MACLike},
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The demo application: SQLite storage plus JWT verification.
#[derive(Clone)]
pub struct DemoApp {
    /// Database connection for persistent storage
    pub db: Db,
    /// HMAC key for JWT token verification
    pub key: HS256Key,
}

impl DemoApp {
    /// Extract and verify JWT claims from the authorization header.
    fn claims(&self, context: &Authorization<Bearer>) -> Option<JWTClaims<CustomJWTClaims>> {
        let token = context.0.token();
        self.key.verify_token::<CustomJWTClaims>(token, None).ok()
    }
}

impl Application for DemoApp {
    type Context = Authorization<Bearer>;
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.db
    }

    fn now(&self) -> DateTime {
        time::OffsetDateTime::now_utc().into()
    }

    fn generate_auction_id(&self) -> AuctionId {
        let now = time::OffsetDateTime::now_utc();
        let rng56 = rand::rng().next_u64() >> 8; // 56 random bits

        // Current timestamp, partitioned into (48, 12, 4) bits and splatted into a V8 pattern with id tag
        let now = now.unix_timestamp() as u64;
        let now48 = 0xffff_ffff_ffff_0000 & now;
        let now12 = (0xfff0 & now) >> 4;
        let now04 = (0x000f & now) << 56;

        let hi = 0x0000_0000_0000_8000 | now48 | now12;
        let lo = 0x8000_0000_0000_0000 | now04 | rng56;

        Uuid::from_u64_pair(hi, lo).into()
    }

    async fn principal(&self, context: &Self::Context) -> Option<String> {
        // The demo app takes the standard sub: claim as the user's subject
        self.claims(context)?.subject
    }

    async fn is_admin(&self, context: &Self::Context) -> bool {
        self.claims(context)
            .map(|claims| claims.custom.admin)
            .unwrap_or(false)
    }
}

/// Custom claims structure for JWT tokens.
#[derive(Serialize, Deserialize)]
pub struct CustomJWTClaims {
    /// Indicates whether the token holder has operator privileges.
    #[serde(default)]
    pub admin: bool,
}
