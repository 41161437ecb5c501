use super::{
    ArtformRepository, ArtworkRepository, AuctionRepository, Repository, UserRepository,
};

/// The composition root of an auction service.
///
/// An application bundles the repository with the two external concerns the
/// core does not own: the clock and the identity provider. HTTP layers are
/// written generically against this trait.
pub trait Application {
    /// Per-request authentication material, e.g. a bearer token
    type Context: Send + Sync;

    /// The persistence gateway
    type Repository: AuctionRepository
        + ArtworkRepository
        + ArtformRepository
        + UserRepository;

    /// Access the repository
    fn database(&self) -> &Self::Repository;

    /// The current time
    fn now(&self) -> <Self::Repository as Repository>::DateTime;

    /// Produce a fresh, unique auction id
    fn generate_auction_id(&self) -> <Self::Repository as Repository>::AuctionId;

    /// Resolve the request's verified principal identifier, if any.
    ///
    /// The returned subject is looked up with [`UserRepository::get_user_by_subject`].
    fn principal(&self, context: &Self::Context) -> impl Future<Output = Option<String>> + Send;

    /// Whether the request carries operator privileges (e.g. running the expiry sweep).
    fn is_admin(&self, context: &Self::Context) -> impl Future<Output = bool> + Send;
}
