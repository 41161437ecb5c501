use super::ArtformOf;
use crate::models::ArtformData;

/// Repository interface for artforms, limited to what auction pages display.
pub trait ArtformRepository: super::Repository {
    /// Create a new artform.
    fn create_artform(
        &self,
        artform_id: Self::ArtformId,
        data: ArtformData,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<ArtformOf<Self>, Self::Error>> + Send;

    /// Retrieve an artform, returning Option::None if it does not exist.
    fn get_artform(
        &self,
        artform_id: Self::ArtformId,
    ) -> impl Future<Output = Result<Option<ArtformOf<Self>>, Self::Error>> + Send;
}
