use super::UserOf;
use crate::models::UserData;

/// Repository interface for users.
///
/// Authentication happens elsewhere; this port maps the identity provider's
/// subject onto a platform user and exposes the fields auction pages display.
pub trait UserRepository: super::Repository {
    /// Create a new user. The subject must be unique.
    fn create_user(
        &self,
        user_id: Self::UserId,
        data: UserData,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<UserOf<Self>, Self::Error>> + Send;

    /// Retrieve a user by id, returning Option::None if it does not exist.
    fn get_user(
        &self,
        user_id: Self::UserId,
    ) -> impl Future<Output = Result<Option<UserOf<Self>>, Self::Error>> + Send;

    /// Retrieve the user registered for an identity provider subject.
    fn get_user_by_subject(
        &self,
        subject: &str,
    ) -> impl Future<Output = Result<Option<UserOf<Self>>, Self::Error>> + Send;
}
