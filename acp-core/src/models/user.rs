use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// The role a user plays on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum UserRole {
    /// May create artworks and auction them
    Artist,
    /// May bid and enroll
    Student,
    /// Platform operator
    Admin,
}

impl UserRole {
    /// The canonical lowercase name, as persisted and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when parsing an unrecognized role.
#[derive(Debug, Error)]
#[error("unknown user role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artist" => Ok(Self::Artist),
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// The caller-supplied fields of a new user.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct UserData {
    /// The principal identifier issued by the external identity provider
    pub subject: String,
    /// What the user may do
    pub role: UserRole,
    /// Display name
    pub name: String,
    /// Avatar location
    pub profile_pic: Option<String>,
    /// Short biography
    pub bio: Option<String>,
}

/// A platform user.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct UserRecord<DateTime, UserId> {
    /// The unique identifier of the user
    pub id: UserId,
    /// The caller-supplied fields
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: UserData,
    /// When the record was created
    pub created_at: DateTime,
}
