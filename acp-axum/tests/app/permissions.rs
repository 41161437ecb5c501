use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

// In order to test the permission checks in our endpoints, the identity of
// the caller is encoded as plain text into the `Authorization: Bearer <...>`
// header. This allows us to easily construct "tokens" for any user.
#[derive(Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

impl Permissions {
    pub fn user(subject: &str) -> Self {
        Self {
            subject: Some(subject.to_owned()),
            admin: false,
        }
    }
}

impl Display for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = serde_html_form::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl FromStr for Permissions {
    type Err = serde_html_form::de::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let deserializer = serde_html_form::Deserializer::new(form_urlencoded::parse(s.as_bytes()));
        Self::deserialize(deserializer)
    }
}
