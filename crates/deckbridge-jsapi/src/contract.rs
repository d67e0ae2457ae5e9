//! Validation of the caller contract: developer contact and API version.
//!
//! Card templates declare who wrote them and which API version they target.
//! Calls are refused before any business logic runs when the contact is
//! missing or the version cannot be served.

use semver::Version;
use thiserror::Error;

use crate::errors::ErrorCode;
use crate::messages::ContractMessages;

/// API version served by this dispatcher.
pub const CURRENT_VERSION: &str = "1.0.0";

const CURRENT: Version = Version::new(1, 0, 0);

/// Reasons a caller contract is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// The developer contact is absent or blank.
    #[error("missing developer contact")]
    MissingContact,
    /// The version is absent, unparseable, or newer than the current API.
    #[error("invalid API version '{version}' (developer: {developer})")]
    InvalidVersion {
        /// Version string as supplied by the caller.
        version: String,
        /// Developer contact supplied by the caller.
        developer: String,
    },
    /// The version targets an older major release.
    #[error("outdated API version '{requested}', current is '{current}' (developer: {developer})")]
    OutdatedVersion {
        /// Version served by this dispatcher.
        current: String,
        /// Version supplied by the caller.
        requested: String,
        /// Developer contact supplied by the caller.
        developer: String,
    },
}

impl ContractError {
    fn invalid_version(version: impl Into<String>, developer: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            developer: developer.into(),
        }
    }

    /// Integer code reported to the calling script.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingContact => ErrorCode::MissingContact,
            Self::InvalidVersion { .. } => ErrorCode::InvalidVersion,
            Self::OutdatedVersion { .. } => ErrorCode::OutdatedVersion,
        }
    }

    /// Renders the developer-facing message in the configured locale.
    #[must_use]
    pub fn localized_message(&self, messages: &ContractMessages) -> String {
        match self {
            Self::MissingContact => messages.contact_missing().to_owned(),
            Self::InvalidVersion { version, developer } => format!(
                "{} '{version}'. {} {developer}",
                messages.invalid_version(),
                messages.contact_developer(),
            ),
            Self::OutdatedVersion {
                current,
                requested,
                developer,
            } => format!(
                "{} '{requested}'. {} {current}. {} {developer}",
                messages.outdated_version(),
                messages.current_version(),
                messages.contact_developer(),
            ),
        }
    }
}

/// Checks the developer contact and requested version against [`CURRENT_VERSION`].
///
/// Requests on the current major version are accepted regardless of minor or
/// patch differences. Newer versions are invalid, older majors are outdated.
///
/// # Errors
///
/// Returns the first [`ContractError`] that applies.
pub fn validate_contract(developer: Option<&str>, version: Option<&str>) -> Result<(), ContractError> {
    let contact = match developer {
        Some(contact) if !contact.trim().is_empty() => contact,
        _ => return Err(ContractError::MissingContact),
    };
    let Some(raw) = version else {
        return Err(ContractError::invalid_version("", contact));
    };
    let requested =
        Version::parse(raw).map_err(|_| ContractError::invalid_version(raw, contact))?;

    if requested > CURRENT {
        Err(ContractError::invalid_version(raw, contact))
    } else if requested.major == CURRENT.major {
        Ok(())
    } else if requested < CURRENT {
        Err(ContractError::OutdatedVersion {
            current: CURRENT_VERSION.to_owned(),
            requested: raw.to_owned(),
            developer: contact.to_owned(),
        })
    } else {
        Err(ContractError::invalid_version(raw, contact))
    }
}
