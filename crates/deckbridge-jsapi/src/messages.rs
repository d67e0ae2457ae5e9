//! Localized text for contract failures.
//!
//! Messages are resolved once through a Fluent-backed localizer and cached as
//! plain strings, so the dispatcher can be shared across threads without
//! holding the Fluent bundle.

use ortho_config::{FluentLocalizer, Localizer, NoOpLocalizer};

/// Embedded en-US Fluent catalogue.
pub(crate) static DECKBRIDGE_EN_US: &str = include_str!("../locales/en-US/messages.ftl");

/// Message definitions: `(fluent_id, english_fallback)`.
///
/// The fallback values must match `locales/en-US/messages.ftl`; the
/// `fluent_and_fallback_outputs_are_identical` test guards against drift.
mod contract {
    pub(super) const CONTACT_MISSING: (&str, &str) = (
        "deckbridge-contract-contact-missing",
        "This card template uses the JavaScript API but does not declare a developer contact.",
    );
    pub(super) const INVALID_VERSION: (&str, &str) = (
        "deckbridge-contract-invalid-version",
        "Invalid JavaScript API version",
    );
    pub(super) const OUTDATED_VERSION: (&str, &str) = (
        "deckbridge-contract-outdated-version",
        "Outdated JavaScript API version",
    );
    pub(super) const CURRENT_VERSION: (&str, &str) = (
        "deckbridge-contract-current-version",
        "The current version is",
    );
    pub(super) const CONTACT_DEVELOPER: (&str, &str) = (
        "deckbridge-contract-contact-developer",
        "Please contact the template developer:",
    );
}

fn msg(localizer: &dyn Localizer, entry: &(&str, &str)) -> String {
    localizer.message(entry.0, None, entry.1)
}

/// Builds the localizer used for contract messages.
///
/// Falls back to [`NoOpLocalizer`] when the Fluent catalogue fails to load, so
/// a localization fault never prevents the dispatcher from starting.
#[must_use]
pub fn build_localizer() -> Box<dyn Localizer> {
    match FluentLocalizer::with_en_us_defaults([DECKBRIDGE_EN_US]) {
        Ok(loc) => Box::new(loc),
        Err(_) => Box::new(NoOpLocalizer),
    }
}

/// Resolved contract failure fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMessages {
    contact_missing: String,
    invalid_version: String,
    outdated_version: String,
    current_version: String,
    contact_developer: String,
}

impl ContractMessages {
    /// Resolves every fragment through `localizer`.
    #[must_use]
    pub fn from_localizer(localizer: &dyn Localizer) -> Self {
        use contract::{
            CONTACT_DEVELOPER, CONTACT_MISSING, CURRENT_VERSION, INVALID_VERSION, OUTDATED_VERSION,
        };
        Self {
            contact_missing: msg(localizer, &CONTACT_MISSING),
            invalid_version: msg(localizer, &INVALID_VERSION),
            outdated_version: msg(localizer, &OUTDATED_VERSION),
            current_version: msg(localizer, &CURRENT_VERSION),
            contact_developer: msg(localizer, &CONTACT_DEVELOPER),
        }
    }

    /// Resolves fragments from the embedded catalogue.
    #[must_use]
    pub fn load() -> Self {
        Self::from_localizer(build_localizer().as_ref())
    }

    /// Hardcoded English fragments.
    #[must_use]
    pub fn english() -> Self {
        Self::from_localizer(&NoOpLocalizer)
    }

    /// Message for a missing developer contact.
    #[must_use]
    pub fn contact_missing(&self) -> &str {
        &self.contact_missing
    }

    /// Lead-in for an invalid version.
    #[must_use]
    pub fn invalid_version(&self) -> &str {
        &self.invalid_version
    }

    /// Lead-in for an outdated version.
    #[must_use]
    pub fn outdated_version(&self) -> &str {
        &self.outdated_version
    }

    /// Label preceding the current API version.
    #[must_use]
    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Label preceding the developer contact.
    #[must_use]
    pub fn contact_developer(&self) -> &str {
        &self.contact_developer
    }
}

impl Default for ContractMessages {
    fn default() -> Self {
        Self::load()
    }
}
