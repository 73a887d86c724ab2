use attrguard_validator::ValidationErrors;

/// Something a [`Model`](crate::Model) tells its listeners about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// A set committed new values for these attributes.
    Change { changed: Vec<String> },
    /// A validated set was rejected.
    Invalid { errors: ValidationErrors },
    /// Declared defaults replaced invalid values. Fires before the
    /// matching [`Invalid`](ModelEvent::Invalid).
    Fallback { errors: ValidationErrors },
}

impl ModelEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Change { .. } => "change",
            Self::Invalid { .. } => "invalid",
            Self::Fallback { .. } => "fallback",
        }
    }

    /// The error list carried by `Invalid` and `Fallback`.
    #[must_use]
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid { errors } | Self::Fallback { errors } => Some(errors),
            Self::Change { .. } => None,
        }
    }
}
