use crate::outcome::ValidationErrors;
use crate::rules::RuleSpecs;
use attrguard_types::{AttributeBag, Value};

/// What the validation engine needs from the model it validates.
///
/// The engine reads configuration and the stored attributes, and writes
/// only through [`set_raw`](ModelHost::set_raw). A host's own validated
/// assignment path must never be reachable from here, or a fallback write
/// would re-enter validation.
pub trait ModelHost {
    /// Attributes as stored before the assignment being validated.
    fn attributes(&self) -> &AttributeBag;

    /// Stored value of one attribute. Change detection compares against this.
    fn previous(&self, attribute: &str) -> Option<&Value> {
        self.attributes().get(attribute)
    }

    /// Rule sets by attribute. Attributes without one are not validated.
    fn rule_specs(&self) -> Option<&RuleSpecs>;

    /// Fallback values by attribute.
    fn defaults(&self) -> Option<&AttributeBag> {
        None
    }

    /// Overwrites a stored attribute without validation or change events.
    fn set_raw(&mut self, attribute: &str, value: Value);

    /// Called once per validation call after the fallback policy wrote at
    /// least one default. Receives the full error list of that call.
    fn on_fallback(&mut self, errors: &ValidationErrors) {
        let _ = errors;
    }
}
