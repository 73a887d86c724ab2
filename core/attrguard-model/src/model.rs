use crate::config::ModelConfig;
use crate::error::ConfigResult;
use crate::events::ModelEvent;
use attrguard_types::{AttributeBag, Value};
use attrguard_validator::{
    ModelHost, RuleSpec, RuleSpecs, ValidateOptions, ValidationErrors, Validator, ValidatorConfig,
    changed_attributes, run_rules,
};
use std::fmt;
use tracing::{debug, trace};

/// Callback registered with [`Model::on`].
pub type Listener = Box<dyn FnMut(&Model, &ModelEvent) + Send>;

/// Options for [`Model::set`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Run the validation engine before committing.
    pub validate: bool,
    /// Overrides the model's fallback setting for this call.
    pub use_defaults: Option<bool>,
}

impl SetOptions {
    #[must_use]
    pub fn validated() -> Self {
        Self {
            validate: true,
            use_defaults: None,
        }
    }

    #[must_use]
    pub fn use_defaults(mut self, enabled: bool) -> Self {
        self.use_defaults = Some(enabled);
        self
    }
}

/// An in-memory attribute store guarded by per-attribute rules.
///
/// Unvalidated sets always commit. A validated set commits all of its
/// attributes or none of them; when it is rejected, only defaults written
/// by the fallback policy reach the stored state.
pub struct Model {
    attributes: AttributeBag,
    previous: AttributeBag,
    changed: Vec<String>,
    specs: RuleSpecs,
    defaults: AttributeBag,
    validator: Validator,
    validation_error: Option<ValidationErrors>,
    listeners: Vec<Listener>,
    pending: Vec<ModelEvent>,
}

impl Model {
    #[must_use]
    pub fn new(specs: RuleSpecs) -> Self {
        Self {
            attributes: AttributeBag::new(),
            previous: AttributeBag::new(),
            changed: Vec::new(),
            specs,
            defaults: AttributeBag::new(),
            validator: Validator::default(),
            validation_error: None,
            listeners: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Declares defaults and seeds every attribute not yet stored with its
    /// default. Seeding is not validated.
    #[must_use]
    pub fn with_defaults(mut self, defaults: AttributeBag) -> Self {
        for (name, value) in &defaults {
            self.attributes
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        self.defaults = defaults;
        self
    }

    /// Adds or replaces one attribute's rules. Custom predicates, which a
    /// schema file cannot express, are attached this way.
    #[must_use]
    pub fn with_spec(mut self, attribute: impl Into<String>, spec: RuleSpec) -> Self {
        self.specs.insert(attribute.into(), spec);
        self
    }

    #[must_use]
    pub fn with_validator_config(mut self, config: ValidatorConfig) -> Self {
        self.validator = Validator::new(config);
        self
    }

    /// Builds a model from a declarative schema.
    pub fn from_config(config: &ModelConfig) -> ConfigResult<Self> {
        let model = Self::new(config.rule_specs()?)
            .with_defaults(config.defaults.clone())
            .with_validator_config(config.validator_config());
        Ok(model)
    }

    // ── reads ────────────────────────────────────────────────────

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    /// Attributes as they were before the last committed set.
    #[must_use]
    pub fn previous_attributes(&self) -> &AttributeBag {
        &self.previous
    }

    /// Attributes whose value the last committed set changed.
    #[must_use]
    pub fn changed(&self) -> &[String] {
        &self.changed
    }

    #[must_use]
    pub fn has_changed(&self, attribute: &str) -> bool {
        self.changed.iter().any(|name| name == attribute)
    }

    #[must_use]
    pub fn rule_specs(&self) -> &RuleSpecs {
        &self.specs
    }

    #[must_use]
    pub fn defaults(&self) -> &AttributeBag {
        &self.defaults
    }

    #[must_use]
    pub fn validator_config(&self) -> &ValidatorConfig {
        self.validator.config()
    }

    /// Errors from the last rejected set, cleared by the next commit.
    #[must_use]
    pub fn validation_error(&self) -> Option<&ValidationErrors> {
        self.validation_error.as_ref()
    }

    /// Runs every attribute's rules against its stored value.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (name, value) in &self.attributes {
            if let Some(spec) = self.specs.get(name) {
                errors.extend(run_rules(name, value, spec));
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate_all().is_ok()
    }

    // ── writes ───────────────────────────────────────────────────

    /// Registers a listener for every later [`ModelEvent`].
    pub fn on<F>(&mut self, listener: F)
    where
        F: FnMut(&Model, &ModelEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Assigns a bag of attributes.
    ///
    /// With `options.validate` the engine checks the changed attributes
    /// first. A rejected set stores nothing from `incoming`, records the
    /// errors as [`validation_error`](Model::validation_error), emits
    /// [`ModelEvent::Invalid`] and returns them.
    pub fn set(
        &mut self,
        incoming: AttributeBag,
        options: SetOptions,
    ) -> Result<(), ValidationErrors> {
        if options.validate {
            let validator = self.validator.clone();
            let outcome = validator.validate(
                self,
                &incoming,
                &ValidateOptions {
                    use_defaults: options.use_defaults,
                },
            );
            for event in std::mem::take(&mut self.pending) {
                self.emit(event);
            }

            if let Err(errors) = outcome {
                debug!(failures = errors.len(), "set rejected");
                self.validation_error = Some(errors.clone());
                self.emit(ModelEvent::Invalid {
                    errors: errors.clone(),
                });
                return Err(errors);
            }
        }

        self.commit(incoming);
        Ok(())
    }

    /// Assigns `incoming` without running the engine. Emits
    /// [`ModelEvent::Change`] like any committed set.
    pub fn store(&mut self, incoming: AttributeBag) {
        self.commit(incoming);
    }

    /// Assigns a single attribute.
    pub fn set_attr(
        &mut self,
        attribute: impl Into<String>,
        value: impl Into<Value>,
        options: SetOptions,
    ) -> Result<(), ValidationErrors> {
        let mut incoming = AttributeBag::new();
        incoming.insert(attribute.into(), value.into());
        self.set(incoming, options)
    }

    fn commit(&mut self, incoming: AttributeBag) {
        let changed: Vec<String> = changed_attributes(&self.attributes, &incoming)
            .into_iter()
            .map(str::to_owned)
            .collect();

        self.previous = self.attributes.clone();
        self.attributes.extend(incoming);
        self.validation_error = None;
        self.changed = changed.clone();

        if !changed.is_empty() {
            self.emit(ModelEvent::Change { changed });
        }
    }

    fn emit(&mut self, event: ModelEvent) {
        trace!(event = event.name(), listeners = self.listeners.len(), "emit");
        // Listeners only see `&Model`, so none can be added while we iterate.
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in &mut listeners {
            listener(&*self, &event);
        }
        self.listeners = listeners;
    }
}

impl ModelHost for Model {
    fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    fn rule_specs(&self) -> Option<&RuleSpecs> {
        Some(&self.specs)
    }

    fn defaults(&self) -> Option<&AttributeBag> {
        Some(&self.defaults)
    }

    fn set_raw(&mut self, attribute: &str, value: Value) {
        self.attributes.insert(attribute.to_owned(), value);
    }

    fn on_fallback(&mut self, errors: &ValidationErrors) {
        self.pending.push(ModelEvent::Fallback {
            errors: errors.clone(),
        });
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("attributes", &self.attributes)
            .field("changed", &self.changed)
            .field("specs", &self.specs.keys().collect::<Vec<_>>())
            .field("defaults", &self.defaults)
            .field("validator", &self.validator)
            .field("validation_error", &self.validation_error)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
