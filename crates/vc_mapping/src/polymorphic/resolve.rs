use alloc::boxed::Box;
use alloc::sync::Arc;

use log::trace;
use serde_json::Value;

use crate::MappingError;
use crate::info::ClassId;
use crate::registry::MappingRegistry;
use crate::serde::Serializable;
use crate::value::JsonInput;

/// Chooses and creates the concrete instance for a base class.
///
/// Returning `Ok(None)` defers to the switch table.
pub type Resolver =
    Arc<dyn Fn(&Value) -> Result<Option<Box<dyn Serializable>>, MappingError> + Send + Sync>;

// -----------------------------------------------------------------------------
// Resolution

impl MappingRegistry {
    /// Registers the resolver of `base`, replacing any previous one.
    pub fn register_resolver<F>(&mut self, base: ClassId, resolver: F)
    where
        F: Fn(&Value) -> Result<Option<Box<dyn Serializable>>, MappingError>
            + Send
            + Sync
            + 'static,
    {
        self.resolvers.insert(base.type_id(), Arc::new(resolver));
    }

    /// Resolves the concrete subclass of `B` for `input` and populates it.
    ///
    /// See [`MappingRegistry::resolve_class`].
    #[inline]
    pub fn resolve<'i, B: Serializable>(
        &self,
        input: impl Into<JsonInput<'i>>,
    ) -> Result<Box<dyn Serializable>, MappingError> {
        self.resolve_class(ClassId::of::<B>(), input)
    }

    /// Resolves the concrete subclass of `base` for `input` and populates it.
    ///
    /// The resolver of `base` is tried first, then its switch cases. Fails with
    /// [`MappingError::PolymorphicResolutionFailed`] if neither yields an
    /// instance, and with [`MappingError::InvalidDiscriminant`] if the matching
    /// case's key is not mapped by the selected subclass.
    pub fn resolve_class<'i>(
        &self,
        base: ClassId,
        input: impl Into<JsonInput<'i>>,
    ) -> Result<Box<dyn Serializable>, MappingError> {
        let input = Value::Object(input.into().into_object()?);
        let mut instance = self
            .resolve_instance(base, &input, 0)?
            .ok_or(MappingError::PolymorphicResolutionFailed(base))?;

        self.deserialize(&mut *instance, input)?;
        Ok(instance)
    }

    fn resolve_instance(
        &self,
        base: ClassId,
        input: &Value,
        depth: usize,
    ) -> Result<Option<Box<dyn Serializable>>, MappingError> {
        if let Some(resolver) = self.resolvers.get(&base.type_id())
            && let Some(instance) = resolver(input)?
        {
            return Ok(Some(instance));
        }

        let Some(object) = input.as_object() else {
            return Ok(None);
        };

        for case in self.switch_cases(base) {
            if object.get(case.key()) != Some(case.value()) {
                continue;
            }

            let class = case.class();
            if !self
                .table_for(class)
                .is_some_and(|table| table.has_external_key(case.key()))
            {
                return Err(MappingError::InvalidDiscriminant {
                    class,
                    key: case.key().into(),
                });
            }

            trace!("`{}` = {} selects `{class}` for `{base}`", case.key(), case.value());

            // Descend while the selected subclass is itself a polymorphic base.
            if depth < self.switches.len() + self.resolvers.len()
                && let Some(deeper) = self.resolve_instance(class, input, depth + 1)?
            {
                return Ok(Some(deeper));
            }
            return Ok(Some(case.instantiate()));
        }

        Ok(None)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use serde_json::{Value, json};

    use crate::MappingError;
    use crate::fixtures::{Event, Figure, FigureX, FigureXPrime, FigureY, Login, init, registry};
    use crate::info::ClassId;
    use crate::registry::MappingRegistry;
    use crate::serde::Serializable;

    #[test]
    fn switch_resolution() {
        let registry = registry();
        let resolved = registry
            .resolve::<Figure>(r#"{"kind": "x", "size": 4, "x_only": true}"#)
            .unwrap();

        let x = resolved.downcast_ref::<FigureX>().unwrap();
        assert_eq!(x.base.kind.as_deref(), Some("x"));
        assert_eq!(x.base.size, Some(4));
        assert_eq!(x.x_only, Some(true));

        let resolved = registry.resolve::<Figure>(json!({"kind": "y"})).unwrap();
        assert!(resolved.is::<FigureY>());
    }

    #[test]
    fn unmatched_discriminant_fails() {
        let registry = registry();
        let err = registry.resolve::<Figure>(r#"{"kind": "z"}"#).unwrap_err();
        assert!(matches!(
            err,
            MappingError::PolymorphicResolutionFailed(class) if class == ClassId::of::<Figure>()
        ));

        let err = registry.resolve::<Figure>(r#"{"size": 1}"#).unwrap_err();
        assert!(matches!(err, MappingError::PolymorphicResolutionFailed(_)));
    }

    #[test]
    fn nested_cases_pick_most_specific() {
        let registry = registry();
        let resolved = registry
            .resolve::<Figure>(json!({"kind": "x", "variant": "prime", "size": 2}))
            .unwrap();
        let prime = resolved.downcast::<FigureXPrime>().unwrap();
        assert_eq!(prime.base.base.size, Some(2));

        let resolved = registry
            .resolve::<Figure>(json!({"kind": "x", "variant": "other"}))
            .unwrap();
        assert!(resolved.is::<FigureX>());
    }

    #[test]
    fn resolver_runs_before_switch() {
        let registry = registry();
        let resolved = registry
            .resolve::<Event>(r#"{"type": "login", "user": "ada"}"#)
            .unwrap();
        let login = resolved.downcast_ref::<Login>().unwrap();
        assert_eq!(login.user.as_deref(), Some("ada"));

        let err = registry.resolve::<Event>(r#"{"type": "logout"}"#).unwrap_err();
        assert!(matches!(err, MappingError::PolymorphicResolutionFailed(_)));
    }

    #[test]
    fn resolver_can_defer_to_switch() {
        let mut registry = registry();
        registry.register_resolver(ClassId::of::<Figure>(), |_| Ok(None));
        let resolved = registry.resolve::<Figure>(r#"{"kind": "y"}"#).unwrap();
        assert!(resolved.is::<FigureY>());
    }

    #[test]
    fn untracked_discriminant_is_rejected() {
        let mut registry = registry();
        let base = ClassId::of::<Figure>();
        let class = ClassId::of::<FigureY>();

        // Omitted value: checked at registration.
        let err = registry
            .register_switch(base, "shade", None, class, init::<FigureY>())
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidDiscriminant { key, .. } if key == "shade"));

        // Explicit value: checked when the case matches.
        registry
            .register_switch(base, "shade", Some(json!("dark")), class, init::<FigureY>())
            .unwrap();
        let err = registry.resolve::<Figure>(r#"{"shade": "dark"}"#).unwrap_err();
        assert!(matches!(err, MappingError::InvalidDiscriminant { .. }));
    }

    #[test]
    fn cases_are_scanned_in_order() {
        let mut registry = MappingRegistry::new();
        registry.register::<Figure>().unwrap();
        let base = ClassId::of::<Figure>();
        registry
            .register_switch(base, "kind", Some(json!("x")), base, init::<Figure>())
            .unwrap();
        registry
            .register_switch(base, "kind", Some(json!("x")), base, init::<FigureY>())
            .unwrap();

        let resolved = registry.resolve::<Figure>(r#"{"kind": "x"}"#).unwrap();
        assert!(resolved.is::<Figure>());
        assert_eq!(registry.switch_cases(base).len(), 2);
    }

    #[test]
    fn input_must_be_an_object() {
        let registry = registry();
        let err = registry.resolve::<Figure>(Value::Null).unwrap_err();
        assert!(matches!(err, MappingError::MalformedInput(_)));

        let boxed: Box<dyn Serializable> = registry.resolve::<Figure>(r#"{"kind":"y"}"#).unwrap();
        assert_eq!(boxed.class_id(), ClassId::of::<FigureY>());
    }
}
