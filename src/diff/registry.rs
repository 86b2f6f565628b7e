//! Appender registry and dispatch.

use super::appenders::{
    CollectionChangeAppender, MapChangeAppender, ReferenceChangeAppender, ValueChangeAppender,
};
use super::traits::PropertyChangeAppender;
use crate::error::{DispatchErrorKind, GraphDeltaError, Result};
use crate::metamodel::{MetadataSource, Property, TypeCategory};
use std::fmt;

type Slot = Option<Box<dyn PropertyChangeAppender>>;

/// Immutable table holding exactly one appender per [`TypeCategory`].
///
/// Completeness is checked once by [`AppenderRegistryBuilder::build`], so
/// [`AppenderRegistry::appender_for`] is a plain table index.
pub struct AppenderRegistry {
    appenders: [Box<dyn PropertyChangeAppender>; TypeCategory::ALL.len()],
}

impl AppenderRegistry {
    /// Start registering appenders.
    pub fn builder() -> AppenderRegistryBuilder {
        AppenderRegistryBuilder::default()
    }

    /// Registry with the built-in appender for every category.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            appenders: [
                Box::new(ValueChangeAppender::for_primitives()),
                Box::new(ValueChangeAppender::for_value_objects()),
                Box::new(ReferenceChangeAppender),
                Box::new(CollectionChangeAppender),
                Box::new(MapChangeAppender),
            ],
        }
    }

    /// The appender registered for `category`.
    #[must_use]
    pub fn appender_for(&self, category: TypeCategory) -> &dyn PropertyChangeAppender {
        self.appenders[category.index()].as_ref()
    }

    /// Classify `property` and return the appender for its category.
    pub fn dispatch(
        &self,
        property: &Property,
        metadata: &dyn MetadataSource,
    ) -> Result<&dyn PropertyChangeAppender> {
        let category = metadata.classify(property)?;
        let appender = self.appender_for(category);
        tracing::trace!(
            property = property.name(),
            %category,
            appender = appender.name(),
            "Dispatched property"
        );
        Ok(appender)
    }
}

impl Default for AppenderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for AppenderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for category in TypeCategory::ALL {
            map.entry(&category.name(), &self.appender_for(category).name());
        }
        map.finish()
    }
}

/// Builder for [`AppenderRegistry`].
#[derive(Default)]
#[must_use]
pub struct AppenderRegistryBuilder {
    slots: [Slot; TypeCategory::ALL.len()],
}

impl AppenderRegistryBuilder {
    /// Register an appender for its supported category.
    ///
    /// Fails if another appender already claimed that category.
    pub fn register(mut self, appender: impl PropertyChangeAppender + 'static) -> Result<Self> {
        self.register_boxed(Box::new(appender))?;
        Ok(self)
    }

    /// Register an already boxed appender.
    pub fn register_boxed(&mut self, appender: Box<dyn PropertyChangeAppender>) -> Result<()> {
        let category = appender.supported_category();
        let slot = &mut self.slots[category.index()];
        if let Some(existing) = slot {
            return Err(GraphDeltaError::dispatch(
                "registering appender",
                DispatchErrorKind::DuplicateAppenderRegistration {
                    category,
                    existing: existing.name().to_string(),
                    rejected: appender.name().to_string(),
                },
            ));
        }
        *slot = Some(appender);
        Ok(())
    }

    /// Register the built-in appender for every category still empty.
    pub fn with_standard_fallbacks(mut self) -> Self {
        let standard = AppenderRegistry::standard();
        for (slot, appender) in self.slots.iter_mut().zip(standard.appenders) {
            if slot.is_none() {
                *slot = Some(appender);
            }
        }
        self
    }

    /// Finish the registry, failing if any category has no appender.
    pub fn build(self) -> Result<AppenderRegistry> {
        let [primitive, value, reference, collection, map] = self.slots;
        Ok(AppenderRegistry {
            appenders: [
                require(primitive, TypeCategory::Primitive)?,
                require(value, TypeCategory::Value)?,
                require(reference, TypeCategory::EntityReference)?,
                require(collection, TypeCategory::Collection)?,
                require(map, TypeCategory::Map)?,
            ],
        })
    }
}

fn require(slot: Slot, category: TypeCategory) -> Result<Box<dyn PropertyChangeAppender>> {
    slot.ok_or_else(|| {
        GraphDeltaError::dispatch(
            "building appender registry",
            DispatchErrorKind::NoAppenderRegistered(category),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::Change;
    use crate::error::GraphDeltaError;
    use crate::metamodel::{DeclaredType, EntityDefinition, NodePair, TypeMapper};

    struct Silent(TypeCategory);

    impl PropertyChangeAppender for Silent {
        fn supported_category(&self) -> TypeCategory {
            self.0
        }

        fn calculate_changes(
            &self,
            _pair: &NodePair,
            _property: &Property,
            _metadata: &dyn MetadataSource,
        ) -> Result<Vec<Change>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "Silent"
        }
    }

    #[test]
    fn test_standard_covers_every_category() {
        let registry = AppenderRegistry::standard();
        for category in TypeCategory::ALL {
            assert_eq!(registry.appender_for(category).supported_category(), category);
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let err = AppenderRegistry::builder()
            .register(Silent(TypeCategory::Map))
            .and_then(|b| b.register(MapChangeAppender))
            .err()
            .expect("duplicate must fail");
        assert!(matches!(
            err,
            GraphDeltaError::Dispatch {
                source: DispatchErrorKind::DuplicateAppenderRegistration {
                    category: TypeCategory::Map,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn test_incomplete_registry_fails() {
        let err = AppenderRegistry::builder()
            .register(ValueChangeAppender::for_primitives())
            .and_then(AppenderRegistryBuilder::build)
            .expect_err("missing categories");
        assert!(matches!(
            err,
            GraphDeltaError::Dispatch {
                source: DispatchErrorKind::NoAppenderRegistered(TypeCategory::Value),
                ..
            }
        ));
    }

    #[test]
    fn test_custom_appender_with_fallbacks() {
        let registry = AppenderRegistry::builder()
            .register(Silent(TypeCategory::Collection))
            .map(AppenderRegistryBuilder::with_standard_fallbacks)
            .and_then(AppenderRegistryBuilder::build)
            .expect("complete registry");
        assert_eq!(registry.appender_for(TypeCategory::Collection).name(), "Silent");
        assert_eq!(
            registry.appender_for(TypeCategory::Map).name(),
            "MapChangeAppender"
        );
    }

    #[test]
    fn test_dispatch_by_declared_type() {
        let mapper = TypeMapper::new([EntityDefinition::new("Person")
            .with_property("id", DeclaredType::Int)
            .with_property("tags", DeclaredType::set(DeclaredType::String))
            .into()])
        .expect("valid");
        let person = mapper.managed_class("Person").expect("Person");
        let tags = person.property("tags").expect("tags");

        let registry = AppenderRegistry::standard();
        let appender = registry.dispatch(tags, &mapper).expect("dispatch");
        assert_eq!(appender.supported_category(), TypeCategory::Collection);
    }
}
