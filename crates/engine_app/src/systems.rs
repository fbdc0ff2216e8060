//! Demo systems. Each owns one component kind, keyed by entity.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use engine_component::{Component, ComponentError, ComponentRecord, DefType, Entity};
use engine_system::{Registry, System, SystemId};
use tracing::{debug, info};

use crate::components::{Health, Name, Transform};

#[derive(Debug, Default)]
pub struct NameSystem {
    names: HashMap<Entity, String>,
}

impl NameSystem {
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&str> {
        self.names.get(&entity).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl System for NameSystem {
    fn def_types(&self) -> Vec<DefType> {
        vec![Name::def_type()]
    }

    fn create(&mut self, entity: Entity, record: &ComponentRecord<'_>) -> Result<(), ComponentError> {
        let Name(name) = record.decode()?;
        self.names.insert(entity, name);
        Ok(())
    }

    fn destroy(&mut self, entity: Entity) {
        self.names.remove(&entity);
    }
}

/// Hit points. Reads names from [`NameSystem`] to label spawn logs, so it
/// must be initialized after it.
#[derive(Debug, Default)]
pub struct HealthSystem {
    health: HashMap<Entity, Health>,
    names: Option<Rc<RefCell<NameSystem>>>,
}

impl HealthSystem {
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<Health> {
        self.health.get(&entity).copied()
    }

    /// Subtract `amount`, clamped at zero. Returns the remaining hit points.
    pub fn damage(&mut self, entity: Entity, amount: f32) -> Option<f32> {
        let health = self.health.get_mut(&entity)?;
        health.current = (health.current - amount).max(0.0);
        Some(health.current)
    }
}

impl System for HealthSystem {
    fn def_types(&self) -> Vec<DefType> {
        vec![Health::def_type()]
    }

    fn dependencies(&self) -> Vec<SystemId> {
        vec![SystemId::of::<NameSystem>()]
    }

    fn initialize(&mut self, registry: &Registry) {
        self.names = registry.get::<NameSystem>();
    }

    fn create(&mut self, entity: Entity, record: &ComponentRecord<'_>) -> Result<(), ComponentError> {
        let health: Health = record.decode()?;
        if health.max <= 0.0 {
            return Err(ComponentError::Invalid(format!("max health must be positive, got {}", health.max)));
        }
        self.health.insert(entity, health);
        Ok(())
    }

    // Names are dispatched in the same pass, so they are only guaranteed to
    // exist once every record has been created.
    fn post_create_init(&mut self, entity: Entity, _record: &ComponentRecord<'_>) {
        let Some(health) = self.health.get(&entity) else {
            return;
        };
        let names = self.names.as_ref().map(|names| names.borrow());
        let name = names.as_ref().and_then(|names| names.get(entity)).unwrap_or("<unnamed>");
        info!(%entity, name, current = health.current, max = health.max, "spawned with health");
    }

    fn destroy(&mut self, entity: Entity) {
        self.health.remove(&entity);
    }
}

#[derive(Debug, Default)]
pub struct TransformSystem {
    transforms: HashMap<Entity, Transform>,
}

impl TransformSystem {
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<Transform> {
        self.transforms.get(&entity).copied()
    }
}

impl System for TransformSystem {
    fn def_types(&self) -> Vec<DefType> {
        vec![Transform::def_type()]
    }

    fn create(&mut self, entity: Entity, record: &ComponentRecord<'_>) -> Result<(), ComponentError> {
        let transform: Transform = record.decode()?;
        debug!(%entity, position = ?transform.position, "placed entity");
        self.transforms.insert(entity, transform);
        Ok(())
    }

    fn destroy(&mut self, entity: Entity) {
        self.transforms.remove(&entity);
    }
}

#[cfg(test)]
mod tests {
    use engine_component::Blueprint;
    use engine_factory::EntityFactory;

    use super::*;

    fn factory() -> (EntityFactory, Rc<RefCell<NameSystem>>, Rc<RefCell<HealthSystem>>) {
        let mut factory = EntityFactory::new(Rc::new(Registry::new()));
        let names = factory.create_system(NameSystem::default()).unwrap();
        let health = factory.create_system(HealthSystem::default()).unwrap();
        factory.create_system(TransformSystem::default()).unwrap();
        factory.initialize().unwrap();
        (factory, names, health)
    }

    #[test]
    fn test_health_links_names_on_initialize() {
        let (_factory, names, health) = factory();
        let linked = health.borrow().names.clone().unwrap();
        assert!(Rc::ptr_eq(&linked, &names));
    }

    #[test]
    fn test_systems_store_components() {
        let (mut factory, names, health) = factory();
        let blueprint = Blueprint::new()
            .with_component(&Name("guard".into()))
            .unwrap()
            .with_component(&Health::full(50.0))
            .unwrap();
        let entity = factory.create_with_blueprint(&blueprint);

        assert_eq!(names.borrow().get(entity), Some("guard"));
        assert_eq!(health.borrow_mut().damage(entity, 80.0), Some(0.0));

        factory.destroy(entity);
        assert_eq!(names.borrow().get(entity), None);
        assert_eq!(health.borrow().get(entity), None);
    }

    #[test]
    fn test_invalid_health_is_rejected() {
        let (mut factory, names, health) = factory();
        let blueprint = Blueprint::new()
            .with_component(&Health { current: 0.0, max: 0.0 })
            .unwrap()
            .with_component(&Name("ghost".into()))
            .unwrap();
        let entity = factory.create_with_blueprint(&blueprint);

        assert_eq!(health.borrow().get(entity), None);
        assert_eq!(names.borrow().get(entity), Some("ghost"));
    }

    #[test]
    fn test_health_requires_names_first() {
        let mut factory = EntityFactory::new(Rc::new(Registry::new()));
        factory.create_system(HealthSystem::default()).unwrap();
        factory.create_system(NameSystem::default()).unwrap();
        assert!(factory.initialize().is_err());
    }
}
