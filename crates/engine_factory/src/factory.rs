//! EntityFactory — builds entities from blueprints and blueprint assets.
//!
//! The factory owns the table of systems, the DefType → system map, the wire
//! type list, the optional codec adapters, the blueprint asset cache and the
//! entity → blueprint-name map. Creation walks a blueprint tree in pre-order:
//! each node's records go to their systems in source order, then
//! `post_create_init` runs over the same records, then each child subtree is
//! handed to the [`CreateChildFn`] hook.
//!
//! Everything here runs on the main thread. [`EntityFactory::create`],
//! [`EntityFactory::queue_for_destruction`] and
//! [`EntityFactory::get_blueprint_asset`] are the thread-safe operations, and
//! [`EntityFactory::generator`], [`EntityFactory::destruction_queue`] and
//! [`EntityFactory::blueprint_cache`] hand out `Send` handles for them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use engine_codec::{BlueprintFinalizer, BlueprintLoader, EntitySchema, SchemaFinalizer, SchemaLoader, TypeList};
use engine_component::{Blueprint, BlueprintTree, DefType, Entity, EntityGenerator};
use engine_system::{DependencyChecker, Registry, System, SystemId};
use tracing::{debug, error, info, warn};

use crate::asset::{AssetSource, BlueprintCache, DirectoryAssetSource};
use crate::config::FactoryConfig;
use crate::error::{AssetError, FactoryError};
use crate::hierarchy::{CreateChildFn, Parentless};
use crate::queue::DestructionQueue;

/// Entity → logical blueprint name, for entities created by name.
pub type BlueprintMap = HashMap<Entity, String>;

struct SystemEntry {
    id: SystemId,
    system: Rc<RefCell<dyn System>>,
}

/// Creates, populates and destroys entities.
pub struct EntityFactory {
    config: FactoryConfig,
    registry: Rc<Registry>,
    /// Systems in registration order.
    systems: Vec<SystemEntry>,
    system_index: HashMap<SystemId, usize>,
    /// Which system materialises each component type.
    type_map: HashMap<DefType, SystemId>,
    /// Wire index → DefType.
    types: TypeList,
    loader: Option<Box<dyn BlueprintLoader>>,
    finalizer: Option<Box<dyn BlueprintFinalizer>>,
    dependencies: DependencyChecker,
    blueprints: Arc<BlueprintCache>,
    entity_to_blueprint: BlueprintMap,
    generator: EntityGenerator,
    pending_destroy: DestructionQueue,
    create_child: Rc<dyn CreateChildFn>,
}

impl EntityFactory {
    /// Create a factory with the default configuration.
    #[must_use]
    pub fn new(registry: Rc<Registry>) -> Self {
        Self::with_config(registry, FactoryConfig::default())
    }

    /// Create a factory reading blueprint assets from `config.asset_root`.
    #[must_use]
    pub fn with_config(registry: Rc<Registry>, config: FactoryConfig) -> Self {
        let source = DirectoryAssetSource::new(config.asset_root.clone());
        Self::with_asset_source(registry, config, Box::new(source))
    }

    /// Create a factory reading blueprint assets from a custom source.
    #[must_use]
    pub fn with_asset_source(registry: Rc<Registry>, config: FactoryConfig, source: Box<dyn AssetSource>) -> Self {
        Self {
            config,
            registry,
            systems: Vec::new(),
            system_index: HashMap::new(),
            type_map: HashMap::new(),
            types: TypeList::new(),
            loader: None,
            finalizer: None,
            dependencies: DependencyChecker::new(),
            blueprints: Arc::new(BlueprintCache::new(source)),
            entity_to_blueprint: BlueprintMap::new(),
            generator: EntityGenerator::new(),
            pending_destroy: DestructionQueue::new(),
            create_child: Rc::new(Parentless),
        }
    }

    // ── Systems ──────────────────────────────────────────────────

    /// Construct `value` in the registry and attach it to the factory.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::System`] if a `T` is already registered.
    pub fn create_system<T: System>(&mut self, value: T) -> Result<Rc<RefCell<T>>, FactoryError> {
        let system = self.registry.create(value).map_err(|err| {
            error!(%err, "failed to create system");
            FactoryError::from(err)
        })?;
        self.add_system(Rc::clone(&system));
        Ok(system)
    }

    /// Attach a `T` that was constructed in the registry by someone else.
    /// Returns `None` if the registry holds no `T`.
    pub fn add_system_from_registry<T: System>(&mut self) -> Option<Rc<RefCell<T>>> {
        let Some(system) = self.registry.get::<T>() else {
            warn!(system = %SystemId::of::<T>(), "system not found in registry");
            return None;
        };
        self.add_system(Rc::clone(&system));
        Some(system)
    }

    fn add_system<T: System>(&mut self, system: Rc<RefCell<T>>) {
        let id = SystemId::of::<T>();
        let (def_types, dependencies) = {
            let system = system.borrow();
            (system.def_types(), system.dependencies())
        };
        for def_type in def_types {
            self.register_def(id, def_type);
        }
        for dependency in dependencies {
            self.dependencies.register_dependency(id, dependency);
        }

        let system: Rc<RefCell<dyn System>> = system;
        match self.system_index.get(&id) {
            Some(&index) => self.systems[index].system = system,
            None => {
                self.system_index.insert(id, self.systems.len());
                self.systems.push(SystemEntry { id, system });
            }
        }
        debug!(system = %id, "attached system");
    }

    /// Route components tagged `def_type` to `system`.
    pub fn register_def(&mut self, system: SystemId, def_type: DefType) {
        if let Some(previous) = self.type_map.insert(def_type, system)
            && previous != system
        {
            warn!(%def_type, %previous, %system, "component type reassigned to another system");
        }
    }

    /// Route components tagged `def_type` to the system of type `T`.
    pub fn register_def_for<T: System>(&mut self, def_type: DefType) {
        self.register_def(SystemId::of::<T>(), def_type);
    }

    /// The system registered for `def_type`.
    fn system_for(&self, def_type: DefType) -> Option<Rc<RefCell<dyn System>>> {
        let id = self.type_map.get(&def_type)?;
        let &index = self.system_index.get(id)?;
        Some(Rc::clone(&self.systems[index].system))
    }

    /// The registry systems are constructed in.
    #[must_use]
    pub fn registry(&self) -> &Rc<Registry> {
        &self.registry
    }

    // ── Initialization ───────────────────────────────────────────

    /// Initialize every attached system in registration order, then verify
    /// each was initialized after the systems it depends on.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Dependency`] on an ordering violation. This is
    /// a configuration fault and startup should be aborted.
    pub fn initialize(&mut self) -> Result<(), FactoryError> {
        for entry in &self.systems {
            entry.system.borrow_mut().initialize(&self.registry);
            self.dependencies.mark_initialized(entry.id);
        }

        if let Err(err) = self.dependencies.check() {
            error!(%err, "systems were initialized out of dependency order");
            return Err(err.into());
        }

        info!(
            systems = self.systems.len(),
            component_types = self.type_map.len(),
            "entity factory initialized"
        );
        Ok(())
    }

    /// [`EntityFactory::initialize`], then build the wire type list. The nth
    /// name is wire index n.
    ///
    /// # Errors
    ///
    /// As [`EntityFactory::initialize`].
    pub fn initialize_with_names(&mut self, names: impl IntoIterator<Item = impl AsRef<str>>) -> Result<(), FactoryError> {
        self.initialize()?;
        self.types = TypeList::from_names(names);
        debug!(types = self.types.len(), "built component type list");
        Ok(())
    }

    /// Install the loader generated for schema `S`.
    pub fn initialize_loader<S: EntitySchema>(&mut self) {
        if self.types.is_empty() {
            warn!("loader installed before the component type list was built");
        }
        self.set_loader(Box::new(SchemaLoader::<S>::new()));
    }

    /// Install the finalizer generated for schema `S`.
    pub fn initialize_finalizer<S: EntitySchema>(&mut self) {
        if self.types.is_empty() {
            warn!("finalizer installed before the component type list was built");
        }
        self.set_finalizer(Box::new(SchemaFinalizer::<S>::new()));
    }

    /// Initialize systems, build the type list from `names`, and install the
    /// loader and finalizer for schema `S`.
    ///
    /// # Errors
    ///
    /// As [`EntityFactory::initialize`].
    pub fn initialize_schema<S: EntitySchema>(
        &mut self,
        names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<(), FactoryError> {
        self.initialize_with_names(names)?;
        self.initialize_loader::<S>();
        self.initialize_finalizer::<S>();
        Ok(())
    }

    /// Replace the loader.
    pub fn set_loader(&mut self, loader: Box<dyn BlueprintLoader>) {
        self.loader = Some(loader);
    }

    /// Replace the finalizer.
    pub fn set_finalizer(&mut self, finalizer: Box<dyn BlueprintFinalizer>) {
        self.finalizer = Some(finalizer);
    }

    /// Replace the hook that creates child entities. Defaults to [`Parentless`].
    pub fn set_create_child_fn(&mut self, hook: Rc<dyn CreateChildFn>) {
        self.create_child = hook;
    }

    /// The wire type list.
    #[must_use]
    pub fn type_list(&self) -> &TypeList {
        &self.types
    }

    #[must_use]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    // ── Creation ─────────────────────────────────────────────────

    /// Issue a fresh entity with no components.
    pub fn create(&self) -> Entity {
        self.generator.generate()
    }

    /// A handle issuing ids from the factory's counter on any thread.
    #[must_use]
    pub fn generator(&self) -> EntityGenerator {
        self.generator.clone()
    }

    /// Create an entity from the blueprint asset named `name`.
    ///
    /// Returns [`Entity::INVALID`] if the asset cannot be read or decoded.
    pub fn create_named(&mut self, name: &str) -> Entity {
        let entity = self.create();
        self.populate_named(entity, name)
    }

    /// Create an entity from a single blueprint.
    pub fn create_with_blueprint(&mut self, blueprint: &Blueprint<'_>) -> Entity {
        let entity = self.create();
        self.dispatch(entity, blueprint);
        entity
    }

    /// Create an entity, and its children through the hierarchy hook, from a
    /// blueprint tree.
    pub fn create_with_tree(&mut self, tree: &BlueprintTree<'_>) -> Entity {
        let entity = self.create();
        self.build_tree(entity, tree);
        entity
    }

    /// Populate an existing entity from the blueprint asset named `name`.
    ///
    /// Returns `entity`, or [`Entity::INVALID`] on failure.
    pub fn populate_named(&mut self, entity: Entity, name: &str) -> Entity {
        match self.try_populate_named(entity, name) {
            Ok(()) => entity,
            Err(err) => {
                report_failure(entity, name, &err);
                Entity::INVALID
            }
        }
    }

    fn try_populate_named(&mut self, entity: Entity, name: &str) -> Result<(), FactoryError> {
        if !entity.is_valid() {
            return Err(FactoryError::InvalidEntity);
        }
        if self.loader.is_none() {
            return Err(FactoryError::MissingLoader);
        }
        let data = self.get_blueprint_asset(name)?;
        self.populate_from_data(entity, name, &data)
    }

    /// Populate an existing entity from a blueprint tree.
    ///
    /// Returns `entity`, or [`Entity::INVALID`] if `entity` is the sentinel.
    pub fn populate_with_tree(&mut self, entity: Entity, tree: &BlueprintTree<'_>) -> Entity {
        if !entity.is_valid() {
            warn!("cannot populate the invalid entity");
            return Entity::INVALID;
        }
        self.build_tree(entity, tree);
        entity
    }

    /// Create an entity from raw entity-definition bytes, recording `name`
    /// as its blueprint.
    ///
    /// Returns [`Entity::INVALID`] on failure.
    pub fn create_from_blueprint(&mut self, data: &[u8], name: &str) -> Entity {
        match self.try_create_from_blueprint(data, name) {
            Ok(entity) => entity,
            Err(err) => {
                report_failure(Entity::INVALID, name, &err);
                Entity::INVALID
            }
        }
    }

    /// [`EntityFactory::create_from_blueprint`], reporting why creation failed.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::MissingLoader`] if no loader is installed, or
    /// [`FactoryError::Codec`] if `data` cannot be decoded.
    pub fn try_create_from_blueprint(&mut self, data: &[u8], name: &str) -> Result<Entity, FactoryError> {
        if self.loader.is_none() {
            return Err(FactoryError::MissingLoader);
        }
        let entity = self.create();
        self.populate_from_data(entity, name, data)?;
        Ok(entity)
    }

    fn populate_from_data(&mut self, entity: Entity, name: &str, data: &[u8]) -> Result<(), FactoryError> {
        let loader = self.loader.as_deref().ok_or(FactoryError::MissingLoader)?;
        let tree = loader.load(&self.types, data)?;
        self.build_tree(entity, &tree);
        self.entity_to_blueprint.insert(entity, name.to_string());
        debug!(%entity, name, "created entity from blueprint");
        Ok(())
    }

    fn build_tree(&mut self, entity: Entity, tree: &BlueprintTree<'_>) {
        self.dispatch(entity, tree.blueprint());
        if tree.children().is_empty() {
            return;
        }

        let hook = Rc::clone(&self.create_child);
        for child in tree.children() {
            let child_entity = hook.create_child(self, entity, child);
            if child_entity.is_valid() {
                debug!(parent = %entity, child = %child_entity, "created child entity");
            } else {
                warn!(parent = %entity, "failed to create child entity");
            }
        }
    }

    /// Hand each record to its system in source order, then run
    /// `post_create_init` over the records that were created.
    fn dispatch(&self, entity: Entity, blueprint: &Blueprint<'_>) {
        let mut created = Vec::with_capacity(blueprint.len());
        blueprint.for_each_component(|record| {
            let def_type = record.def_type();
            let Some(system) = self.system_for(def_type) else {
                debug!(%entity, %def_type, "no system for component type, skipping");
                return;
            };
            let result = system.borrow_mut().create(entity, record);
            match result {
                Ok(()) => created.push((system, record)),
                Err(err) => warn!(%entity, %def_type, %err, "component creation failed"),
            }
        });

        for (system, record) in created {
            system.borrow_mut().post_create_init(entity, record);
        }
    }

    // ── Destruction ──────────────────────────────────────────────

    /// Remove `entity` from every system and forget its blueprint name.
    pub fn destroy(&mut self, entity: Entity) {
        for entry in &self.systems {
            entry.system.borrow_mut().destroy(entity);
        }
        self.entity_to_blueprint.remove(&entity);
        debug!(%entity, "destroyed entity");
    }

    /// Schedule `entity` for destruction at the next
    /// [`EntityFactory::destroy_queued_entities`].
    pub fn queue_for_destruction(&self, entity: Entity) {
        self.pending_destroy.push(entity);
    }

    /// A handle for queueing destruction from any thread.
    #[must_use]
    pub fn destruction_queue(&self) -> DestructionQueue {
        self.pending_destroy.clone()
    }

    /// Destroy every entity queued so far, oldest first.
    pub fn destroy_queued_entities(&mut self) {
        let queued = self.pending_destroy.drain();
        if queued.is_empty() {
            return;
        }
        for &entity in &queued {
            self.destroy(entity);
        }
        debug!(count = queued.len(), "destroyed queued entities");
    }

    // ── Blueprints ───────────────────────────────────────────────

    /// Entity → blueprint name for every live entity created by name.
    #[must_use]
    pub fn entity_to_blueprint_map(&self) -> &BlueprintMap {
        &self.entity_to_blueprint
    }

    /// The bytes of the blueprint asset named `name`, read once and cached.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the asset cannot be read.
    pub fn get_blueprint_asset(&self, name: &str) -> Result<Arc<[u8]>, AssetError> {
        self.blueprints.get_or_load(&self.config.blueprint_filename(name))
    }

    /// The blueprint asset cache, shareable across threads.
    #[must_use]
    pub fn blueprint_cache(&self) -> Arc<BlueprintCache> {
        Arc::clone(&self.blueprints)
    }

    /// Encode `blueprint` as an entity definition.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::MissingFinalizer`] if no finalizer is
    /// installed, or [`FactoryError::Codec`] if a component type is not in the
    /// type list.
    pub fn finalize(&self, blueprint: &Blueprint<'_>) -> Result<Vec<u8>, FactoryError> {
        let finalizer = self.require_finalizer()?;
        Ok(finalizer.finalize(&self.types, blueprint)?)
    }

    /// Encode `tree` as an entity definition, children included.
    ///
    /// # Errors
    ///
    /// As [`EntityFactory::finalize`].
    pub fn finalize_tree(&self, tree: &BlueprintTree<'_>) -> Result<Vec<u8>, FactoryError> {
        let finalizer = self.require_finalizer()?;
        Ok(finalizer.finalize_tree(&self.types, tree)?)
    }

    fn require_finalizer(&self) -> Result<&dyn BlueprintFinalizer, FactoryError> {
        self.finalizer.as_deref().ok_or_else(|| {
            error!("no blueprint finalizer configured");
            FactoryError::MissingFinalizer
        })
    }
}

fn report_failure(entity: Entity, name: &str, err: &FactoryError) {
    if err.is_configuration_fault() {
        error!(%entity, name, %err, "failed to create entity from blueprint");
    } else {
        warn!(%entity, name, %err, "failed to create entity from blueprint");
    }
}

impl std::fmt::Debug for EntityFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityFactory")
            .field("config", &self.config)
            .field("systems", &self.systems.len())
            .field("component_types", &self.type_map.len())
            .field("types", &self.types.len())
            .field("has_loader", &self.loader.is_some())
            .field("has_finalizer", &self.finalizer.is_some())
            .field("named_entities", &self.entity_to_blueprint.len())
            .finish_non_exhaustive()
    }
}
