//! # engine_app — entity factory demo
//!
//! Builds a blueprint tree in code, finalizes it into a binary asset, then
//! spawns entities from that asset by name and tears some of them down from
//! another thread.
//!
//! ## Sequence
//!
//! 1. Resolve the asset directory (`ENGINE_ASSET_ROOT`, default a directory
//!    under the system temp dir).
//! 2. Register systems and initialize the factory with the standard schema.
//! 3. Write the `cart` blueprint asset.
//! 4. Spawn carts by name, queue two of them for destruction from a worker
//!    thread, then drain the queue until the hierarchy cascade settles.

mod components;
mod hierarchy;
mod systems;

use std::path::PathBuf;
use std::rc::Rc;
use std::thread;

use anyhow::{Context, Result, anyhow, bail};
use engine_codec::StandardSchema;
use engine_component::{Blueprint, BlueprintTree, Entity};
use engine_factory::{EntityFactory, FactoryConfig};
use engine_system::Registry;
use tracing::info;
use tracing_subscriber::EnvFilter;

use components::{COMPONENT_NAMES, Health, Name, Transform};
use hierarchy::{AttachToParent, HierarchySystem};
use systems::{HealthSystem, NameSystem, TransformSystem};

const ASSET_ROOT_ENV: &str = "ENGINE_ASSET_ROOT";
const CART_BLUEPRINT: &str = "cart";

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let asset_root = std::env::var_os(ASSET_ROOT_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("engine_app_assets"));
    std::fs::create_dir_all(&asset_root)
        .with_context(|| format!("creating asset directory {}", asset_root.display()))?;
    info!(asset_root = %asset_root.display(), "entity factory demo starting");

    let registry = Rc::new(Registry::new());
    let mut factory = EntityFactory::with_config(registry, FactoryConfig::new(&asset_root));
    let names = factory.create_system(NameSystem::default())?;
    let health = factory.create_system(HealthSystem::default())?;
    let transforms = factory.create_system(TransformSystem::default())?;
    let hierarchy = factory.create_system(HierarchySystem::new(factory.destruction_queue()))?;
    factory.initialize_schema::<StandardSchema>(COMPONENT_NAMES)?;
    factory.set_create_child_fn(Rc::new(AttachToParent::new(Rc::clone(&hierarchy))));

    // Write the asset.
    let bytes = factory.finalize_tree(&cart_tree()?)?;
    let filename = factory.config().blueprint_filename(CART_BLUEPRINT);
    std::fs::write(asset_root.join(&filename), &bytes).with_context(|| format!("writing {filename}"))?;
    info!(%filename, size = bytes.len(), "wrote blueprint asset");

    // Spawn from it.
    let carts = (0..3)
        .map(|_| match factory.create_named(CART_BLUEPRINT) {
            Entity::INVALID => Err(anyhow!("failed to spawn {CART_BLUEPRINT}")),
            cart => Ok(cart),
        })
        .collect::<Result<Vec<_>>>()?;
    for &cart in &carts {
        let hierarchy = hierarchy.borrow();
        let wheels = hierarchy.children_of(cart);
        let attached = wheels.iter().all(|&wheel| hierarchy.parent_of(wheel) == Some(cart));
        let position = transforms.borrow().get(cart).map(|t| t.position);
        info!(%cart, wheels = wheels.len(), attached, ?position, "spawned cart");
    }
    info!(entities = names.borrow().len(), "all carts spawned");

    let damaged = health.borrow_mut().damage(carts[0], 25.0);
    if let Some(remaining) = damaged {
        let max = health.borrow().get(carts[0]).map_or(0.0, |h| h.max);
        info!(cart = %carts[0], remaining, max, "cart took damage");
    }

    // Queue from another thread; drain on this one.
    let queue = factory.destruction_queue();
    let doomed = carts[..2].to_vec();
    thread::spawn(move || {
        for cart in doomed {
            queue.push(cart);
        }
    })
    .join()
    .map_err(|_| anyhow!("destruction thread panicked"))?;

    let queue = factory.destruction_queue();
    while !queue.is_empty() {
        factory.destroy_queued_entities();
    }

    let survivors = factory.entity_to_blueprint_map().len();
    if survivors != 1 {
        bail!("expected one surviving cart, found {survivors}");
    }
    info!(
        survivors,
        entities = names.borrow().len(),
        "entity factory demo finished"
    );
    Ok(())
}

/// A cart body with four wheels.
fn cart_tree() -> Result<BlueprintTree<'static>> {
    let body = Blueprint::new()
        .with_component(&Name("cart".into()))?
        .with_component(&Health::full(100.0))?
        .with_component(&Transform {
            position: [0.0, 0.0, 0.0],
        })?;

    let mut tree = BlueprintTree::leaf(body);
    for (i, [x, z]) in [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]].into_iter().enumerate() {
        let wheel = Blueprint::new()
            .with_component(&Name(format!("wheel-{i}")))?
            .with_component(&Health::full(20.0))?
            .with_component(&Transform {
                position: [x, 0.0, z],
            })?;
        tree.add_child(BlueprintTree::leaf(wheel));
    }
    Ok(tree)
}
