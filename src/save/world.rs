//! World container and entity type registry

use std::collections::HashMap;

use crate::error::{Result, SaveError};
use crate::record::{Category, Persistent, Serial, Spawn};

/// Live entities grouped by save category
///
/// The world owns its entities; save cycles only borrow them.
#[derive(Default)]
pub struct World {
    items: Vec<Box<dyn Persistent>>,
    mobiles: Vec<Box<dyn Persistent>>,
    guilds: Vec<Box<dyn Persistent>>,
    data: Vec<Box<dyn Persistent>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity under its own category
    pub fn add<T: Persistent + 'static>(&mut self, entity: T) {
        self.add_boxed(Box::new(entity));
    }

    pub fn add_boxed(&mut self, entity: Box<dyn Persistent>) {
        self.category_mut(entity.category()).push(entity);
    }

    /// Entities of one category, in insertion order
    pub fn category(&self, category: Category) -> &[Box<dyn Persistent>] {
        match category {
            Category::Item => &self.items,
            Category::Mobile => &self.mobiles,
            Category::Guild => &self.guilds,
            Category::Data => &self.data,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut Vec<Box<dyn Persistent>> {
        match category {
            Category::Item => &mut self.items,
            Category::Mobile => &mut self.mobiles,
            Category::Guild => &mut self.guilds,
            Category::Data => &mut self.data,
        }
    }

    /// Number of entities in one category
    pub fn count(&self, category: Category) -> usize {
        self.category(category).len()
    }

    /// Total number of entities
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.count(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an entity by category and serial
    pub fn find(&self, category: Category, serial: Serial) -> Option<&dyn Persistent> {
        self.category(category)
            .iter()
            .find(|e| e.serial() == serial)
            .map(|e| &**e)
    }

    /// Find an entity and view it as its concrete type
    pub fn find_as<T: Spawn + 'static>(&self, category: Category, serial: Serial) -> Option<&T> {
        self.find(category, serial)?.as_any().downcast_ref::<T>()
    }

    /// Iterate every entity, category by category
    pub fn iter(&self) -> impl Iterator<Item = &dyn Persistent> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |c| self.category(c).iter().map(|e| &**e))
    }
}

/// Builds a blank entity for a stored serial
pub type SpawnFn = fn(Serial) -> Box<dyn Persistent>;

fn spawn_boxed<T: Spawn + 'static>(serial: Serial) -> Box<dyn Persistent> {
    Box::new(T::spawn(serial))
}

/// Maps stored type names back to constructors
#[derive(Default, Clone)]
pub struct TypeRegistry {
    constructors: HashMap<&'static str, SpawnFn>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every type in [`crate::entities`]
    pub fn with_builtin_entities() -> Self {
        let mut registry = Self::new();
        crate::entities::register_all(&mut registry);
        registry
    }

    /// Register `T` under its `TYPE_NAME`; re-registering replaces the entry
    pub fn register<T: Spawn + 'static>(&mut self) {
        if self.constructors.insert(T::TYPE_NAME, spawn_boxed::<T>).is_some() {
            tracing::debug!(type_name = T::TYPE_NAME, "Entity type registered twice");
        }
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Spawn a blank entity of a registered type
    pub fn spawn(&self, type_name: &str, serial: Serial) -> Result<Box<dyn Persistent>> {
        let constructor = self
            .constructors
            .get(type_name)
            .ok_or_else(|| SaveError::UnknownType(type_name.to_string()))?;
        Ok(constructor(serial))
    }
}
