//! Flattening of model inheritance.

use std::collections::BTreeSet;

use crate::domain::Model;
use crate::ports::{MaterialDbError, ModelRepository};

/// Load `uuid` and merge in every property declared by its ancestors.
///
/// Merged properties are flagged `inherited`, so the result can be written
/// back without duplicating parent declarations. A property declared on
/// the model itself is never overridden. Each ancestor is visited once even
/// if the stored graph contains a cycle.
pub async fn effective_model(
    models: &dyn ModelRepository,
    uuid: &str,
) -> Result<Model, MaterialDbError> {
    let mut model = models.get_model(uuid).await?.object;

    let mut visited = BTreeSet::from([model.uuid.clone()]);
    let mut pending: Vec<String> = model.inherits.iter().rev().cloned().collect();

    while let Some(parent_uuid) = pending.pop() {
        if !visited.insert(parent_uuid.clone()) {
            continue;
        }
        let parent = models.get_model(&parent_uuid).await?.object;
        for (name, property) in parent.properties {
            model
                .properties
                .entry(name)
                .or_insert_with(|| property.inherited(true));
        }
        pending.extend(parent.inherits.into_iter().rev());
    }

    Ok(model)
}

/// Ancestor uuids of `uuid`, nearest first, each listed once.
pub async fn ancestors(
    models: &dyn ModelRepository,
    uuid: &str,
) -> Result<Vec<String>, MaterialDbError> {
    let root = models.get_model(uuid).await?.object;
    let mut visited = BTreeSet::from([root.uuid]);
    let mut queue: std::collections::VecDeque<String> = root.inherits.into_iter().collect();
    let mut out = Vec::new();

    while let Some(next) = queue.pop_front() {
        if !visited.insert(next.clone()) {
            continue;
        }
        let parent = models.get_model(&next).await?.object;
        queue.extend(parent.inherits);
        out.push(next);
    }

    Ok(out)
}
