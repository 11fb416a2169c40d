use strata_chunk::CellGrid;
use strata_geom::Transform;

use crate::instances::ChunkInstances;

/// Append an instance for the filled cell at `(x, y, z)` to the end of its batch.
///
/// Occlusion is not consulted. Returns `None` when the cell is out of range,
/// empty, already instanced, or its block has no batch.
pub fn push_instance(
    grid: &mut CellGrid,
    instances: &mut ChunkInstances,
    x: i32,
    y: i32,
    z: i32,
) -> Option<u32> {
    let cell = grid.get_mut(x, y, z)?;
    if cell.is_empty() || cell.instance.is_some() {
        return None;
    }
    let batch = instances.batch_mut(cell.block)?;
    let slot = batch.push(Transform::from_cell(x as usize, y as usize, z as usize))?;
    cell.instance = Some(slot);
    Some(slot)
}

/// Swap-with-last removal of the instance owned by `(x, y, z)`.
///
/// The last transform of the batch moves into the vacated slot and the cell it
/// was recorded for is repointed at that slot. Returns `false` when the cell
/// owns no instance.
pub fn remove_instance(
    grid: &mut CellGrid,
    instances: &mut ChunkInstances,
    x: i32,
    y: i32,
    z: i32,
) -> bool {
    let Some(cell) = grid.get_mut(x, y, z) else {
        return false;
    };
    let Some(slot) = cell.instance.take() else {
        return false;
    };
    let block = cell.block;
    let Some(batch) = instances.batch_mut(block) else {
        log::warn!("cell ({x}, {y}, {z}) held slot {slot} for unbatched block {block}");
        return false;
    };
    let Some(moved) = batch.swap_remove(slot) else {
        // Removed slot was the tail; nothing moved.
        return true;
    };
    match moved.cell() {
        Some((mx, my, mz)) => {
            match grid.get_mut(mx as i32, my as i32, mz as i32) {
                Some(owner) if owner.block == block => owner.instance = Some(slot),
                _ => log::warn!(
                    "instance moved to slot {slot} maps to ({mx}, {my}, {mz}) which is not a block {block} cell"
                ),
            }
        }
        None => log::warn!("instance moved to slot {slot} has no cell position"),
    }
    true
}
