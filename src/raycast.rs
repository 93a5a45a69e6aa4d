/// Aim ray voxel traversal and the timed mine/place editor.
use crate::input::Buttons;
use crate::movement::PlayerBox;
use crate::voxel::{block_to_chunk, Block};
use crate::world::World;
use glam::{IVec3, Vec3};

/// Grid walk along a ray, one face-adjacent cell per step.
///
/// A zero direction component never crosses its axis: both its step length
/// and its next crossing are infinite.
#[derive(Debug, Clone)]
pub struct DdaWalk {
    cell: IVec3,
    step: IVec3,
    t_max: Vec3,
    t_delta: Vec3,
    remaining: u32,
}

impl DdaWalk {
    pub fn new(origin: Vec3, dir: Vec3, max_steps: u32) -> Self {
        let cell = origin.floor().as_ivec3();
        let mut step = IVec3::ZERO;
        let mut t_max = Vec3::splat(f32::INFINITY);
        let mut t_delta = Vec3::splat(f32::INFINITY);

        for axis in 0..3 {
            let d = dir[axis];
            if d > 0.0 {
                step[axis] = 1;
                t_delta[axis] = 1.0 / d;
                t_max[axis] = (cell[axis] as f32 + 1.0 - origin[axis]) / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_delta[axis] = -1.0 / d;
                t_max[axis] = (origin[axis] - cell[axis] as f32) / -d;
            }
        }

        let remaining = if step == IVec3::ZERO { 0 } else { max_steps };
        Self {
            cell,
            step,
            t_max,
            t_delta,
            remaining,
        }
    }

    /// Cell containing the ray origin.
    pub fn origin_cell(&self) -> IVec3 {
        self.cell
    }
}

impl Iterator for DdaWalk {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let axis = if self.t_max.x <= self.t_max.y && self.t_max.x <= self.t_max.z {
            0
        } else if self.t_max.y <= self.t_max.z {
            1
        } else {
            2
        };

        self.cell[axis] += self.step[axis];
        self.t_max[axis] += self.t_delta[axis];
        Some(self.cell)
    }
}

/// First solid cell along the aim ray and the empty cell before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayHit {
    pub last_empty: IVec3,
    pub solid: IVec3,
    /// World slot owning `last_empty`; None when that cell is outside the window.
    pub last_empty_slot: Option<usize>,
    pub solid_slot: usize,
}

/// Walk up to `max_steps` cells from `origin`. Cells outside the loaded
/// window count as empty.
///
/// The origin cell is tested first; when it is solid the hit reports it as
/// both `last_empty` and `solid`.
pub fn cast_ray(world: &World, origin: Vec3, dir: Vec3, max_steps: u32) -> Option<RayHit> {
    let walk = DdaWalk::new(origin, dir, max_steps);
    let mut last_empty = walk.origin_cell();

    if let Some(slot) = world.slot_of(block_to_chunk(last_empty)) {
        if world.is_solid(last_empty) {
            return Some(RayHit {
                last_empty,
                solid: last_empty,
                last_empty_slot: Some(slot),
                solid_slot: slot,
            });
        }
    }

    for cell in walk {
        let Some(slot) = world.slot_of(block_to_chunk(cell)) else {
            last_empty = cell;
            continue;
        };
        if world.is_solid(cell) {
            return Some(RayHit {
                last_empty,
                solid: cell,
                last_empty_slot: world.slot_of(block_to_chunk(last_empty)),
                solid_slot: slot,
            });
        }
        last_empty = cell;
    }
    None
}

#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub max_steps: u32,
    /// Releasing MINE before this many ticks places a block.
    pub tap_ticks: u32,
    /// Holding MINE this many ticks removes the hit block.
    pub mine_ticks: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_steps: 50,
            tap_ticks: 20,
            mine_ticks: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Mine(IVec3),
    Place(IVec3),
}

impl Edit {
    pub fn cell(self) -> IVec3 {
        match self {
            Edit::Mine(cell) | Edit::Place(cell) => cell,
        }
    }

    pub fn block(self) -> Block {
        match self {
            Edit::Mine(_) => Block::Empty,
            Edit::Place(_) => Block::SOLID,
        }
    }
}

/// Hold-timer state machine behind the MINE and PLACE buttons.
#[derive(Debug, Clone, Default)]
pub struct BlockEditor {
    pub config: EditorConfig,
    timer: u32,
    locked: bool,
    previous: Buttons,
}

impl BlockEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Advance one tick. Returns at most one edit for the caller to apply.
    pub fn update(
        &mut self,
        buttons: Buttons,
        hit: Option<&RayHit>,
        body: &PlayerBox,
        position: Vec3,
    ) -> Option<Edit> {
        let pressed = buttons.pressed_since(self.previous);
        self.previous = buttons;

        let place_at = |hit: &RayHit| {
            (!body.overlaps(position, hit.last_empty)).then_some(Edit::Place(hit.last_empty))
        };

        if buttons.contains(Buttons::MINE) {
            if self.locked {
                return None;
            }
            let hit = hit?;
            self.timer += 1;
            if self.timer >= self.config.mine_ticks {
                self.timer = 0;
                self.locked = true;
                return Some(Edit::Mine(hit.solid));
            }
            return None;
        }

        let tapped = self.timer > 0 && self.timer < self.config.tap_ticks;
        self.timer = 0;
        self.locked = false;

        let hit = hit?;
        if tapped || pressed.contains(Buttons::PLACE) {
            return place_at(hit);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::TerrainSource;
    use crate::world::WorldConfig;

    fn empty_world() -> World {
        let mut world = World::new(WorldConfig::default(), TerrainSource::Empty);
        world.recenter(IVec3::ZERO);
        world
    }

    #[test]
    fn walk_is_face_adjacent() {
        let dir = Vec3::new(0.37, -0.81, 0.46).normalize();
        let mut prev = Vec3::new(3.2, 5.7, 1.1).floor().as_ivec3();
        for cell in DdaWalk::new(Vec3::new(3.2, 5.7, 1.1), dir, 50) {
            let d = (cell - prev).abs();
            assert_eq!(d.x + d.y + d.z, 1, "{:?} -> {:?}", prev, cell);
            prev = cell;
        }
    }

    #[test]
    fn axis_aligned_ray_stays_on_axis() {
        let cells: Vec<IVec3> = DdaWalk::new(Vec3::new(0.5, 0.5, 0.5), Vec3::Z, 4).collect();
        assert_eq!(
            cells,
            vec![IVec3::new(0, 0, 1), IVec3::new(0, 0, 2), IVec3::new(0, 0, 3), IVec3::new(0, 0, 4)]
        );
    }

    #[test]
    fn zero_direction_walks_nowhere() {
        assert_eq!(DdaWalk::new(Vec3::ZERO, Vec3::ZERO, 50).count(), 0);
    }

    #[test]
    fn hit_reports_previous_cell() {
        let mut world = empty_world();
        world.set_block(IVec3::new(0, 0, 3), Block::SOLID);
        let hit = cast_ray(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::Z, 50).expect("hit");
        assert_eq!(hit.solid, IVec3::new(0, 0, 3));
        assert_eq!(hit.last_empty, IVec3::new(0, 0, 2));
        assert_eq!(Some(hit.solid_slot), world.slot_of(IVec3::ZERO));
    }

    #[test]
    fn miss_beyond_budget() {
        let mut world = empty_world();
        world.set_block(IVec3::new(0, 0, 10), Block::SOLID);
        assert!(cast_ray(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::Z, 5).is_none());
    }

    fn hit_at(cell: IVec3) -> RayHit {
        RayHit {
            last_empty: cell - IVec3::Z,
            solid: cell,
            last_empty_slot: Some(0),
            solid_slot: 0,
        }
    }

    #[test]
    fn hold_mines_once_then_locks() {
        let mut editor = BlockEditor::default();
        let hit = hit_at(IVec3::new(0, 0, 5));
        let body = PlayerBox::default();
        let mut edits = Vec::new();
        for _ in 0..60 {
            edits.extend(editor.update(Buttons::MINE, Some(&hit), &body, Vec3::new(0.5, 1.5, 0.5)));
        }
        assert_eq!(edits, vec![Edit::Mine(hit.solid)]);
        assert!(editor.is_locked());

        // Releasing after the mine does not place.
        assert_eq!(editor.update(Buttons::empty(), Some(&hit), &body, Vec3::new(0.5, 1.5, 0.5)), None);
        assert!(!editor.is_locked());
    }

    #[test]
    fn tap_places_unless_inside_player() {
        let body = PlayerBox::default();
        let hit = hit_at(IVec3::new(0, 0, 5));
        let far = Vec3::new(0.5, 1.5, -3.0);

        let mut editor = BlockEditor::default();
        editor.update(Buttons::MINE, Some(&hit), &body, far);
        let edit = editor.update(Buttons::empty(), Some(&hit), &body, far);
        assert_eq!(edit, Some(Edit::Place(IVec3::new(0, 0, 4))));

        let inside = Vec3::new(0.5, 0.9, 4.5);
        editor.update(Buttons::MINE, Some(&hit), &body, inside);
        assert_eq!(editor.update(Buttons::empty(), Some(&hit), &body, inside), None);
    }

    #[test]
    fn place_button_is_edge_triggered() {
        let body = PlayerBox::default();
        let hit = hit_at(IVec3::new(0, 0, 5));
        let far = Vec3::new(0.5, 1.5, -3.0);
        let mut editor = BlockEditor::default();
        assert!(editor.update(Buttons::PLACE, Some(&hit), &body, far).is_some());
        assert!(editor.update(Buttons::PLACE, Some(&hit), &body, far).is_none());
    }
}
