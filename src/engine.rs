/// Frame orchestrator: owns every piece of mutable state and runs the
/// pipeline once per tick.
use crate::camera::{Camera, CameraConfig, CameraView};
use crate::error::ConfigError;
use crate::input::Buttons;
use crate::meshing::Mesh;
use crate::movement::{Movement, MovementConfig};
use crate::perf::{FrameStats, PerfTimer};
use crate::raycast::{cast_ray, BlockEditor, EditorConfig, Edit, RayHit};
use crate::rendering::{
    DrawStyle, PixelTarget, Placement, Rasterizer, RenderConfig, ShadingConfig, VisibleSet,
};
use crate::voxel::{TerrainSource, CHUNK_SIZE_I32};
use crate::world::{World, WorldConfig};
use glam::Vec3;
use log::{debug, info, warn};
use std::time::Duration;

/// Half-length of the reticle arms in pixels.
const RETICLE_SIZE: i32 = 3;

#[derive(Debug, Clone)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 280,
            height: 240,
        }
    }
}

impl ScreenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::EmptyScreen {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub terrain: TerrainSource,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub shading: ShadingConfig,
    pub movement: MovementConfig,
    pub editor: EditorConfig,
    pub screen: ScreenConfig,
}

impl EngineConfig {
    /// First problem found, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.errors().into_iter().next().map_or(Ok(()), Err)
    }

    /// Every problem found.
    pub fn errors(&self) -> Vec<ConfigError> {
        [
            self.world.validate(),
            self.terrain.validate(),
            self.camera.validate(),
            self.render.validate(),
            self.movement.validate(),
            self.screen.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }
}

pub struct Engine {
    config: EngineConfig,
    world: World,
    camera: Camera,
    movement: Movement,
    editor: BlockEditor,
    visible: VisibleSet,
    rasterizer: Rasterizer,
    cube: Mesh,
    hit: Option<RayHit>,
    frame: u64,
}

impl Engine {
    /// Allocate the chunk pool and buffers. Configuration problems are
    /// logged and the engine runs anyway; a bad terrain config yields an
    /// all-air world and a bad movement config falls back to defaults.
    pub fn enter(mut config: EngineConfig) -> Self {
        for err in config.errors() {
            warn!("Engine config: {err}");
        }
        if let Err(err) = config.terrain.validate() {
            warn!("Terrain disabled ({err}); the world will be empty");
            config.terrain = TerrainSource::Empty;
        }
        if let Err(err) = config.movement.validate() {
            warn!("Movement reset to defaults ({err})");
            config.movement = MovementConfig::default();
        }
        Self::build(config)
    }

    /// Like `enter`, but refuses an invalid configuration.
    pub fn try_enter(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let world = World::new(config.world.clone(), config.terrain.clone());
        let camera = Camera::new(&config.camera);
        let movement = Movement::new(config.movement.clone());
        let editor = BlockEditor::new(config.editor.clone());
        let mut rasterizer = Rasterizer::new();
        rasterizer.shading = config.shading;

        info!(
            "Engine entered: {} chunk slots, {}x{} screen, spawn {:?}",
            config.world.slot_count(),
            config.screen.width,
            config.screen.height,
            camera.position
        );

        Self {
            config,
            world,
            camera,
            movement,
            editor,
            visible: VisibleSet::new(),
            rasterizer,
            cube: Mesh::unit_cube(),
            hit: None,
            frame: 0,
        }
    }

    /// Release the world. Dropping the engine does the same without the log line.
    pub fn exit(self) {
        info!(
            "Engine exited after {} frames ({} solid blocks loaded)",
            self.frame,
            self.world.solid_count()
        );
    }

    /// Advance one frame and draw it into `target`.
    pub fn tick<T: PixelTarget>(
        &mut self,
        elapsed: Duration,
        buttons: Buttons,
        target: &mut T,
    ) -> FrameStats {
        let total = PerfTimer::new("tick");
        self.frame += 1;
        let mut stats = FrameStats {
            frame: self.frame,
            elapsed,
            ..Default::default()
        };

        let timer = PerfTimer::new("world");
        if self.world.needs_recenter(self.camera.position) {
            self.world.recenter(self.camera.chunk_coord());
            stats.recentered = true;
        }
        stats.rebuilt |= self.rebuild_if_stale();
        stats.timings.world = timer.elapsed();
        drop(timer);

        let timer = PerfTimer::new("movement");
        self.visible.refresh_colliders(&self.camera);
        self.movement
            .step(&mut self.camera, buttons, self.visible.colliders());
        stats.timings.movement = timer.elapsed();
        drop(timer);

        let timer = PerfTimer::new("raycast");
        self.hit = cast_ray(
            &self.world,
            self.camera.eye(),
            self.camera.forward(),
            self.config.editor.max_steps,
        );
        let edit = self.editor.update(
            buttons,
            self.hit.as_ref(),
            &self.movement.config.body,
            self.camera.position,
        );
        if let Some(edit) = edit {
            stats.edited = self.apply_edit(edit);
        }
        stats.has_hit = self.hit.is_some();
        stats.timings.raycast = timer.elapsed();
        drop(timer);

        let timer = PerfTimer::new("collect");
        stats.rebuilt |= self.rebuild_if_stale();
        stats.rendered_blocks = self.visible.collect(&self.camera, &self.config.render);
        stats.candidates = self.visible.candidates().len();
        stats.colliders = self.visible.colliders().len();
        stats.timings.collect = timer.elapsed();
        drop(timer);

        let timer = PerfTimer::new("raster");
        self.draw(target);
        stats.raster = self.rasterizer.take_stats();
        stats.timings.raster = timer.elapsed();
        drop(timer);

        stats.timings.total = total.elapsed();
        stats.log_summary();
        stats
    }

    fn rebuild_if_stale(&mut self) -> bool {
        if self.visible.needs_rebuild(&self.world) {
            self.visible.rebuild(&self.world);
            true
        } else {
            false
        }
    }

    fn apply_edit(&mut self, edit: Edit) -> bool {
        let changed = self.world.set_block(edit.cell(), edit.block());
        debug!("Edit {:?} applied: {}", edit, changed);
        changed
    }

    fn draw<T: PixelTarget>(&mut self, target: &mut T) {
        let render = &self.config.render;
        let shading = self.rasterizer.shading;
        let view = self
            .camera
            .view(self.config.screen.width, self.config.screen.height);

        if render.clear {
            for y in 0..target.height() {
                target.fill_span(y, 0, target.width(), |_, _| shading.background);
            }
        }

        for block in self.visible.render_list() {
            self.rasterizer.draw_mesh(
                target,
                &view,
                &self.cube,
                &Placement::at(block.position.as_vec3()),
                Some(block.faces),
                DrawStyle::Shaded,
            );
        }

        if render.chunk_borders {
            self.draw_chunk_borders(target, &view, shading.border_color);
        }

        if render.aim_markers {
            if let Some(hit) = self.hit {
                for cell in [hit.last_empty, hit.solid] {
                    self.rasterizer.draw_mesh(
                        target,
                        &view,
                        &self.cube,
                        &Placement::at(cell.as_vec3()),
                        None,
                        DrawStyle::Wire(shading.marker_color),
                    );
                }
            }
        }

        if render.reticle {
            let c = view.center();
            target.draw_line(c.x - RETICLE_SIZE, c.y, c.x + RETICLE_SIZE, c.y, shading.text_color);
            target.draw_line(c.x, c.y - RETICLE_SIZE, c.x, c.y + RETICLE_SIZE, shading.text_color);
        }

        if render.position_text {
            let cell = self.camera.cell();
            let text = format!("Pos: [ {} | {} | {}]", cell.x, cell.y, cell.z);
            target.draw_text(40, 40, &text, shading.text_color);
        }
    }

    /// Vertical lines at the four corners of every loaded chunk.
    fn draw_chunk_borders<T: PixelTarget>(&self, target: &mut T, view: &CameraView, color: u32) {
        let size = CHUNK_SIZE_I32 as f32;
        for chunk in self.world.chunks() {
            let origin = chunk.origin().as_vec3();
            for (dx, dz) in [(0.0, 0.0), (size, 0.0), (0.0, size), (size, size)] {
                let bottom = origin + Vec3::new(dx, 0.0, dz);
                let top = bottom + Vec3::new(0.0, size, 0.0);
                self.rasterizer
                    .draw_world_segment(target, view, bottom, top, color);
            }
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut Movement {
        &mut self.movement
    }

    pub fn editor(&self) -> &BlockEditor {
        &self.editor
    }

    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    pub fn hit(&self) -> Option<&RayHit> {
        self.hit.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Overlay toggles and culling limits may change between ticks.
    pub fn render_config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config.render
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
