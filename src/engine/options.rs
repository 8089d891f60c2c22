//! Applying option changes to a running engine.

use super::CityEngine;
use crate::error::SkylineError;
use crate::options::Options;
use crate::picking::id::PickResult;
use crate::scene::{CityScene, InstanceTable};
use crate::util::frame_timing::FrameTiming;

impl CityEngine {
    /// Replace options and push the changes to every subsystem.
    ///
    /// Only what changed is rebuilt: a new recipe or iteration count
    /// rebuilds the chain, new scene parameters regenerate the cube field,
    /// a brightness change is a single uniform write.
    ///
    /// # Errors
    ///
    /// Returns an error if a rebuild fails. The engine keeps the previous
    /// resources for that subsystem in that case.
    pub fn set_options(&mut self, new: Options) -> Result<(), SkylineError> {
        let old = std::mem::replace(&mut self.options, new);

        self.camera.set_options(&self.options.camera);
        self.input.set_amortization(self.options.camera.amortization);

        if old.display.target_fps != self.options.display.target_fps {
            self.timing = FrameTiming::new(self.options.display.target_fps);
        }

        if old.scene != self.options.scene {
            self.apply_scene()?;
        }

        let post = &self.options.post_processing;
        if old.post_processing.chain_recipe() != post.chain_recipe() {
            self.rebuild_targets()?;
        } else if old.post_processing.brightness != post.brightness {
            self.targets
                .chain
                .set_brightness(&self.context.queue, post.brightness);
        }

        if !self.options.picking.enabled {
            self.picked = PickResult::None;
        }
        Ok(())
    }

    fn apply_scene(&mut self) -> Result<(), SkylineError> {
        let instances =
            InstanceTable::generate(&self.options.scene.instance_cloud())?;
        self.scene = CityScene::new(
            &self.context,
            &mut self.composer,
            instances,
            self.options.scene.ground_half_size,
        )?;
        self.picked = PickResult::None;
        Ok(())
    }
}
