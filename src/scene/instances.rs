//! Per-instance cube data and its seeded generation.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SkylineError;
use crate::picking::id::MAX_PICKABLE_INSTANCES;

/// One cube: placement, size, and base color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeInstance {
    /// World-space center.
    pub offset: Vec3,
    /// Per-axis scale of the unit cube mesh.
    pub scale: Vec3,
    /// Base RGB color in `[0, 1]`.
    pub color: Vec3,
}

/// Vertex-buffer layout of a [`CubeInstance`].
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeInstanceRaw {
    /// World-space center.
    pub offset: [f32; 3],
    /// Per-axis scale.
    pub scale: [f32; 3],
    /// Base color.
    pub color: [f32; 3],
}

impl From<&CubeInstance> for CubeInstanceRaw {
    fn from(instance: &CubeInstance) -> Self {
        Self {
            offset: instance.offset.to_array(),
            scale: instance.scale.to_array(),
            color: instance.color.to_array(),
        }
    }
}

/// Parameters for [`InstanceTable::generate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceCloud {
    /// Number of cubes.
    pub count: usize,
    /// Side of the square (centered on the origin) cube centers fall in.
    pub cloud_size: f32,
    /// Uniform cube scale.
    pub cube_scale: f32,
    /// Height of every cube center.
    pub height: f32,
    /// RNG seed; the same seed yields the same table.
    pub seed: u64,
}

/// Ordered table of cube instances. The position in the table is the
/// instance index the pick pass reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceTable {
    instances: Vec<CubeInstance>,
}

impl InstanceTable {
    /// Wrap explicit instances.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::TooManyInstances`] if the table exceeds the
    /// pick id space.
    pub fn from_instances(
        instances: Vec<CubeInstance>,
    ) -> Result<Self, SkylineError> {
        if instances.len() > MAX_PICKABLE_INSTANCES {
            return Err(SkylineError::TooManyInstances {
                requested: instances.len(),
                max: MAX_PICKABLE_INSTANCES,
            });
        }
        Ok(Self { instances })
    }

    /// Scatter `cloud.count` cubes uniformly over the cloud square.
    /// Instance 0 is red; the rest get random colors.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::TooManyInstances`] if `count` exceeds the
    /// pick id space.
    pub fn generate(cloud: &InstanceCloud) -> Result<Self, SkylineError> {
        if cloud.count > MAX_PICKABLE_INSTANCES {
            return Err(SkylineError::TooManyInstances {
                requested: cloud.count,
                max: MAX_PICKABLE_INSTANCES,
            });
        }
        let mut rng = StdRng::seed_from_u64(cloud.seed);
        let scale = Vec3::splat(cloud.cube_scale);
        let instances = (0..cloud.count)
            .map(|i| {
                let x = (rng.random::<f32>() - 0.5) * cloud.cloud_size;
                let z = (rng.random::<f32>() - 0.5) * cloud.cloud_size;
                let color = if i == 0 {
                    Vec3::X
                } else {
                    Vec3::new(rng.random(), rng.random(), rng.random())
                };
                CubeInstance {
                    offset: Vec3::new(x, cloud.height, z),
                    scale,
                    color,
                }
            })
            .collect();
        Ok(Self { instances })
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance at `index`.
    pub fn get(&self, index: usize) -> Option<&CubeInstance> {
        self.instances.get(index)
    }

    /// All instances in index order.
    pub fn as_slice(&self) -> &[CubeInstance] {
        &self.instances
    }

    /// GPU vertex data in index order.
    pub fn to_raw(&self) -> Vec<CubeInstanceRaw> {
        self.instances.iter().map(CubeInstanceRaw::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(count: usize, seed: u64) -> InstanceCloud {
        InstanceCloud {
            count,
            cloud_size: 5.0,
            cube_scale: 0.2,
            height: 0.1,
            seed,
        }
    }

    #[test]
    fn same_seed_same_table() {
        let a = InstanceTable::generate(&cloud(50, 7)).unwrap();
        let b = InstanceTable::generate(&cloud(50, 7)).unwrap();
        let c = InstanceTable::generate(&cloud(50, 8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn first_instance_is_red_and_all_fit_the_cloud() {
        let table = InstanceTable::generate(&cloud(500, 1)).unwrap();
        assert_eq!(table.len(), 500);
        assert_eq!(table.get(0).map(|i| i.color), Some(Vec3::X));
        for inst in table.as_slice() {
            assert!(inst.offset.x.abs() <= 2.5 && inst.offset.z.abs() <= 2.5);
            assert_eq!(inst.offset.y, 0.1);
            assert_eq!(inst.scale, Vec3::splat(0.2));
        }
    }

    #[test]
    fn oversized_cloud_is_rejected() {
        let err = InstanceTable::generate(&cloud(MAX_PICKABLE_INSTANCES + 1, 0));
        assert!(matches!(err, Err(SkylineError::TooManyInstances { .. })));
    }

    #[test]
    fn raw_layout_is_nine_floats() {
        assert_eq!(size_of::<CubeInstanceRaw>(), 36);
        let table = InstanceTable::generate(&cloud(3, 2)).unwrap();
        let raw = table.to_raw();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].color, [1.0, 0.0, 0.0]);
    }
}
