use nalgebra::Vector2;

const FAR_SCALE: f32 = 0.55;
const NEAR_SCALE: f32 = 1.0;
const SCREEN_TOP: f32 = 70.0;
const SCREEN_BOTTOM: f32 = 570.0;
const SCREEN_CENTER_X: f32 = 320.0;

/// Pseudo-3D mapping between the flat world model and screen space.
///
/// Points on the far touchline (world y = 0) are shrunk by the far
/// factor, points on the near touchline keep their size, with a linear
/// interpolation in between. X is scaled around the horizontal midline
/// by the interpolated factor, while y maps linearly between the fixed
/// top and bottom screen margins regardless of scale.
pub struct Projection {
    pub far_scale: f32,
    pub near_scale: f32,
    pub screen_top: f32,
    pub screen_bottom: f32,
    pub screen_center_x: f32,

    world_width: f32,
    world_height: f32,
}

impl Projection {
    pub fn new(world_width: f32, world_height: f32) -> Self {
        Projection {
            far_scale: FAR_SCALE,
            near_scale: NEAR_SCALE,
            screen_top: SCREEN_TOP,
            screen_bottom: SCREEN_BOTTOM,
            screen_center_x: SCREEN_CENTER_X,
            world_width,
            world_height,
        }
    }

    /// Perspective scale factor at a given world depth.
    pub fn scale_at(&self, world_y: f32) -> f32 {
        let t = world_y / self.world_height;
        self.far_scale + (self.near_scale - self.far_scale) * t
    }

    pub fn project(&self, world: Vector2<f32>) -> Vector2<f32> {
        let t = world.y / self.world_height;
        let scale = self.far_scale + (self.near_scale - self.far_scale) * t;

        let screen_x = self.screen_center_x + (world.x - self.world_width / 2.0) * scale;
        let screen_y = self.screen_top + t * (self.screen_bottom - self.screen_top);

        Vector2::new(screen_x, screen_y)
    }

    /// Exact inverse of [`Projection::project`]: recover the depth
    /// fraction from screen y, rebuild the scale at that depth, then
    /// undo the x scaling around the midline.
    pub fn unproject(&self, screen: Vector2<f32>) -> Vector2<f32> {
        let t = (screen.y - self.screen_top) / (self.screen_bottom - self.screen_top);
        let scale = self.far_scale + (self.near_scale - self.far_scale) * t;

        let world_x = self.world_width / 2.0 + (screen.x - self.screen_center_x) / scale;
        let world_y = t * self.world_height;

        Vector2::new(world_x, world_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-3;

    #[test]
    fn round_trip_is_identity_within_bounds() {
        let projection = Projection::new(600.0, 900.0);

        for x in [0.0f32, 55.5, 300.0, 444.4, 600.0] {
            for y in [0.0f32, 90.0, 450.0, 725.25, 900.0] {
                let world = Vector2::new(x, y);
                let recovered = projection.unproject(projection.project(world));

                assert!(
                    (recovered - world).norm() < TOLERANCE,
                    "round trip failed for ({}, {}): got ({}, {})",
                    x,
                    y,
                    recovered.x,
                    recovered.y
                );
            }
        }
    }

    #[test]
    fn far_points_are_compressed_towards_the_midline() {
        let projection = Projection::new(600.0, 900.0);

        let far = projection.project(Vector2::new(0.0, 0.0));
        let near = projection.project(Vector2::new(0.0, 900.0));

        let far_offset = (far.x - projection.screen_center_x).abs();
        let near_offset = (near.x - projection.screen_center_x).abs();

        assert!(far_offset < near_offset);
    }

    #[test]
    fn depth_maps_linearly_between_margins() {
        let projection = Projection::new(600.0, 900.0);

        let mid = projection.project(Vector2::new(300.0, 450.0));
        let expected = (projection.screen_top + projection.screen_bottom) / 2.0;

        assert!((mid.y - expected).abs() < TOLERANCE);
    }
}
