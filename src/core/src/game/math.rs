use nalgebra::Vector2;

/// Normalize a direction vector, substituting a unit default (towards
/// the far goal) when the magnitude is too small to divide by.
pub fn safe_normalize(v: Vector2<f32>) -> Vector2<f32> {
    let norm = v.norm();

    if norm > f32::EPSILON {
        v / norm
    } else {
        Vector2::new(0.0, -1.0)
    }
}

/// Move `from` towards `target` by at most `max_step`, without overshooting.
pub fn step_towards(from: Vector2<f32>, target: Vector2<f32>, max_step: f32) -> Vector2<f32> {
    let to_target = target - from;
    let distance = to_target.norm();

    if distance <= max_step || distance <= f32::EPSILON {
        target
    } else {
        from + to_target * (max_step / distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_normalize_guards_zero_vector() {
        let fallback = safe_normalize(Vector2::zeros());
        assert_eq!(fallback, Vector2::new(0.0, -1.0));

        let unit = safe_normalize(Vector2::new(3.0, 4.0));
        assert!((unit.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn step_towards_does_not_overshoot() {
        let from = Vector2::new(0.0, 0.0);
        let target = Vector2::new(10.0, 0.0);

        let halfway = step_towards(from, target, 5.0);
        assert_eq!(halfway, Vector2::new(5.0, 0.0));

        let arrived = step_towards(from, target, 50.0);
        assert_eq!(arrived, target);
    }
}
