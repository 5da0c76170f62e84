//! Object-to-world transforms.
//!
//! Volumes are measured in world space, so a mesh loaded from a file usually
//! needs the placement of the object it came from. [`ObjectTransform`] is the
//! usual location / rotation / scale triple and composes to a single matrix in
//! scale, then rotate, then translate order.

use nalgebra::{Matrix4, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Location, XYZ Euler rotation (degrees), and scale of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObjectTransform {
    /// Translation in world units.
    pub location: [f64; 3],
    /// Rotation about X, then Y, then Z, in degrees.
    pub rotation_deg: [f64; 3],
    /// Per-axis scale.
    pub scale: [f64; 3],
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation_deg: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl ObjectTransform {
    /// Set the location.
    pub fn with_location(mut self, location: [f64; 3]) -> Self {
        self.location = location;
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation_deg(mut self, rotation_deg: [f64; 3]) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    /// Set the scale.
    pub fn with_scale(mut self, scale: [f64; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// Check whether this is the identity transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Compose the homogeneous object-to-world matrix `T * R * S`.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let [rx, ry, rz] = self.rotation_deg.map(f64::to_radians);
        let translation = Matrix4::new_translation(&Vector3::from(self.location));
        // from_euler_angles(roll, pitch, yaw) applies X first, then Y, then Z
        let rotation = Rotation3::from_euler_angles(rx, ry, rz).to_homogeneous();
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::from(self.scale));
        translation * rotation * scale
    }
}

impl From<ObjectTransform> for Matrix4<f64> {
    fn from(t: ObjectTransform) -> Self {
        t.to_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_identity() {
        let t = ObjectTransform::default();
        assert!(t.is_identity());
        assert_eq!(t.to_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_scale_then_translate() {
        let m = ObjectTransform::default()
            .with_scale([2.0, 3.0, 4.0])
            .with_location([1.0, 0.0, 0.0])
            .to_matrix();
        let p = m.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert!((p - Point3::new(3.0, 3.0, 4.0)).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_about_z() {
        let m = ObjectTransform::default()
            .with_rotation_deg([0.0, 0.0, 90.0])
            .to_matrix();
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }
}
