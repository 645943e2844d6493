use glam::Vec3;
use static_assertions::const_assert_eq;

/// Narrowphase result for one overlapping shape pair.
///
/// `normal` is unit length and points from shape A toward shape B;
/// `penetration` is positive while the shapes overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub point: Vec3,
    pub normal: Vec3,
    pub penetration: f32,
}

impl ContactPoint {
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Same contact seen from shape B
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            ..*self
        }
    }
}

/// Flat, byte-copyable record of a resolved contact
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct ContactRecord {
    pub body_a: u64,
    pub body_b: u64,
    pub position: [f32; 3],
    pub penetration_depth: f32,
    pub normal: [f32; 3],
    pub _padding: f32,
}

const_assert_eq!(std::mem::size_of::<ContactRecord>(), 48);

impl ContactRecord {
    pub fn new(body_a: u64, body_b: u64, contact: &ContactPoint) -> Self {
        Self {
            body_a,
            body_b,
            position: contact.point.to_array(),
            penetration_depth: contact.penetration,
            normal: contact.normal.to_array(),
            _padding: 0.0,
        }
    }

    pub fn contact(&self) -> ContactPoint {
        ContactPoint::new(
            Vec3::from_array(self.position),
            Vec3::from_array(self.normal),
            self.penetration_depth,
        )
    }

    pub fn involves(&self, handle: u64) -> bool {
        self.body_a == handle || self.body_b == handle
    }
}

/// Per-`step` statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct StepStats {
    pub substeps: u32,
    pub pairs_tested: usize,
    pub contacts: usize,
    pub awake_bodies: usize,
    pub sleeping_bodies: usize,
    /// Accumulated time thrown away by the spiral-of-death guard
    pub discarded_time: f32,
}

impl StepStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_json(&self) -> crate::error::PhysicsResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_record_round_trip_bytes() {
        let contact = ContactPoint::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, 0.25);
        let records = [ContactRecord::new(4, 9, &contact)];
        let bytes: &[u8] = bytemuck::cast_slice(&records);
        assert_eq!(bytes.len(), 48);

        let back: &[ContactRecord] = bytemuck::cast_slice(bytes);
        assert_eq!(back[0].contact(), contact);
        assert!(back[0].involves(9));
        assert!(!back[0].involves(5));
    }

    #[test]
    fn test_flipped_negates_normal_only() {
        let contact = ContactPoint::new(Vec3::ONE, Vec3::X, 0.5);
        let flipped = contact.flipped();
        assert_eq!(flipped.normal, -Vec3::X);
        assert_eq!(flipped.point, contact.point);
        assert_eq!(flipped.penetration, contact.penetration);
    }

    #[test]
    fn test_stats_json() {
        let stats = StepStats {
            substeps: 4,
            ..Default::default()
        };
        let json = stats.to_json().expect("stats should serialize");
        assert!(json.contains("\"substeps\":4"));
    }
}
