//! Arc geometry
//!
//! Angles are in degrees, clockwise from 12 o'clock. Children of an arc are
//! laid end to end; the anchor type decides whether the set starts at, is
//! centred on, or ends at the anchor angle.

use tracing::warn;

use crate::proto::ArcAnchorType;

/// A full turn; children past it are not placed
pub const MAX_SWEEP_DEGREES: f32 = 360.0;

/// Angular extent of an arc child
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment {
    pub sweep_degrees: f32,
    pub thickness_px: f32,
}

/// Where an arc child ended up
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPlacement {
    pub start_angle_degrees: f32,
    pub sweep_degrees: f32,
    pub center_angle_degrees: f32,
    /// Distance from the arc centre to the middle of the child's thickness
    pub radius_px: f32,
}

/// Sweep covered by a straight length laid along a circle of `radius_px`
pub fn sweep_for_length(length_px: f32, radius_px: f32) -> f32 {
    if radius_px <= 0.0 {
        return 0.0;
    }
    (length_px / radius_px).to_degrees()
}

pub fn normalize_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Place `segments` along the outer edge of a circle.
///
/// Returns one entry per segment; segments that would take the total sweep
/// past a full turn are `None`.
pub fn layout_arc(
    outer_radius_px: f32,
    anchor_angle_degrees: f32,
    anchor_type: ArcAnchorType,
    segments: &[ArcSegment],
) -> Vec<Option<ArcPlacement>> {
    let mut total = 0.0;
    let mut placed = 0;
    for segment in segments {
        let sweep = segment.sweep_degrees.max(0.0);
        if total + sweep > MAX_SWEEP_DEGREES {
            warn!(
                "arc children exceed {} degrees, dropping {} of {}",
                MAX_SWEEP_DEGREES,
                segments.len() - placed,
                segments.len()
            );
            break;
        }
        total += sweep;
        placed += 1;
    }

    let mut cursor = match anchor_type {
        ArcAnchorType::Start => anchor_angle_degrees,
        ArcAnchorType::Center => anchor_angle_degrees - total / 2.0,
        ArcAnchorType::End => anchor_angle_degrees - total,
    };

    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            if index >= placed {
                return None;
            }
            let sweep = segment.sweep_degrees.max(0.0);
            let start = cursor;
            cursor += sweep;
            Some(ArcPlacement {
                start_angle_degrees: normalize_degrees(start),
                sweep_degrees: sweep,
                center_angle_degrees: normalize_degrees(start + sweep / 2.0),
                radius_px: (outer_radius_px - segment.thickness_px / 2.0).max(0.0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(sweep: f32) -> ArcSegment {
        ArcSegment {
            sweep_degrees: sweep,
            thickness_px: 10.0,
        }
    }

    fn centers(placements: &[Option<ArcPlacement>]) -> Vec<f32> {
        placements
            .iter()
            .map(|p| p.unwrap().center_angle_degrees)
            .collect()
    }

    #[test]
    fn test_anchor_types() {
        let segments = [segment(30.0), segment(60.0)];

        let start = layout_arc(100.0, 0.0, ArcAnchorType::Start, &segments);
        assert_eq!(centers(&start), vec![15.0, 60.0]);

        let center = layout_arc(100.0, 0.0, ArcAnchorType::Center, &segments);
        assert_eq!(centers(&center), vec![330.0, 15.0]);
        assert_eq!(center[0].unwrap().start_angle_degrees, 315.0);

        let end = layout_arc(100.0, 90.0, ArcAnchorType::End, &segments);
        assert_eq!(centers(&end), vec![15.0, 60.0]);
    }

    #[test]
    fn test_radius_at_thickness_midline() {
        let placed = layout_arc(100.0, 0.0, ArcAnchorType::Start, &[segment(10.0)]);
        assert_eq!(placed[0].unwrap().radius_px, 95.0);
    }

    #[test]
    fn test_overflow_dropped() {
        let segments = [segment(200.0), segment(100.0), segment(100.0)];
        let placed = layout_arc(100.0, 0.0, ArcAnchorType::Start, &segments);
        assert!(placed[0].is_some());
        assert!(placed[1].is_some());
        assert!(placed[2].is_none());
    }

    #[test]
    fn test_sweep_for_length() {
        let quarter = sweep_for_length(std::f32::consts::FRAC_PI_2 * 100.0, 100.0);
        assert!((quarter - 90.0).abs() < 1e-3);
        assert_eq!(sweep_for_length(10.0, 0.0), 0.0);
    }
}
