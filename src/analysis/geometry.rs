use crate::models::chart::{ArcSegment, CompositionChart, Point};

/// Gap between the two halves of the composition arc, in degrees.
pub const SEGMENT_GAP_DEG: f64 = 3.0;

const ARC_START_DEG: f64 = -90.0;
const ARC_END_DEG: f64 = 90.0;

/// Angles are measured from twelve o'clock, clockwise.
pub fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> Point {
    let radians = (angle_deg - 90.0).to_radians();
    Point {
        x: cx + radius * radians.cos(),
        y: cy + radius * radians.sin(),
    }
}

/// SVG path for an arc between two angles, drawn from `end` back to `start`.
pub fn describe_arc(cx: f64, cy: f64, radius: f64, start_deg: f64, end_deg: f64) -> String {
    let start = polar_to_cartesian(cx, cy, radius, end_deg);
    let end = polar_to_cartesian(cx, cy, radius, start_deg);
    let large_arc = if end_deg - start_deg <= 180.0 { 0 } else { 1 };

    format!(
        "M {} {} A {} {} 0 {} 0 {} {}",
        fmt(start.x),
        fmt(start.y),
        fmt(radius),
        fmt(radius),
        large_arc,
        fmt(end.x),
        fmt(end.y)
    )
}

/// Semicircular split of today's words into original and reply shares.
pub fn composition_chart(
    original_words: u32,
    reply_words: u32,
    cx: f64,
    cy: f64,
    radius: f64,
) -> CompositionChart {
    let total = original_words as f64 + reply_words as f64;
    let mut segments = Vec::new();

    if total > 0.0 {
        let original_share = original_words as f64 / total;
        let reply_share = reply_words as f64 / total;
        let sweep = ARC_END_DEG - ARC_START_DEG;

        if original_words == 0 || reply_words == 0 {
            let (label, share) = if original_words > 0 {
                ("original", original_share)
            } else {
                ("reply", reply_share)
            };
            segments.push(segment(label, share, ARC_START_DEG, ARC_END_DEG, cx, cy, radius));
        } else {
            let usable = sweep - SEGMENT_GAP_DEG;
            let split = ARC_START_DEG + usable * original_share;
            segments.push(segment("original", original_share, ARC_START_DEG, split, cx, cy, radius));
            segments.push(segment(
                "reply",
                reply_share,
                split + SEGMENT_GAP_DEG,
                ARC_END_DEG,
                cx,
                cy,
                radius,
            ));
        }
    }

    CompositionChart {
        original_words,
        reply_words,
        segments,
    }
}

fn segment(
    label: &str,
    share: f64,
    start_angle: f64,
    end_angle: f64,
    cx: f64,
    cy: f64,
    radius: f64,
) -> ArcSegment {
    ArcSegment {
        label: label.to_string(),
        share,
        start_angle,
        end_angle,
        path: describe_arc(cx, cy, radius, start_angle, end_angle),
    }
}

fn fmt(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0" in paths.
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}
