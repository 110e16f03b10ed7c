//! Scan conversion from a [`termshape_font`] glyph outline to a
//! single-channel coverage bitmap, and the small compositing helpers
//! `CellRenderer`/`EmojiComposer` share.
//!
//! This is a deliberately simple even-odd scanline fill over the
//! outline's points (quadratic off-curve points are flattened to a few
//! line segments rather than evaluated exactly) — correct, pixel-
//! aligned coverage, not a production hinting/AA engine (spec §1
//! non-goals).

use termshape_font::tables::glyf::{Outline, OutlinePoint};

/// Flattens one contour's on/off-curve point sequence into a polygon
/// (straight edges only), approximating quadratic Bezier segments with
/// a fixed number of line segments.
fn flatten_contour(points: &[OutlinePoint]) -> Vec<(f32, f32)> {
    const STEPS: usize = 4;

    if points.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(points.len() * 2);
    let n = points.len();
    for i in 0..n {
        let cur = points[i];
        let next = points[(i + 1) % n];

        if cur.on_curve {
            out.push((cur.x, cur.y));
            continue;
        }

        // `cur` is an off-curve control point; the endpoints are the
        // nearest on-curve neighbors (or the midpoint of two
        // consecutive off-curve points, per the TrueType convention).
        let prev = points[(i + n - 1) % n];
        let p0 = if prev.on_curve { (prev.x, prev.y) } else { ((prev.x + cur.x) / 2.0, (prev.y + cur.y) / 2.0) };
        let p2 = if next.on_curve { (next.x, next.y) } else { ((cur.x + next.x) / 2.0, (cur.y + next.y) / 2.0) };

        for step in 1..=STEPS {
            let t = step as f32 / STEPS as f32;
            let mt = 1.0 - t;
            let x = mt * mt * p0.0 + 2.0 * mt * t * cur.x + t * t * p2.0;
            let y = mt * mt * p0.1 + 2.0 * mt * t * cur.y + t * t * p2.1;
            out.push((x, y));
        }
    }

    out
}

/// Rasterizes `outline` (in font units) into a `w x h` single-channel
/// coverage bitmap, scaling by `scale` and offsetting so the glyph's
/// origin lands at `(origin_x, origin_y)` pixels from the bitmap's
/// top-left.
///
/// Fill rule is even-odd over the union of all contours, which matches
/// TrueType's nonzero-vs-evenodd ambiguity closely enough for simple
/// glyphs without self-intersecting contours (spec §1 non-goal: not a
/// bug-for-bug replica of any shaping/rasterization engine).
pub fn rasterize_outline(
    outline: &Outline,
    scale: f32,
    origin_x: f32,
    origin_y: f32,
    w: u32,
    h: u32,
) -> Vec<u8> {
    let mut coverage = vec![0u8; (w * h) as usize];
    if outline.is_empty() {
        return coverage;
    }

    let polygons: Vec<Vec<(f32, f32)>> = outline
        .iter()
        .map(|contour| {
            flatten_contour(contour)
                .into_iter()
                .map(|(x, y)| (origin_x + x * scale, origin_y - y * scale))
                .collect()
        })
        .filter(|p: &Vec<(f32, f32)>| p.len() >= 2)
        .collect();

    for py in 0..h {
        let sample_y = py as f32 + 0.5;
        let mut crossings: Vec<f32> = Vec::new();

        for polygon in &polygons {
            let n = polygon.len();
            for i in 0..n {
                let (x0, y0) = polygon[i];
                let (x1, y1) = polygon[(i + 1) % n];
                if (y0 <= sample_y && y1 > sample_y) || (y1 <= sample_y && y0 > sample_y) {
                    let t = (sample_y - y0) / (y1 - y0);
                    crossings.push(x0 + t * (x1 - x0));
                }
            }
        }

        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in crossings.chunks_exact(2) {
            let (x_start, x_end) = (pair[0], pair[1]);
            let px_start = x_start.round().max(0.0) as u32;
            let px_end = x_end.round().min(w as f32) as u32;
            for px in px_start..px_end.min(w) {
                coverage[(py * w + px) as usize] = 255;
            }
        }
    }

    coverage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_outline() -> Outline {
        vec![vec![
            OutlinePoint { x: 0.0, y: 0.0, on_curve: true },
            OutlinePoint { x: 10.0, y: 0.0, on_curve: true },
            OutlinePoint { x: 10.0, y: 10.0, on_curve: true },
            OutlinePoint { x: 0.0, y: 10.0, on_curve: true },
        ]]
    }

    #[test]
    fn empty_outline_is_blank() {
        let coverage = rasterize_outline(&[], 1.0, 0.0, 10.0, 8, 8);
        assert!(coverage.iter().all(|&c| c == 0));
    }

    #[test]
    fn filled_square_has_interior_coverage() {
        let outline = square_outline();
        let coverage = rasterize_outline(&outline, 1.0, 0.0, 10.0, 10, 10);
        assert!(coverage[5 * 10 + 5] == 255);
        assert_eq!(coverage[0], 0);
    }
}
