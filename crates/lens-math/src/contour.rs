// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Marching Squares
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Iso-line extraction on a 2D scalar field (marching squares).
//!
//! Contour points are fractional (row, col) indices into the field. A cell
//! is the square between rows r, r+1 and cols c, c+1; each crossing lies on
//! one of the cell's edges and is linearly interpolated along it. Segments
//! sharing an edge are chained into polylines.

use ndarray::Array2;
use std::collections::{BTreeMap, BTreeSet};

/// A cell edge, identified by its lower-index corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Edge {
    /// (r, c) → (r, c+1)
    Horizontal(usize, usize),
    /// (r, c) → (r+1, c)
    Vertical(usize, usize),
}

/// Find all iso-lines of `field` at `level`.
///
/// A sample counts as inside when strictly greater than `level`. Ambiguous
/// saddle cells are resolved with the mean of the four corners. Closed
/// contours repeat their first point at the end. Returns an empty list for
/// fields with fewer than 2 rows or columns.
pub fn find_contours(field: &Array2<f64>, level: f64) -> Vec<Vec<[f64; 2]>> {
    let (nrows, ncols) = field.dim();
    if nrows < 2 || ncols < 2 {
        return Vec::new();
    }

    let mut neighbours: BTreeMap<Edge, Vec<Edge>> = BTreeMap::new();
    let mut link = |a: Edge, b: Edge| {
        neighbours.entry(a).or_default().push(b);
        neighbours.entry(b).or_default().push(a);
    };

    for r in 0..nrows - 1 {
        for c in 0..ncols - 1 {
            let ul = field[[r, c]] > level;
            let ur = field[[r, c + 1]] > level;
            let ll = field[[r + 1, c]] > level;
            let lr = field[[r + 1, c + 1]] > level;
            if ul == ur && ur == lr && lr == ll {
                continue;
            }

            let top = Edge::Horizontal(r, c);
            let bottom = Edge::Horizontal(r + 1, c);
            let left = Edge::Vertical(r, c);
            let right = Edge::Vertical(r, c + 1);

            let mut crossed = Vec::with_capacity(4);
            if ul != ur {
                crossed.push(top);
            }
            if ur != lr {
                crossed.push(right);
            }
            if lr != ll {
                crossed.push(bottom);
            }
            if ll != ul {
                crossed.push(left);
            }

            if crossed.len() == 2 {
                link(crossed[0], crossed[1]);
            } else {
                // Saddle: all four edges crossed
                let mean = 0.25
                    * (field[[r, c]] + field[[r, c + 1]] + field[[r + 1, c]] + field[[r + 1, c + 1]]);
                if (mean > level) == ul {
                    link(top, right);
                    link(bottom, left);
                } else {
                    link(top, left);
                    link(right, bottom);
                }
            }
        }
    }

    let mut seen: BTreeSet<Edge> = BTreeSet::new();
    let mut contours = Vec::new();

    for &start in neighbours.keys() {
        if seen.contains(&start) {
            continue;
        }
        seen.insert(start);

        let mut path = vec![start];
        let mut prev: Option<Edge> = None;
        let mut cur = start;
        let mut closed = false;
        while let Some(next) = next_edge(&neighbours, cur, prev, None) {
            if next == start {
                closed = true;
                break;
            }
            if seen.contains(&next) {
                break;
            }
            path.push(next);
            seen.insert(next);
            prev = Some(cur);
            cur = next;
        }

        if closed {
            path.push(start);
        } else {
            // Open contour: extend from the start in the other direction
            let mut back = Vec::new();
            let mut prev = path.get(1).copied();
            let mut cur = start;
            while let Some(next) = next_edge(&neighbours, cur, prev, Some(&seen)) {
                back.push(next);
                seen.insert(next);
                prev = Some(cur);
                cur = next;
            }
            back.reverse();
            back.extend(path);
            path = back;
        }

        contours.push(path.iter().map(|&e| crossing(field, e, level)).collect());
    }

    contours
}

fn next_edge(
    neighbours: &BTreeMap<Edge, Vec<Edge>>,
    cur: Edge,
    prev: Option<Edge>,
    exclude: Option<&BTreeSet<Edge>>,
) -> Option<Edge> {
    neighbours.get(&cur)?.iter().copied().find(|&n| {
        Some(n) != prev && exclude.map_or(true, |seen| !seen.contains(&n))
    })
}

/// Interpolated crossing point on an edge, from lower to higher index.
fn crossing(field: &Array2<f64>, edge: Edge, level: f64) -> [f64; 2] {
    match edge {
        Edge::Horizontal(r, c) => {
            let (v0, v1) = (field[[r, c]], field[[r, c + 1]]);
            [r as f64, c as f64 + (level - v0) / (v1 - v0)]
        }
        Edge::Vertical(r, c) => {
            let (v0, v1) = (field[[r, c]], field[[r + 1, c]]);
            [r as f64 + (level - v0) / (v1 - v0), c as f64]
        }
    }
}
