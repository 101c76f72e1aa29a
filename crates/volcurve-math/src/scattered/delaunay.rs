//! Delaunay triangulation of planar point sets.
//!
//! Construction starts from the convex hull, fan-triangulated and legalised,
//! then inserts the remaining points one at a time, restoring the Delaunay
//! property with Lawson edge flips after every insertion. Starting from the
//! hull means the mesh always covers the full convex hull, including hull
//! edges that carry several collinear points (a common shape for option
//! quotes, which line up along each expiry).
//!
//! Geometric predicates run on a copy of the points translated and uniformly
//! scaled into the unit square. Uniform scaling preserves the Delaunay
//! property, so the resulting triangles are those of the original points.

use std::collections::HashMap;

use nalgebra::{Matrix2, Vector2};

use crate::error::{MathError, MathResult};

/// Tolerance for orientation and in-circle tests on normalised coordinates.
const PREDICATE_EPS: f64 = 1e-12;

/// Tolerance on barycentric coordinates when locating query points.
const BARYCENTRIC_EPS: f64 = 100.0 * f64::EPSILON;

/// A Delaunay triangulation of a set of distinct 2D points.
///
/// Triangles are stored counter-clockwise. `neighbors(t)[k]` is the
/// triangle sharing the edge opposite vertex `k` of triangle `t`, or `None`
/// on the convex hull.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<[f64; 2]>,
    triangles: Vec<[usize; 3]>,
    neighbors: Vec<[Option<usize>; 3]>,
    /// Inverse of the edge matrix `[b - a, c - a]`, `None` for slivers.
    transforms: Vec<Option<Matrix2<f64>>>,
    /// Bounding box per triangle: `[min_x, max_x, min_y, max_y]`.
    bounds: Vec<[f64; 4]>,
}

impl Triangulation {
    /// Triangulates a set of distinct points.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 3 points or all points are
    /// collinear.
    pub fn new(points: Vec<[f64; 2]>) -> MathResult<Self> {
        if points.len() < 3 {
            return Err(MathError::insufficient_data(3, points.len()));
        }

        let normalized = normalize(&points);
        let hull = convex_hull(&normalized);
        if hull.len() < 3 {
            return Err(MathError::degenerate(
                "points are collinear and do not span a triangle",
            ));
        }

        let mut mesh = MeshBuilder::new(&normalized);
        mesh.fan(&hull);

        let mut on_hull = vec![false; points.len()];
        for &h in &hull {
            on_hull[h] = true;
        }
        for p in (0..points.len()).filter(|&p| !on_hull[p]) {
            mesh.insert(p);
        }

        let neighbors = mesh.neighbors();
        let triangles = mesh.triangles;

        let transforms = triangles
            .iter()
            .map(|&[a, b, c]| {
                let (pa, pb, pc) = (points[a], points[b], points[c]);
                Matrix2::new(
                    pb[0] - pa[0],
                    pc[0] - pa[0],
                    pb[1] - pa[1],
                    pc[1] - pa[1],
                )
                .try_inverse()
            })
            .collect();

        let bounds = triangles
            .iter()
            .map(|tri| {
                let xs = tri.map(|v| points[v][0]);
                let ys = tri.map(|v| points[v][1]);
                [
                    xs[0].min(xs[1]).min(xs[2]),
                    xs[0].max(xs[1]).max(xs[2]),
                    ys[0].min(ys[1]).min(ys[2]),
                    ys[0].max(ys[1]).max(ys[2]),
                ]
            })
            .collect();

        log::debug!(
            "triangulated {} points into {} triangles ({} hull vertices)",
            points.len(),
            triangles.len(),
            hull.len()
        );

        Ok(Self {
            points,
            triangles,
            neighbors,
            transforms,
            bounds,
        })
    }

    /// Returns the triangulated points.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Returns the triangles as counter-clockwise vertex index triples.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Returns the neighbours of triangle `t`, opposite each vertex.
    pub fn neighbors(&self, t: usize) -> [Option<usize>; 3] {
        self.neighbors[t]
    }

    /// Barycentric coordinates of `p` relative to triangle `t`.
    ///
    /// Coordinates are not clamped; points outside the triangle have a
    /// negative component. Returns `None` for degenerate triangles.
    pub fn barycentric(&self, t: usize, p: [f64; 2]) -> Option<[f64; 3]> {
        let inverse = self.transforms[t]?;
        let origin = self.points[self.triangles[t][0]];
        let r = inverse * Vector2::new(p[0] - origin[0], p[1] - origin[1]);
        Some([1.0 - r[0] - r[1], r[0], r[1]])
    }

    /// Finds a triangle containing `p`, with the barycentric coordinates of
    /// `p` in it.
    ///
    /// Walks from triangle to triangle across the edge facing `p`, so a
    /// lookup visits roughly `sqrt(n)` triangles. Points on shared edges
    /// resolve to whichever side the walk reaches first. Returns `None`
    /// outside the convex hull.
    pub fn locate(&self, p: [f64; 2]) -> Option<(usize, [f64; 3])> {
        if p.iter().any(|c| c.is_nan()) {
            return None;
        }

        let mut t = 0;
        for _ in 0..self.triangles.len() {
            let Some(bary) = self.barycentric(t, p) else {
                return self.scan(p);
            };
            let k = (0..3)
                .min_by(|&i, &j| bary[i].total_cmp(&bary[j]))
                .unwrap_or(0);
            if bary[k] >= -BARYCENTRIC_EPS {
                return Some((t, bary));
            }
            // Beyond a hull edge means outside the hull
            t = self.neighbors[t][k]?;
        }

        log::debug!("walk did not converge at ({}, {}); scanning", p[0], p[1]);
        self.scan(p)
    }

    /// Tests every triangle in turn. Used when the walk meets a sliver.
    fn scan(&self, p: [f64; 2]) -> Option<(usize, [f64; 3])> {
        (0..self.triangles.len()).find_map(|t| {
            let [min_x, max_x, min_y, max_y] = self.bounds[t];
            let slack_x = BARYCENTRIC_EPS * (max_x - min_x).max(1.0);
            let slack_y = BARYCENTRIC_EPS * (max_y - min_y).max(1.0);
            if p[0] < min_x - slack_x
                || p[0] > max_x + slack_x
                || p[1] < min_y - slack_y
                || p[1] > max_y + slack_y
            {
                return None;
            }
            let bary = self.barycentric(t, p)?;
            bary.iter()
                .all(|&c| (-BARYCENTRIC_EPS..=1.0 + BARYCENTRIC_EPS).contains(&c))
                .then_some((t, bary))
        })
    }

    /// Returns, for every point, the sorted list of points it shares an
    /// edge with.
    pub fn vertex_neighbors(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.points.len()];
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                adjacency[u].push(v);
                adjacency[v].push(u);
            }
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }
        adjacency
    }
}

/// Where a point being inserted falls within a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Inside,
    /// On edge `k`: 0 is (a, b), 1 is (b, c), 2 is (c, a).
    OnEdge(usize),
    OnVertex,
}

/// Mutable mesh used while the triangulation is built.
struct MeshBuilder<'a> {
    pts: &'a [[f64; 2]],
    triangles: Vec<[usize; 3]>,
    /// Directed edge to the triangle that contains it counter-clockwise.
    edges: HashMap<(usize, usize), usize>,
    /// Where the next point location walk starts.
    last: usize,
}

impl<'a> MeshBuilder<'a> {
    fn new(pts: &'a [[f64; 2]]) -> Self {
        Self {
            pts,
            triangles: Vec::with_capacity(2 * pts.len()),
            edges: HashMap::with_capacity(6 * pts.len()),
            last: 0,
        }
    }

    fn link(&mut self, t: usize) {
        let [a, b, c] = self.triangles[t];
        for edge in [(a, b), (b, c), (c, a)] {
            self.edges.insert(edge, t);
        }
    }

    fn unlink(&mut self, t: usize) {
        let [a, b, c] = self.triangles[t];
        for edge in [(a, b), (b, c), (c, a)] {
            if self.edges.get(&edge) == Some(&t) {
                self.edges.remove(&edge);
            }
        }
    }

    fn push(&mut self, tri: [usize; 3]) {
        self.triangles.push(tri);
        self.link(self.triangles.len() - 1);
    }

    /// Overwrites an unlinked triangle slot.
    fn replace(&mut self, t: usize, tri: [usize; 3]) {
        self.triangles[t] = tri;
        self.link(t);
    }

    fn opposite(&self, t: usize, u: usize, v: usize) -> usize {
        let tri = self.triangles[t];
        tri.into_iter()
            .find(|&w| w != u && w != v)
            .unwrap_or(tri[0])
    }

    /// Fan-triangulates a counter-clockwise convex hull and legalises it.
    fn fan(&mut self, hull: &[usize]) {
        for i in 1..hull.len() - 1 {
            self.push([hull[0], hull[i], hull[i + 1]]);
        }
        let stack: Vec<(usize, usize)> = self.edges.keys().copied().collect();
        self.legalize(stack);
    }

    /// Classifies `q` against triangle `t`, or returns the edge (as an
    /// index 0..3) that `q` lies strictly beyond.
    fn classify(&self, t: usize, q: [f64; 2]) -> Result<Location, usize> {
        let [a, b, c] = self.triangles[t];
        let o = [
            orient(self.pts[a], self.pts[b], q),
            orient(self.pts[b], self.pts[c], q),
            orient(self.pts[c], self.pts[a], q),
        ];
        let k = (0..3).min_by(|&i, &j| o[i].total_cmp(&o[j])).unwrap_or(0);
        if o[k] < -PREDICATE_EPS {
            return Err(k);
        }
        let on_edges: Vec<usize> = (0..3).filter(|&k| o[k].abs() <= PREDICATE_EPS).collect();
        Ok(match on_edges.as_slice() {
            [] => Location::Inside,
            [k] => Location::OnEdge(*k),
            _ => Location::OnVertex,
        })
    }

    /// Walks from the last located triangle towards point `p`.
    fn locate(&mut self, p: usize) -> Option<(usize, Location)> {
        let q = self.pts[p];
        let mut t = self.last.min(self.triangles.len() - 1);
        for _ in 0..self.triangles.len() {
            match self.classify(t, q) {
                Ok(location) => {
                    self.last = t;
                    return Some((t, location));
                }
                Err(k) => {
                    let [a, b, c] = self.triangles[t];
                    let (u, v) = [(a, b), (b, c), (c, a)][k];
                    match self.edges.get(&(v, u)) {
                        Some(&next) => t = next,
                        None => break,
                    }
                }
            }
        }

        // Near-degenerate predicates can stall the walk
        let found = (0..self.triangles.len())
            .find_map(|t| self.classify(t, q).ok().map(|location| (t, location)));
        if let Some((t, _)) = found {
            self.last = t;
        }
        found
    }

    fn insert(&mut self, p: usize) {
        let Some((t, location)) = self.locate(p) else {
            log::warn!("point {p} could not be located in the hull triangulation; skipped");
            return;
        };
        let [a, b, c] = self.triangles[t];

        match location {
            Location::Inside => {
                self.unlink(t);
                self.replace(t, [a, b, p]);
                self.push([b, c, p]);
                self.push([c, a, p]);
                self.legalize(vec![(a, b), (b, c), (c, a)]);
            }
            Location::OnEdge(k) => {
                let (u, v, w) = match k {
                    0 => (a, b, c),
                    1 => (b, c, a),
                    _ => (c, a, b),
                };
                let across = self.edges.get(&(v, u)).copied();

                self.unlink(t);
                self.replace(t, [u, p, w]);
                self.push([p, v, w]);
                let mut stack = vec![(v, w), (w, u)];

                if let Some(t2) = across {
                    let x = self.opposite(t2, v, u);
                    self.unlink(t2);
                    self.replace(t2, [v, p, x]);
                    self.push([p, u, x]);
                    stack.push((u, x));
                    stack.push((x, v));
                }
                self.legalize(stack);
            }
            Location::OnVertex => {
                log::debug!("point {p} coincides with an existing vertex; skipped");
            }
        }
    }

    /// Flips edges until every edge on the stack satisfies the empty
    /// circumcircle condition.
    fn legalize(&mut self, mut stack: Vec<(usize, usize)>) {
        while let Some((i, j)) = stack.pop() {
            let (Some(&t1), Some(&t2)) = (self.edges.get(&(i, j)), self.edges.get(&(j, i))) else {
                continue;
            };
            let k = self.opposite(t1, i, j);
            let l = self.opposite(t2, j, i);

            if incircle(self.pts[i], self.pts[j], self.pts[k], self.pts[l]) <= PREDICATE_EPS {
                continue;
            }

            self.unlink(t1);
            self.unlink(t2);
            self.replace(t1, [i, l, k]);
            self.replace(t2, [l, j, k]);
            stack.extend([(i, l), (l, j), (j, k), (k, i)]);
        }
    }

    fn neighbors(&self) -> Vec<[Option<usize>; 3]> {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                [
                    self.edges.get(&(c, b)).copied(),
                    self.edges.get(&(a, c)).copied(),
                    self.edges.get(&(b, a)).copied(),
                ]
            })
            .collect()
    }
}

/// Translates and uniformly scales points into the unit square.
fn normalize(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    let scale = (max_x - min_x).max(max_y - min_y);
    let scale = if scale > 0.0 { scale } else { 1.0 };

    points
        .iter()
        .map(|p| [(p[0] - min_x) / scale, (p[1] - min_y) / scale])
        .collect()
}

/// Twice the signed area of (a, b, c); positive when counter-clockwise.
fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Positive when `d` lies inside the circumcircle of counter-clockwise (a, b, c).
fn incircle(a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2]) -> f64 {
    let (adx, ady) = (a[0] - d[0], a[1] - d[1]);
    let (bdx, bdy) = (b[0] - d[0], b[1] - d[1]);
    let (cdx, cdy) = (c[0] - d[0], c[1] - d[1]);

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    ad * (bdx * cdy - cdx * bdy) + bd * (cdx * ady - adx * cdy) + cd * (adx * bdy - bdx * ady)
}

/// Andrew's monotone chain; counter-clockwise, collinear points excluded.
fn convex_hull(pts: &[[f64; 2]]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pts.len()).collect();
    order.sort_by(|&a, &b| {
        pts[a][0]
            .total_cmp(&pts[b][0])
            .then(pts[a][1].total_cmp(&pts[b][1]))
    });

    let half = |indices: &mut dyn Iterator<Item = usize>| {
        let mut chain: Vec<usize> = Vec::new();
        for i in indices {
            while chain.len() >= 2
                && orient(pts[chain[chain.len() - 2]], pts[chain[chain.len() - 1]], pts[i])
                    <= PREDICATE_EPS
            {
                chain.pop();
            }
            chain.push(i);
        }
        chain.pop();
        chain
    };

    let mut hull = half(&mut order.iter().copied());
    hull.extend(half(&mut order.iter().rev().copied()));
    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_delaunay(tri: &Triangulation) {
        let pts = tri.points();
        for &[a, b, c] in tri.triangles() {
            assert!(orient(pts[a], pts[b], pts[c]) > 0.0, "triangle not CCW");
            for (d, &pd) in pts.iter().enumerate() {
                if d == a || d == b || d == c {
                    continue;
                }
                assert!(
                    incircle(pts[a], pts[b], pts[c], pd) <= 1e-9,
                    "point {d} inside circumcircle of ({a}, {b}, {c})"
                );
            }
        }
    }

    fn total_area(tri: &Triangulation) -> f64 {
        let pts = tri.points();
        tri.triangles()
            .iter()
            .map(|&[a, b, c]| 0.5 * orient(pts[a], pts[b], pts[c]))
            .sum()
    }

    fn convex_area(tri: &Triangulation) -> f64 {
        let pts = tri.points();
        let hull = convex_hull(pts);
        (0..hull.len())
            .map(|i| {
                let (a, b) = (pts[hull[i]], pts[hull[(i + 1) % hull.len()]]);
                0.5 * (a[0] * b[1] - b[0] * a[1])
            })
            .sum()
    }

    #[test]
    fn test_unit_square() {
        let tri =
            Triangulation::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
        assert_eq!(tri.triangles().len(), 2);
        assert!((total_area(&tri) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lattice_covers_hull() {
        // Option quotes sit on a strike x expiry lattice: many cocircular quads
        let mut points = Vec::new();
        for i in 0..7 {
            for j in 0..5 {
                points.push([0.8 + 0.05 * f64::from(i), 0.1 * f64::from(j + 1)]);
            }
        }
        let tri = Triangulation::new(points).unwrap();

        assert_eq!(tri.triangles().len(), 2 * 6 * 4);
        assert!((total_area(&tri) - 0.3 * 0.4).abs() < 1e-12);
        assert_delaunay(&tri);
    }

    #[test]
    fn test_scattered_points_are_delaunay() {
        let points: Vec<[f64; 2]> = (0..60)
            .map(|i| {
                let t = f64::from(i);
                [(t * 0.618_034).fract(), (t * 0.414_214 + 0.1).fract()]
            })
            .collect();
        let tri = Triangulation::new(points).unwrap();
        assert_delaunay(&tri);
    }

    #[test]
    fn test_collinear_hull_points_are_vertices() {
        let points = vec![
            [0.0, 0.0],
            [0.5, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
        ];
        let tri = Triangulation::new(points).unwrap();
        let used: std::collections::HashSet<usize> =
            tri.triangles().iter().flatten().copied().collect();
        assert_eq!(used.len(), 5);
        assert!((total_area(&tri) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let points = vec![[0.0, 0.0], [2.0, 0.0], [1.0, 1.5], [1.0, 0.4], [0.3, 0.9]];
        let tri = Triangulation::new(points).unwrap();
        for t in 0..tri.triangles().len() {
            for n in tri.neighbors(t).into_iter().flatten() {
                assert!(tri.neighbors(n).contains(&Some(t)));
            }
        }
    }

    #[test]
    fn test_locate_on_boundary_and_outside() {
        let tri =
            Triangulation::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
        assert!(tri.locate([1.0, 1.0]).is_some());
        assert!(tri.locate([0.5, 0.0]).is_some());
        assert!(tri.locate([1.0 + 1e-6, 0.5]).is_none());

        let (t, bary) = tri.locate([0.25, 0.25]).unwrap();
        assert!((bary.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(t < 2);
    }

    #[test]
    fn test_walk_matches_scan_on_dense_cloud() {
        let points: Vec<[f64; 2]> = (0..2_000)
            .map(|i| {
                let t = f64::from(i);
                [(t * 0.618_034).fract(), (t * 0.414_214 + 0.1).fract()]
            })
            .collect();
        let tri = Triangulation::new(points).unwrap();
        assert!((total_area(&tri) - convex_area(&tri)).abs() < 1e-9);

        for i in 0..40 {
            for j in 0..40 {
                let p = [0.05 + 0.9 * f64::from(i) / 39.0, 0.05 + 0.9 * f64::from(j) / 39.0];
                let (t, bary) = tri.locate(p).expect("interior point not located");
                assert!(tri.scan(p).is_some());
                assert!(bary.iter().all(|&c| c >= -BARYCENTRIC_EPS), "at {p:?}");
                let [a, b, c] = tri.triangles()[t];
                let pts = tri.points();
                for axis in 0..2 {
                    let rebuilt =
                        bary[0] * pts[a][axis] + bary[1] * pts[b][axis] + bary[2] * pts[c][axis];
                    assert!((rebuilt - p[axis]).abs() < 1e-9);
                }
            }
        }
        assert!(tri.locate([1.5, 0.5]).is_none());
        assert!(tri.locate([0.5, -0.5]).is_none());
    }

    #[test]
    fn test_locate_nan_is_outside() {
        let tri =
            Triangulation::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
        assert!(tri.locate([f64::NAN, 0.5]).is_none());
    }

    #[test]
    fn test_vertex_neighbors() {
        let tri =
            Triangulation::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.3, 0.3]]).unwrap();
        let adjacency = tri.vertex_neighbors();
        assert_eq!(adjacency[3], vec![0, 1, 2]);
    }

    #[test]
    fn test_collinear_rejected() {
        let err = Triangulation::new(vec![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0]]).unwrap_err();
        assert!(matches!(err, MathError::DegenerateGeometry { .. }));
    }
}
