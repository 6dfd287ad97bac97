//! Incremental Delaunay triangulation of a planar point set.
//!
//! Bowyer–Watson insertion on exact orientation and in-circle predicates.
//! The convex hull is closed by ghost triangles sharing a vertex at
//! infinity, so a point outside the current hull extends it directly and no
//! enclosing triangle has to be carved away afterwards. A point exactly on a
//! circumcircle does not conflict with that triangle.

use hashbrown::{HashMap, HashSet};

use crate::geometry::metrics::{REL_EPS, in_circumcircle, lexicographic_cmp, orient2d};
use crate::mesh_error::MeshError;

/// Vertex at infinity shared by every ghost triangle.
const GHOST: usize = usize::MAX;

/// Validate a point cloud for triangulation.
///
/// Requires at least three finite, pairwise distinct points that are not all
/// collinear.
pub fn validate_points(points: &[[f64; 2]]) -> Result<(), MeshError> {
    if points.len() < 3 {
        return Err(MeshError::malformed(format!(
            "triangulation needs at least 3 points, got {}",
            points.len()
        )));
    }
    if let Some(i) = points
        .iter()
        .position(|p| !(p[0].is_finite() && p[1].is_finite()))
    {
        return Err(MeshError::malformed(format!(
            "point {i} has a non-finite coordinate"
        )));
    }
    let mut sorted: Vec<usize> = (0..points.len()).collect();
    sorted.sort_by(|&a, &b| lexicographic_cmp(points[a], points[b]));
    for w in sorted.windows(2) {
        if points[w[0]] == points[w[1]] {
            return Err(MeshError::malformed(format!(
                "points {} and {} coincide",
                w[0].min(w[1]),
                w[0].max(w[1])
            )));
        }
    }
    let a = points[sorted[0]];
    let b = points[sorted[sorted.len() - 1]];
    let scale = extent(points).powi(2);
    if points
        .iter()
        .all(|&p| orient2d(a, b, p).abs() <= REL_EPS * scale)
    {
        return Err(MeshError::malformed("all points are collinear"));
    }
    Ok(())
}

fn extent(points: &[[f64; 2]]) -> f64 {
    let (mut lo, mut hi) = ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]);
    for p in points {
        for k in 0..2 {
            lo[k] = lo[k].min(p[k]);
            hi[k] = hi[k].max(p[k]);
        }
    }
    (hi[0] - lo[0]).max(hi[1] - lo[1])
}

#[inline]
fn edges_of(t: [usize; 3]) -> [(usize, usize); 3] {
    [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])]
}

/// `q` lies strictly inside segment `ab`, given that the three are collinear.
fn strictly_between(a: [f64; 2], b: [f64; 2], q: [f64; 2]) -> bool {
    (q[0] - a[0]) * (b[0] - q[0]) + (q[1] - a[1]) * (b[1] - q[1]) > 0.0
}

/// Counter-clockwise triangles with a directed-edge index.
///
/// A ghost triangle `[a, b, GHOST]` closes the hull edge `a -> b`; the
/// outside of the hull lies to its left. Every directed edge has exactly one
/// owner, and the twin `b -> a` of an edge `a -> b` always exists.
struct Triangulation<'a> {
    pts: &'a [[f64; 2]],
    tris: Vec<Option<[usize; 3]>>,
    owner: HashMap<(usize, usize), usize>,
}

impl<'a> Triangulation<'a> {
    /// Start from the counter-clockwise triangle `abc` and its three ghosts.
    fn seed(pts: &'a [[f64; 2]], [a, b, c]: [usize; 3]) -> Self {
        let mut tri = Self {
            pts,
            tris: Vec::new(),
            owner: HashMap::new(),
        };
        for t in [[a, b, c], [b, a, GHOST], [c, b, GHOST], [a, c, GHOST]] {
            tri.add(t);
        }
        tri
    }

    fn add(&mut self, t: [usize; 3]) {
        // Ghost vertex last, keeping the cyclic order.
        let t = match t.iter().position(|&v| v == GHOST) {
            Some(0) => [t[1], t[2], t[0]],
            Some(1) => [t[2], t[0], t[1]],
            _ => t,
        };
        let id = self.tris.len();
        for e in edges_of(t) {
            self.owner.insert(e, id);
        }
        self.tris.push(Some(t));
    }

    fn remove(&mut self, id: usize) {
        if let Some(t) = self.tris[id].take() {
            for e in edges_of(t) {
                self.owner.remove(&e);
            }
        }
    }

    fn conflicts(&self, t: [usize; 3], p: usize) -> bool {
        let q = self.pts[p];
        if t[2] == GHOST {
            let (a, b) = (self.pts[t[0]], self.pts[t[1]]);
            let o = orient2d(a, b, q);
            o > 0.0 || (o == 0.0 && strictly_between(a, b, q))
        } else {
            in_circumcircle(self.pts[t[0]], self.pts[t[1]], self.pts[t[2]], q)
        }
    }

    /// A triangle in conflict with `p`: a real triangle whose closure holds
    /// `p`, or a ghost whose hull edge `p` sees.
    fn locate(&self, p: usize) -> Option<usize> {
        let q = self.pts[p];
        self.tris.iter().position(|slot| match *slot {
            Some(t) if t[2] == GHOST => self.conflicts(t, p),
            Some([a, b, c]) => {
                let (a, b, c) = (self.pts[a], self.pts[b], self.pts[c]);
                orient2d(a, b, q) >= 0.0 && orient2d(b, c, q) >= 0.0 && orient2d(c, a, q) >= 0.0
            }
            None => false,
        })
    }

    fn insert(&mut self, p: usize) -> Result<(), MeshError> {
        let start = self
            .locate(p)
            .ok_or_else(|| MeshError::malformed(format!("point {p} could not be located")))?;

        // Grow the cavity outward from `start` through conflicting neighbours.
        let mut cavity: HashSet<usize> = HashSet::new();
        cavity.insert(start);
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(t) = self.tris[id] else { continue };
            for (u, v) in edges_of(t) {
                let Some(&nb) = self.owner.get(&(v, u)) else {
                    continue;
                };
                if cavity.contains(&nb) {
                    continue;
                }
                if let Some(nt) = self.tris[nb] {
                    if self.conflicts(nt, p) {
                        cavity.insert(nb);
                        stack.push(nb);
                    }
                }
            }
        }

        // Every real boundary edge must face `p`; absorb the neighbour
        // behind any edge that does not.
        let mut boundary = loop {
            let mut boundary = Vec::new();
            let mut blocked = None;
            let mut ids: Vec<usize> = cavity.iter().copied().collect();
            ids.sort_unstable();
            for id in ids {
                let Some(t) = self.tris[id] else { continue };
                for (u, v) in edges_of(t) {
                    let twin = self.owner.get(&(v, u)).copied();
                    if twin.is_some_and(|nb| cavity.contains(&nb)) {
                        continue;
                    }
                    let real = u != GHOST && v != GHOST;
                    if blocked.is_none()
                        && real
                        && orient2d(self.pts[u], self.pts[v], self.pts[p]) <= 0.0
                    {
                        blocked = Some((u, v, twin));
                    }
                    boundary.push((u, v));
                }
            }
            match blocked {
                None => break boundary,
                Some((_, _, Some(nb))) if self.tris[nb].is_some_and(|t| t[2] != GHOST) => {
                    cavity.insert(nb);
                }
                Some((u, v, _)) => {
                    return Err(MeshError::malformed(format!(
                        "cavity of point {p} is not star-shaped at edge {u}-{v}"
                    )));
                }
            }
        };

        let mut removed: Vec<usize> = cavity.into_iter().collect();
        removed.sort_unstable();
        for id in removed {
            self.remove(id);
        }
        boundary.sort_unstable();
        for (u, v) in boundary {
            self.add([u, v, p]);
        }
        Ok(())
    }

    fn into_triangles(self) -> Vec<[usize; 3]> {
        self.tris
            .into_iter()
            .flatten()
            .filter(|t| t[2] != GHOST)
            .collect()
    }
}

/// Triangulate `points`, returning counter-clockwise vertex triples.
///
/// Points are inserted in the given order, so the result is deterministic
/// for a given input. Every point is a vertex of at least one triangle.
pub fn triangulate(points: &[[f64; 2]]) -> Result<Vec<[usize; 3]>, MeshError> {
    validate_points(points)?;
    let c = (2..points.len())
        .find(|&k| orient2d(points[0], points[1], points[k]) != 0.0)
        .ok_or_else(|| MeshError::malformed("all points are collinear"))?;
    let seed = if orient2d(points[0], points[1], points[c]) > 0.0 {
        [0, 1, c]
    } else {
        [1, 0, c]
    };
    let mut tri = Triangulation::seed(points, seed);
    for p in (2..points.len()).filter(|&p| p != c) {
        tri.insert(p)?;
    }
    Ok(tri.into_triangles())
}
