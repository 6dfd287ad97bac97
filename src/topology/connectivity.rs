//! Connectivity: every adjacency table and geometric quantity of a mesh.
//!
//! [`Connectivity::build`] runs once per topology. It canonicalises the
//! polygons supplied by a [`MeshLayout`], derives the directed links, orders
//! every element kind row-major (ascending `y`, then `x`, of the defining
//! coordinate), and computes the dual elements. The result is immutable; no
//! query re-runs any part of the derivation.
//!
//! # Conventions
//! - A link points from the lexicographically smaller endpoint (`x` first,
//!   then `y`) to the larger one: "rightward/upward".
//! - One-to-many rows (`links_at_node`, `patches_at_node`, `faces_at_cell`,
//!   `corners_at_cell`, `nodes_at_patch`, `links_at_patch`) are ordered
//!   counter-clockwise starting from east, and padded with [`BAD_INDEX`].
//! - `link_dirs_at_node` is `+1` where the link points into the node and `-1`
//!   where it points out of it.
//! - `patches_at_link` holds `[left, right]` relative to the link direction.
//! - Corners share the patch numbering; cells follow node order and faces
//!   follow link order.

use hashbrown::HashMap;
use itertools::Itertools;

use crate::geometry::metrics::{
    centroid, distance, lexicographic_cmp, midpoint, row_major_cmp, signed_polygon_area,
    sort_ccw_from_east,
};
use crate::mesh_error::MeshError;
use crate::topology::element::{BAD_INDEX, DirTable, ElementKind, IdTable};
use crate::topology::layout::MeshLayout;

/// Immutable primal/dual connectivity and geometry.
#[derive(Clone, Debug)]
pub struct Connectivity {
    xy_of_node: Vec<[f64; 2]>,
    node_at_link_tail: Vec<usize>,
    node_at_link_head: Vec<usize>,
    length_of_link: Vec<f64>,
    links_at_node: IdTable,
    link_dirs_at_node: DirTable,
    adjacent_nodes_at_node: IdTable,
    nodes_at_patch: IdTable,
    links_at_patch: IdTable,
    patches_at_node: IdTable,
    patches_at_link: IdTable,
    node_is_perimeter: Vec<bool>,
    perimeter_nodes: Vec<usize>,
    node_at_cell: Vec<usize>,
    cell_at_node: Vec<usize>,
    link_at_face: Vec<usize>,
    face_at_link: Vec<usize>,
    faces_at_cell: IdTable,
    corners_at_cell: IdTable,
    corners_at_face: IdTable,
    xy_of_corner: Vec<[f64; 2]>,
    area_of_cell: Vec<f64>,
    width_of_face: Vec<f64>,
}

#[inline]
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

impl Connectivity {
    /// Derive the complete primal/dual connectivity of `layout`.
    ///
    /// Fails with [`MeshError::MalformedTopology`] if the layout has fewer
    /// than three nodes, non-finite coordinates, polygons with fewer than
    /// three vertices or zero area, unused nodes, links shared by more than
    /// two polygons, overlapping polygons, or a degenerate dual cell.
    pub fn build<L: MeshLayout + ?Sized>(layout: &L) -> Result<Self, MeshError> {
        let xy = layout.node_coords().to_vec();
        let n_nodes = xy.len();
        if n_nodes < 3 {
            return Err(MeshError::malformed(format!(
                "a mesh needs at least 3 nodes, got {n_nodes}"
            )));
        }
        if let Some(n) = xy.iter().position(|p| !(p[0].is_finite() && p[1].is_finite())) {
            return Err(MeshError::malformed(format!(
                "node {n} has a non-finite coordinate"
            )));
        }

        // ---- patches: CCW vertex order, row-major by centroid ------------
        let mut raw_patches = Vec::with_capacity(layout.patches().len());
        for (i, raw) in layout.patches().iter().enumerate() {
            if raw.len() < 3 {
                return Err(MeshError::malformed(format!(
                    "patch {i} has {} vertices",
                    raw.len()
                )));
            }
            if let Some(&n) = raw.iter().find(|&&n| n >= n_nodes) {
                return Err(MeshError::malformed(format!(
                    "patch {i} references missing node {n}"
                )));
            }
            let mut nodes = raw.clone();
            let verts: Vec<[f64; 2]> = nodes.iter().map(|&n| xy[n]).collect();
            let c = centroid(&verts);
            sort_ccw_from_east(c, &mut nodes, |n| xy[n]);
            let verts: Vec<[f64; 2]> = nodes.iter().map(|&n| xy[n]).collect();
            if signed_polygon_area(&verts) <= 0.0 {
                return Err(MeshError::malformed(format!("patch {i} has no area")));
            }
            raw_patches.push((c, nodes));
        }
        if raw_patches.is_empty() {
            return Err(MeshError::malformed("layout produced no patches"));
        }
        raw_patches.sort_by(|a, b| row_major_cmp(a.0, b.0));
        let (patch_centroids, patches): (Vec<[f64; 2]>, Vec<Vec<usize>>) =
            raw_patches.into_iter().unzip();
        let n_patches = patches.len();

        // ---- links: one per distinct patch edge, oriented, row-major -------
        let mut uses: HashMap<(usize, usize), u8> = HashMap::new();
        let mut pairs: Vec<[usize; 2]> = Vec::new();
        for nodes in &patches {
            for (&a, &b) in nodes.iter().circular_tuple_windows() {
                let count = uses.entry(edge_key(a, b)).or_insert(0);
                *count += 1;
                match *count {
                    1 => {
                        if lexicographic_cmp(xy[a], xy[b]).is_le() {
                            pairs.push([a, b]);
                        } else {
                            pairs.push([b, a]);
                        }
                    }
                    2 => {}
                    _ => {
                        return Err(MeshError::malformed(format!(
                            "link {a}-{b} is shared by more than two patches"
                        )));
                    }
                }
            }
        }
        pairs.sort_by(|p, q| {
            row_major_cmp(midpoint(xy[p[0]], xy[p[1]]), midpoint(xy[q[0]], xy[q[1]]))
        });
        let n_links = pairs.len();
        let link_of: HashMap<(usize, usize), usize> = pairs
            .iter()
            .enumerate()
            .map(|(l, &[t, h])| (edge_key(t, h), l))
            .collect();
        let node_at_link_tail: Vec<usize> = pairs.iter().map(|p| p[0]).collect();
        let node_at_link_head: Vec<usize> = pairs.iter().map(|p| p[1]).collect();
        let length_of_link: Vec<f64> = pairs.iter().map(|p| distance(xy[p[0]], xy[p[1]])).collect();

        // ---- node -> link tables -------------------------------------------
        let mut link_rows: Vec<Vec<usize>> = vec![Vec::new(); n_nodes];
        for (l, &[t, h]) in pairs.iter().enumerate() {
            link_rows[t].push(l);
            link_rows[h].push(l);
        }
        if let Some(n) = link_rows.iter().position(|r| r.is_empty()) {
            return Err(MeshError::malformed(format!(
                "node {n} is not a vertex of any patch"
            )));
        }
        let other_end = |l: usize, n: usize| {
            if node_at_link_tail[l] == n {
                node_at_link_head[l]
            } else {
                node_at_link_tail[l]
            }
        };
        for (n, row) in link_rows.iter_mut().enumerate() {
            sort_ccw_from_east(xy[n], row, |l| xy[other_end(l, n)]);
        }
        let dir_rows: Vec<Vec<i8>> = link_rows
            .iter()
            .enumerate()
            .map(|(n, row)| {
                row.iter()
                    .map(|&l| if node_at_link_head[l] == n { 1 } else { -1 })
                    .collect()
            })
            .collect();
        let adjacent_rows: Vec<Vec<usize>> = link_rows
            .iter()
            .enumerate()
            .map(|(n, row)| row.iter().map(|&l| other_end(l, n)).collect())
            .collect();
        let links_at_node = IdTable::from_rows(&link_rows, 0, BAD_INDEX);
        let link_dirs_at_node = DirTable::from_rows(&dir_rows, links_at_node.width(), 0);
        let adjacent_nodes_at_node = IdTable::from_rows(&adjacent_rows, 0, BAD_INDEX);

        // ---- patch <-> link tables -----------------------------------------
        let mut left = vec![BAD_INDEX; n_links];
        let mut right = vec![BAD_INDEX; n_links];
        let mut patch_link_rows = Vec::with_capacity(n_patches);
        for (p, nodes) in patches.iter().enumerate() {
            let mut row = Vec::with_capacity(nodes.len());
            for (&a, &b) in nodes.iter().circular_tuple_windows() {
                let l = link_of[&edge_key(a, b)];
                let side = if node_at_link_tail[l] == a {
                    &mut left[l]
                } else {
                    &mut right[l]
                };
                if *side != BAD_INDEX {
                    return Err(MeshError::malformed(format!(
                        "patches {} and {p} overlap along link {l}",
                        *side
                    )));
                }
                *side = p;
                row.push(l);
            }
            sort_ccw_from_east(patch_centroids[p], &mut row, |l| {
                midpoint(xy[node_at_link_tail[l]], xy[node_at_link_head[l]])
            });
            patch_link_rows.push(row);
        }
        let patch_pairs: Vec<[usize; 2]> = (0..n_links).map(|l| [left[l], right[l]]).collect();

        let mut node_patch_rows: Vec<Vec<usize>> = vec![Vec::new(); n_nodes];
        for (p, nodes) in patches.iter().enumerate() {
            for &n in nodes {
                node_patch_rows[n].push(p);
            }
        }
        for (n, row) in node_patch_rows.iter_mut().enumerate() {
            sort_ccw_from_east(xy[n], row, |p| patch_centroids[p]);
        }

        // ---- perimeter -----------------------------------------------------
        let mut node_is_perimeter = vec![false; n_nodes];
        for l in 0..n_links {
            if left[l] == BAD_INDEX || right[l] == BAD_INDEX {
                node_is_perimeter[node_at_link_tail[l]] = true;
                node_is_perimeter[node_at_link_head[l]] = true;
            }
        }
        let perimeter_nodes = walk_perimeter(&patches, &link_of, &left, &right, &node_is_perimeter);

        // ---- cells ---------------------------------------------------------
        let mut cell_at_node = vec![BAD_INDEX; n_nodes];
        let mut node_at_cell = Vec::new();
        for n in 0..n_nodes {
            if !node_is_perimeter[n] {
                cell_at_node[n] = node_at_cell.len();
                node_at_cell.push(n);
            }
        }

        // ---- corners -------------------------------------------------------
        let xy_of_corner: Vec<[f64; 2]> = patches
            .iter()
            .map(|nodes| {
                let verts: Vec<[f64; 2]> = nodes.iter().map(|&n| xy[n]).collect();
                layout.corner_position(&verts)
            })
            .collect();

        // ---- faces ---------------------------------------------------------
        let mut face_at_link = vec![BAD_INDEX; n_links];
        let mut link_at_face = Vec::new();
        let mut corner_rows = Vec::new();
        let mut width_of_face = Vec::new();
        for l in 0..n_links {
            let (t, h) = (node_at_link_tail[l], node_at_link_head[l]);
            let bounded = left[l] != BAD_INDEX && right[l] != BAD_INDEX;
            let on_cell = cell_at_node[t] != BAD_INDEX || cell_at_node[h] != BAD_INDEX;
            if !(bounded && on_cell) {
                continue;
            }
            let corners = [xy_of_corner[left[l]], xy_of_corner[right[l]]];
            let width = layout.face_width(xy[t], xy[h], corners);
            if !(width.is_finite() && width >= 0.0) {
                return Err(MeshError::malformed(format!(
                    "face across link {l} has invalid width {width}"
                )));
            }
            face_at_link[l] = link_at_face.len();
            link_at_face.push(l);
            corner_rows.push([left[l], right[l]]);
            width_of_face.push(width);
        }

        // ---- cell boundaries and areas ------------------------------------
        let mut face_rows = Vec::with_capacity(node_at_cell.len());
        let mut cell_corner_rows = Vec::with_capacity(node_at_cell.len());
        let mut area_of_cell = Vec::with_capacity(node_at_cell.len());
        for &n in &node_at_cell {
            let faces: Vec<usize> = link_rows[n]
                .iter()
                .map(|&l| face_at_link[l])
                .filter(|&f| f != BAD_INDEX)
                .collect();
            let corners = node_patch_rows[n].clone();
            let polygon: Vec<[f64; 2]> = corners.iter().map(|&c| xy_of_corner[c]).collect();
            let area = layout.cell_area(xy[n], &polygon);
            if !(area.is_finite() && area > 0.0) {
                return Err(MeshError::malformed(format!(
                    "cell around node {n} has invalid area {area}"
                )));
            }
            face_rows.push(faces);
            cell_corner_rows.push(corners);
            area_of_cell.push(area);
        }

        let conn = Self {
            node_at_link_tail,
            node_at_link_head,
            length_of_link,
            links_at_node,
            link_dirs_at_node,
            adjacent_nodes_at_node,
            nodes_at_patch: IdTable::from_rows(&patches, 0, BAD_INDEX),
            links_at_patch: IdTable::from_rows(&patch_link_rows, 0, BAD_INDEX),
            patches_at_node: IdTable::from_rows(&node_patch_rows, 0, BAD_INDEX),
            patches_at_link: IdTable::from_rows(&patch_pairs, 2, BAD_INDEX),
            node_is_perimeter,
            perimeter_nodes,
            node_at_cell,
            cell_at_node,
            link_at_face,
            face_at_link,
            faces_at_cell: IdTable::from_rows(&face_rows, 0, BAD_INDEX),
            corners_at_cell: IdTable::from_rows(&cell_corner_rows, 0, BAD_INDEX),
            corners_at_face: IdTable::from_rows(&corner_rows, 2, BAD_INDEX),
            xy_of_corner,
            area_of_cell,
            width_of_face,
            xy_of_node: xy,
        };
        log::debug!(
            "built {} connectivity: {} nodes, {} links, {} patches, {} cells, {} faces, {} corners",
            layout.describe(),
            conn.number_of_nodes(),
            conn.number_of_links(),
            conn.number_of_patches(),
            conn.number_of_cells(),
            conn.number_of_faces(),
            conn.number_of_corners(),
        );
        Ok(conn)
    }

    /// Number of elements of `kind`.
    pub fn count(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Node => self.number_of_nodes(),
            ElementKind::Link => self.number_of_links(),
            ElementKind::Patch => self.number_of_patches(),
            ElementKind::Cell => self.number_of_cells(),
            ElementKind::Face => self.number_of_faces(),
            ElementKind::Corner => self.number_of_corners(),
        }
    }

    /// Number of nodes.
    pub fn number_of_nodes(&self) -> usize {
        self.xy_of_node.len()
    }

    /// Number of links.
    pub fn number_of_links(&self) -> usize {
        self.node_at_link_tail.len()
    }

    /// Number of patches.
    pub fn number_of_patches(&self) -> usize {
        self.xy_of_corner.len()
    }

    /// Number of cells, one per non-perimeter node.
    pub fn number_of_cells(&self) -> usize {
        self.node_at_cell.len()
    }

    /// Number of faces.
    pub fn number_of_faces(&self) -> usize {
        self.link_at_face.len()
    }

    /// Number of corners, equal to the number of patches.
    pub fn number_of_corners(&self) -> usize {
        self.xy_of_corner.len()
    }

    /// `[x, y]` of every node.
    pub fn xy_of_node(&self) -> &[[f64; 2]] {
        &self.xy_of_node
    }

    /// `x` of every node.
    pub fn x_of_node(&self) -> Vec<f64> {
        self.xy_of_node.iter().map(|p| p[0]).collect()
    }

    /// `y` of every node.
    pub fn y_of_node(&self) -> Vec<f64> {
        self.xy_of_node.iter().map(|p| p[1]).collect()
    }

    /// Tail node of every link.
    pub fn node_at_link_tail(&self) -> &[usize] {
        &self.node_at_link_tail
    }

    /// Head node of every link; always after the tail in `(x, y)` order.
    pub fn node_at_link_head(&self) -> &[usize] {
        &self.node_at_link_head
    }

    /// `[tail, head]` of link `l`.
    #[inline]
    pub fn nodes_at_link(&self, l: usize) -> [usize; 2] {
        [self.node_at_link_tail[l], self.node_at_link_head[l]]
    }

    /// Length of every link.
    pub fn length_of_link(&self) -> &[f64] {
        &self.length_of_link
    }

    /// Midpoint of link `l`.
    pub fn midpoint_of_link(&self, l: usize) -> [f64; 2] {
        midpoint(
            self.xy_of_node[self.node_at_link_tail[l]],
            self.xy_of_node[self.node_at_link_head[l]],
        )
    }

    /// Links around every node, counter-clockwise from east.
    pub fn links_at_node(&self) -> &IdTable {
        &self.links_at_node
    }

    /// `+1` where the matching `links_at_node` entry points into the node,
    /// `-1` where it points out, `0` on padding.
    pub fn link_dirs_at_node(&self) -> &DirTable {
        &self.link_dirs_at_node
    }

    /// Far endpoint of every entry of `links_at_node`.
    pub fn adjacent_nodes_at_node(&self) -> &IdTable {
        &self.adjacent_nodes_at_node
    }

    /// Vertices of every patch, counter-clockwise from east of its centroid.
    pub fn nodes_at_patch(&self) -> &IdTable {
        &self.nodes_at_patch
    }

    /// Edges of every patch, counter-clockwise from east of its centroid.
    pub fn links_at_patch(&self) -> &IdTable {
        &self.links_at_patch
    }

    /// Patches around every node, counter-clockwise from east.
    pub fn patches_at_node(&self) -> &IdTable {
        &self.patches_at_node
    }

    /// `[left, right]` patch of every link.
    pub fn patches_at_link(&self) -> &IdTable {
        &self.patches_at_link
    }

    /// `true` for nodes on a link with only one patch.
    pub fn node_is_perimeter(&self) -> &[bool] {
        &self.node_is_perimeter
    }

    /// Rim nodes, counter-clockwise starting from the lowest node id.
    pub fn perimeter_nodes(&self) -> &[usize] {
        &self.perimeter_nodes
    }

    /// Node owning every cell.
    pub fn node_at_cell(&self) -> &[usize] {
        &self.node_at_cell
    }

    /// Cell of every node, [`BAD_INDEX`] on the perimeter.
    pub fn cell_at_node(&self) -> &[usize] {
        &self.cell_at_node
    }

    /// `true` unless `n` is a perimeter node.
    #[inline]
    pub fn node_has_cell(&self, n: usize) -> bool {
        self.cell_at_node[n] != BAD_INDEX
    }

    /// Link crossed by every face.
    pub fn link_at_face(&self) -> &[usize] {
        &self.link_at_face
    }

    /// Face of every link, [`BAD_INDEX`] where no cell boundary crosses it.
    pub fn face_at_link(&self) -> &[usize] {
        &self.face_at_link
    }

    /// Faces bounding every cell, in the order of the node's links.
    pub fn faces_at_cell(&self) -> &IdTable {
        &self.faces_at_cell
    }

    /// Corners bounding every cell, counter-clockwise.
    pub fn corners_at_cell(&self) -> &IdTable {
        &self.corners_at_cell
    }

    /// `[left, right]` corner of every face, matching `patches_at_link`.
    pub fn corners_at_face(&self) -> &IdTable {
        &self.corners_at_face
    }

    /// `[x, y]` of every corner.
    pub fn xy_of_corner(&self) -> &[[f64; 2]] {
        &self.xy_of_corner
    }

    /// `x` of every corner.
    pub fn x_of_corner(&self) -> Vec<f64> {
        self.xy_of_corner.iter().map(|p| p[0]).collect()
    }

    /// `y` of every corner.
    pub fn y_of_corner(&self) -> Vec<f64> {
        self.xy_of_corner.iter().map(|p| p[1]).collect()
    }

    /// Corner dual to patch `p` (corners share the patch numbering).
    #[inline]
    pub fn corner_at_patch(&self, p: usize) -> usize {
        p
    }

    /// Patch dual to corner `c`.
    #[inline]
    pub fn patch_at_corner(&self, c: usize) -> usize {
        c
    }

    /// Area of every cell.
    pub fn area_of_cell(&self) -> &[f64] {
        &self.area_of_cell
    }

    /// Cell area at every node, `0.0` on the perimeter.
    pub fn cell_area_at_node(&self) -> Vec<f64> {
        self.cell_at_node
            .iter()
            .map(|&c| if c == BAD_INDEX { 0.0 } else { self.area_of_cell[c] })
            .collect()
    }

    /// Width of every face.
    pub fn width_of_face(&self) -> &[f64] {
        &self.width_of_face
    }

    /// Face width of every link, `0.0` where the link has no face.
    pub fn face_width_at_link(&self) -> Vec<f64> {
        self.face_at_link
            .iter()
            .map(|&f| if f == BAD_INDEX { 0.0 } else { self.width_of_face[f] })
            .collect()
    }
}

/// Walk the rim counter-clockwise. Rim links keep their patch on the left
/// when traversed in the patch's CCW order, so each rim node has exactly one
/// successor on a manifold boundary. Pinched rims fall back to id order.
fn walk_perimeter(
    patches: &[Vec<usize>],
    link_of: &HashMap<(usize, usize), usize>,
    left: &[usize],
    right: &[usize],
    node_is_perimeter: &[bool],
) -> Vec<usize> {
    let ascending: Vec<usize> = (0..node_is_perimeter.len())
        .filter(|&n| node_is_perimeter[n])
        .collect();
    let mut next: HashMap<usize, usize> = HashMap::new();
    for nodes in patches {
        for (&a, &b) in nodes.iter().circular_tuple_windows() {
            let l = link_of[&edge_key(a, b)];
            if (left[l] == BAD_INDEX || right[l] == BAD_INDEX) && next.insert(a, b).is_some() {
                log::warn!("perimeter is pinched at node {a}; using id order");
                return ascending;
            }
        }
    }
    if ascending.is_empty() {
        return ascending;
    }
    let start = ascending[0];
    let mut walk = Vec::with_capacity(ascending.len());
    let mut current = start;
    loop {
        walk.push(current);
        match next.get(&current) {
            Some(&n) if n == start => break,
            Some(&n) if walk.len() < ascending.len() => current = n,
            _ => {
                log::warn!("perimeter walk did not close; using id order");
                return ascending;
            }
        }
    }
    if walk.len() != ascending.len() {
        log::warn!("perimeter has several loops; using id order");
        return ascending;
    }
    walk
}
