//! Dupuit–Forchheimer groundwater flow with seepage and return flow.
//!
//! The state is the water-table elevation at nodes. Each update computes the
//! hydraulic gradient on links, the upwind saturated thickness as link
//! transmissivity, the resulting specific discharge and its divergence, and
//! then advances the aquifer thickness of core nodes explicitly. Water that
//! cannot be stored (seepage near saturation, or thickness above the land
//! surface) leaves through the surface and is accounted for in the
//! [`MassBalance`].

use crate::algs::calculus::{calc_flux_div_at_node, calc_grad_at_link};
use crate::algs::mappers::{map_mean_of_link_nodes_to_link, map_value_at_max_node_to_link};
use crate::data::field::FieldStore;
use crate::mesh::Mesh;
use crate::mesh_error::MeshError;
use crate::physics::config::{DupuitConfig, is_unit_coefficient};
use crate::physics::mass_balance::MassBalance;
use crate::topology::connectivity::Connectivity;
use crate::topology::element::ElementKind;
use crate::topology::status::{LinkStatus, NodeStatus, StatusTables};

pub const TOPOGRAPHIC_ELEVATION: &str = "topographic__elevation";
pub const AQUIFER_BASE_ELEVATION: &str = "aquifer_base__elevation";
pub const WATER_TABLE_ELEVATION: &str = "water_table__elevation";
pub const AQUIFER_THICKNESS: &str = "aquifer__thickness";
pub const HYDRAULIC_CONDUCTIVITY: &str = "hydraulic_conductivity";
pub const POROSITY: &str = "porosity";
pub const RECHARGE_RATE: &str = "recharge__rate";
pub const REGULARIZATION_SCALE: &str = "regularization__scale";
pub const SURFACE_WATER_DISCHARGE: &str = "surface_water__specific_discharge";
pub const HYDRAULIC_GRADIENT: &str = "hydraulic__gradient";
pub const GROUNDWATER_VELOCITY: &str = "groundwater__velocity";
pub const AQUIFER_TRANSMISSIVITY: &str = "aquifer__transmissivity";
pub const GROUNDWATER_DISCHARGE: &str = "groundwater__specific_discharge";
pub const PRESCRIBED_DISCHARGE: &str = "groundwater__prescribed_discharge";

const LINK_OUTPUTS: [&str; 4] = [
    HYDRAULIC_GRADIENT,
    GROUNDWATER_VELOCITY,
    AQUIFER_TRANSMISSIVITY,
    GROUNDWATER_DISCHARGE,
];

/// Read-only node and link inputs of one step.
struct Params<'a> {
    elev: &'a [f64],
    base: &'a [f64],
    porosity: &'a [f64],
    recharge: &'a [f64],
    regularization: &'a [f64],
    prescribed: &'a [f64],
    k_link: Vec<f64>,
    n_link: Vec<f64>,
}

impl<'a> Params<'a> {
    fn gather(
        conn: &Connectivity,
        status: &StatusTables,
        fields: &'a FieldStore,
    ) -> Result<Self, MeshError> {
        use ElementKind::{Link, Node};
        let k = fields.field(Node, HYDRAULIC_CONDUCTIVITY)?;
        let porosity = fields.field(Node, POROSITY)?;
        let regularization = fields.field(Node, REGULARIZATION_SCALE)?;
        if let Some(n) = k.iter().position(|v| !(v.is_finite() && *v >= 0.0)) {
            return Err(MeshError::InvalidParameter(format!(
                "hydraulic conductivity at node {n} is {}",
                k[n]
            )));
        }
        for &n in status.core_nodes() {
            if !is_unit_coefficient(porosity[n]) {
                return Err(MeshError::InvalidParameter(format!(
                    "porosity at core node {n} is {}",
                    porosity[n]
                )));
            }
            if !(regularization[n].is_finite() && regularization[n] > 0.0) {
                return Err(MeshError::InvalidParameter(format!(
                    "regularization scale at core node {n} is {}",
                    regularization[n]
                )));
            }
        }
        Ok(Self {
            elev: fields.field(Node, TOPOGRAPHIC_ELEVATION)?,
            base: fields.field(Node, AQUIFER_BASE_ELEVATION)?,
            porosity,
            recharge: fields.field(Node, RECHARGE_RATE)?,
            regularization,
            prescribed: fields.field(Link, PRESCRIBED_DISCHARGE)?,
            k_link: map_mean_of_link_nodes_to_link(conn, k, None)?.into_vec(),
            n_link: map_mean_of_link_nodes_to_link(conn, porosity, None)?.into_vec(),
        })
    }
}

/// Scratch copy of everything a step writes. Committed to the field store
/// only once the whole step has succeeded.
struct State {
    wt: Vec<f64>,
    thickness: Vec<f64>,
    grad: Vec<f64>,
    vel: Vec<f64>,
    trans: Vec<f64>,
    q: Vec<f64>,
    div: Vec<f64>,
    /// Surface outflow depth accumulated per node.
    surface: Vec<f64>,
}

impl State {
    fn load(conn: &Connectivity, fields: &FieldStore) -> Result<Self, MeshError> {
        let n_nodes = conn.number_of_nodes();
        let n_links = conn.number_of_links();
        Ok(Self {
            wt: fields.field(ElementKind::Node, WATER_TABLE_ELEVATION)?.to_vec(),
            thickness: fields.field(ElementKind::Node, AQUIFER_THICKNESS)?.to_vec(),
            grad: vec![0.0; n_links],
            vel: vec![0.0; n_links],
            trans: vec![0.0; n_links],
            q: vec![0.0; n_links],
            div: vec![0.0; n_nodes],
            surface: vec![0.0; n_nodes],
        })
    }

    /// Gradient, transmissivity, discharge and divergence for the current
    /// water table.
    fn compute_fluxes(
        &mut self,
        conn: &Connectivity,
        status: &StatusTables,
        p: &Params<'_>,
    ) -> Result<(), MeshError> {
        for ((h, &wt), &base) in self.thickness.iter_mut().zip(&self.wt).zip(p.base) {
            *h = (wt - base).max(0.0);
        }
        calc_grad_at_link(conn, &self.wt, Some(self.grad.as_mut_slice()))?;
        map_value_at_max_node_to_link(conn, &self.wt, &self.thickness, Some(self.trans.as_mut_slice()))?;
        for (l, link_status) in status.status_at_link().iter().enumerate() {
            match link_status {
                LinkStatus::Active => {
                    self.vel[l] = -p.k_link[l] * self.grad[l];
                    self.q[l] = self.trans[l] * self.vel[l];
                }
                LinkStatus::Fixed => {
                    self.q[l] = p.prescribed[l];
                    self.vel[l] = if self.trans[l] > 0.0 {
                        self.q[l] / self.trans[l]
                    } else {
                        0.0
                    };
                }
                LinkStatus::Inactive => {
                    self.grad[l] = 0.0;
                    self.vel[l] = 0.0;
                    self.q[l] = 0.0;
                }
            }
        }
        calc_flux_div_at_node(conn, &self.q, Some(self.div.as_mut_slice()))?;
        Ok(())
    }

    /// Largest stable substep for the current fluxes: `(advective, diffusive)`.
    /// Either is infinite when no active link constrains it.
    fn stability_bounds(
        &self,
        conn: &Connectivity,
        status: &StatusTables,
        p: &Params<'_>,
    ) -> (f64, f64) {
        let length = conn.length_of_link();
        let mut advective = f64::INFINITY;
        let mut diffusive = f64::INFINITY;
        for &l in status.active_links() {
            let speed = p.k_link[l] * self.grad[l].abs();
            if speed > 0.0 {
                advective = advective.min(p.n_link[l] * length[l] / speed);
            }
            let diffusivity = p.k_link[l] * self.trans[l];
            if diffusivity > 0.0 {
                diffusive = diffusive.min(p.n_link[l] * length[l] * length[l] / (4.0 * diffusivity));
            }
        }
        (advective, diffusive)
    }

    /// Explicit update of core-node thickness over `dt`, using the fluxes
    /// from the last [`State::compute_fluxes`].
    fn advance(
        &mut self,
        conn: &Connectivity,
        status: &StatusTables,
        p: &Params<'_>,
        dt: f64,
        balance: &mut MassBalance,
    ) {
        let area = conn.area_of_cell();
        let cell_at_node = conn.cell_at_node();
        let mut dried = 0usize;
        for &n in status.core_nodes() {
            let a = area[cell_at_node[n]];
            let capacity = (p.elev[n] - p.base[n]).max(0.0);
            let saturation = if capacity > 0.0 {
                (self.thickness[n] / capacity).min(1.0)
            } else {
                1.0
            };
            let recharge = p.recharge[n];
            let seepage = (-(1.0 - saturation) / p.regularization[n]).exp()
                * (recharge - self.div[n]).max(0.0);

            let mut h =
                self.thickness[n] + (recharge - seepage - self.div[n]) / p.porosity[n] * dt;
            let mut surface = seepage * dt;
            if h < 0.0 {
                dried += 1;
                h = 0.0;
            } else if h > capacity {
                surface += (h - capacity) * p.porosity[n];
                h = capacity;
            }
            self.thickness[n] = h;
            self.wt[n] = p.base[n] + h;
            self.surface[n] += surface;
            balance.recharge_in += recharge * a * dt;
            balance.surface_out += surface * a;
        }
        if dried > 0 {
            log::warn!("{dried} core nodes dried out; thickness clamped to zero");
        }

        let is_core = |n: usize| status.status_at_node()[n] == NodeStatus::Core;
        let width = conn.width_of_face();
        for (f, &l) in conn.link_at_face().iter().enumerate() {
            let [t, h] = conn.nodes_at_link(l);
            let outflow = match (is_core(t), is_core(h)) {
                (true, false) => self.q[l],
                (false, true) => -self.q[l],
                _ => continue,
            };
            balance.groundwater_out += outflow * width[f] * dt;
        }
    }

    /// Move the results into the field store. `elapsed` converts the
    /// accumulated surface depth into a rate.
    fn commit(self, fields: &mut FieldStore, elapsed: f64) -> Result<(), MeshError> {
        use ElementKind::{Link, Node};
        let surface_rate = self.surface.iter().map(|d| d / elapsed).collect();
        fields.add_field(Node, WATER_TABLE_ELEVATION, self.wt, true)?;
        fields.add_field(Node, AQUIFER_THICKNESS, self.thickness, true)?;
        fields.add_field(Node, SURFACE_WATER_DISCHARGE, surface_rate, true)?;
        for (name, values) in LINK_OUTPUTS.into_iter().zip([self.grad, self.vel, self.trans, self.q]) {
            fields.add_field(Link, name, values, true)?;
        }
        Ok(())
    }
}

fn check_duration(what: &str, t: f64) -> Result<(), MeshError> {
    if t.is_finite() && t >= 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidParameter(format!(
            "{what} must be finite and non-negative, got {t}"
        )))
    }
}

/// Explicit Dupuit percolator with fixed or adaptive time stepping.
///
/// ```
/// use mesh_flux::mesh::Mesh;
/// use mesh_flux::physics::{DupuitConfig, DupuitPercolator};
/// use mesh_flux::topology::ElementKind;
///
/// let mut mesh = Mesh::raster_uniform(5, 5, 10.0).unwrap();
/// mesh.fields_mut()
///     .add_full(ElementKind::Node, "topographic__elevation", 2.0, false)
///     .unwrap();
/// let mut gw = DupuitPercolator::new(&mut mesh, DupuitConfig::default()).unwrap();
/// gw.step_adaptive(&mut mesh, 3600.0, 0.5).unwrap();
/// assert!(gw.number_of_substeps() >= 1);
/// ```
#[derive(Clone, Debug)]
pub struct DupuitPercolator {
    config: DupuitConfig,
    balance: MassBalance,
    substeps: usize,
}

impl DupuitPercolator {
    /// Attach a percolator to `mesh`, creating every missing field.
    ///
    /// `topographic__elevation` must already exist. A missing aquifer base
    /// defaults to `0`, a missing water table to the land surface, and the
    /// parameter fields to the values in `config`.
    pub fn new(mesh: &mut Mesh, config: DupuitConfig) -> Result<Self, MeshError> {
        use ElementKind::{Link, Node};
        config.validate()?;
        let fields = mesh.fields_mut();
        let elev = fields.field(Node, TOPOGRAPHIC_ELEVATION)?.to_vec();

        let defaults = [
            (AQUIFER_BASE_ELEVATION, 0.0),
            (HYDRAULIC_CONDUCTIVITY, config.hydraulic_conductivity),
            (POROSITY, config.porosity),
            (RECHARGE_RATE, config.recharge_rate),
            (REGULARIZATION_SCALE, config.regularization_scale),
            (SURFACE_WATER_DISCHARGE, 0.0),
        ];
        for (name, value) in defaults {
            if !fields.has_field(Node, name) {
                fields.add_full(Node, name, value, false)?;
            }
        }
        if !fields.has_field(Node, WATER_TABLE_ELEVATION) {
            fields.add_field(Node, WATER_TABLE_ELEVATION, elev, false)?;
        }
        let thickness: Vec<f64> = fields
            .field(Node, WATER_TABLE_ELEVATION)?
            .iter()
            .zip(fields.field(Node, AQUIFER_BASE_ELEVATION)?)
            .map(|(wt, base)| (wt - base).max(0.0))
            .collect();
        fields.add_field(Node, AQUIFER_THICKNESS, thickness, true)?;
        for name in LINK_OUTPUTS.into_iter().chain([PRESCRIBED_DISCHARGE]) {
            if !fields.has_field(Link, name) {
                fields.add_zeros(Link, name, false)?;
            }
        }
        log::debug!(
            "dupuit percolator attached to {} nodes ({} core)",
            mesh.number_of_nodes(),
            mesh.status().core_nodes().len()
        );
        Ok(Self {
            config,
            balance: MassBalance::default(),
            substeps: 0,
        })
    }

    pub fn config(&self) -> &DupuitConfig {
        &self.config
    }

    /// One forward-Euler step of length `dt`. `dt == 0` is a no-op.
    pub fn step_fixed(&mut self, mesh: &mut Mesh, dt: f64) -> Result<(), MeshError> {
        check_duration("time step", dt)?;
        if dt == 0.0 {
            return Ok(());
        }
        let (conn, status, fields) = mesh.split_mut();
        let mut balance = MassBalance::default();
        let state = {
            let p = Params::gather(conn, status, fields)?;
            let mut state = State::load(conn, fields)?;
            state.compute_fluxes(conn, status, &p)?;
            state.advance(conn, status, &p, dt, &mut balance);
            state
        };
        state.commit(fields, dt)?;
        self.balance.absorb(&balance);
        Ok(())
    }

    /// Integrate `duration` in stable substeps.
    ///
    /// Each substep is the smallest of `courant` times the advective bound,
    /// the configured vn coefficient times the diffusive bound, and the time
    /// left. Nothing is committed unless the whole duration is integrated.
    ///
    /// # Errors
    /// [`MeshError::NonConvergent`] if the bound collapses to zero, is
    /// unbounded without a configured `degenerate_substep`, or more than
    /// `max_substeps` substeps would be needed.
    pub fn step_adaptive(
        &mut self,
        mesh: &mut Mesh,
        duration: f64,
        courant: f64,
    ) -> Result<(), MeshError> {
        check_duration("duration", duration)?;
        if !is_unit_coefficient(courant) {
            return Err(MeshError::InvalidParameter(format!(
                "courant coefficient must lie in (0, 1], got {courant}"
            )));
        }
        if duration == 0.0 {
            self.substeps = 0;
            return Ok(());
        }
        let (conn, status, fields) = mesh.split_mut();
        let mut balance = MassBalance::default();
        let mut substeps = 0usize;
        let state = {
            let p = Params::gather(conn, status, fields)?;
            let mut state = State::load(conn, fields)?;
            let mut remaining = duration;
            while remaining > 0.0 {
                if substeps >= self.config.max_substeps {
                    return Err(MeshError::NonConvergent {
                        reason: format!("exceeded {} substeps", self.config.max_substeps),
                        remaining,
                    });
                }
                state.compute_fluxes(conn, status, &p)?;
                let (advective, diffusive) = state.stability_bounds(conn, status, &p);
                let bound = (courant * advective).min(self.config.vn_coefficient * diffusive);
                let dt = if bound.is_finite() {
                    bound.min(remaining)
                } else if let Some(floor) = self.config.degenerate_substep {
                    floor.min(remaining)
                } else {
                    return Err(MeshError::NonConvergent {
                        reason: "no active link carries flow, so the stability bound is unbounded"
                            .to_string(),
                        remaining,
                    });
                };
                if dt.is_nan() || dt <= 0.0 {
                    return Err(MeshError::NonConvergent {
                        reason: format!("stability bound collapsed to {dt}"),
                        remaining,
                    });
                }
                state.advance(conn, status, &p, dt, &mut balance);
                remaining -= dt;
                substeps += 1;
                log::trace!("substep {substeps}: dt = {dt}, remaining = {remaining}");
            }
            state
        };
        state.commit(fields, duration)?;
        self.balance.absorb(&balance);
        self.substeps = substeps;
        Ok(())
    }

    /// [`step_adaptive`](Self::step_adaptive) with the configured courant
    /// coefficient.
    pub fn run(&mut self, mesh: &mut Mesh, duration: f64) -> Result<(), MeshError> {
        self.step_adaptive(mesh, duration, self.config.courant_coefficient)
    }

    /// Substeps taken by the last successful [`step_adaptive`](Self::step_adaptive).
    pub fn number_of_substeps(&self) -> usize {
        self.substeps
    }

    pub fn mass_balance(&self) -> &MassBalance {
        &self.balance
    }

    /// Cumulative recharge volume over core cells.
    pub fn recharge_flux_in(&self) -> f64 {
        self.balance.recharge_in
    }

    /// Cumulative subsurface volume leaving the core domain.
    pub fn groundwater_flux_out(&self) -> f64 {
        self.balance.groundwater_out
    }

    /// Cumulative seepage and return-flow volume.
    pub fn surface_flux_out(&self) -> f64 {
        self.balance.surface_out
    }

    pub fn reset_diagnostics(&mut self) {
        self.balance.reset();
        self.substeps = 0;
    }

    /// Drainable water volume `Σ thickness × porosity × area` over core nodes.
    pub fn total_storage(&self, mesh: &Mesh) -> Result<f64, MeshError> {
        let fields = mesh.fields();
        let thickness = fields.field(ElementKind::Node, AQUIFER_THICKNESS)?;
        let porosity = fields.field(ElementKind::Node, POROSITY)?;
        let conn = mesh.connectivity();
        let area = conn.area_of_cell();
        let cell_at_node = conn.cell_at_node();
        Ok(mesh
            .status()
            .core_nodes()
            .iter()
            .map(|&n| thickness[n] * porosity[n] * area[cell_at_node[n]])
            .sum())
    }
}
