//! Re-export public algorithms.

pub mod calculus;
pub mod mappers;

pub use calculus::{calc_diff_at_link, calc_flux_div_at_node, calc_grad_at_link, calc_net_flux_at_node};
pub use mappers::{
    map_link_head_node_to_link, map_link_tail_node_to_link, map_max_of_link_nodes_to_link,
    map_mean_of_link_nodes_to_link, map_min_of_link_nodes_to_link, map_value_at_max_node_to_link,
};
