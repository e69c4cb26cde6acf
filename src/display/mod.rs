//! Human-readable renderings of networks, tables, query results and traces.
pub mod network;
pub mod trace;

pub use network::{format_cpt_source, format_structure, format_tables};
pub use trace::{format_distribution, TextTrace};
