//! Exact inference over discrete Bayesian networks by enumeration.
//!
//! A network is loaded into a [`Registry`] (variables, DAG edges, CPTs), an
//! [`InferenceEngine`] orders it once, and each query sums the full joint over
//! the hidden variables before normalizing.
//!
//! ```
//! use bayes_enum::{Evidence, InferenceEngine, Registry};
//!
//! let mut reg = Registry::new();
//! let (rain, wet) = reg.add_edge("Rain", "WetGrass");
//! reg.set_domain(rain, vec!["true".into(), "false".into()]);
//! reg.set_domain(wet, vec!["true".into(), "false".into()]);
//! reg.set_table(rain, &[]);
//! reg.add_row(rain, &[], &[0.2, 0.8]).unwrap();
//! reg.set_table(wet, &[rain]);
//! reg.add_row(wet, &[("Rain".into(), "true".into())], &[0.9, 0.1]).unwrap();
//! reg.add_row(wet, &[("Rain".into(), "false".into())], &[0.1, 0.9]).unwrap();
//!
//! let engine = InferenceEngine::new(&reg).unwrap();
//! let dist = engine.query("WetGrass", &Evidence::new()).unwrap();
//! assert!((dist.get("true").unwrap() - 0.26).abs() < 1e-9);
//! ```

pub mod analysis;
pub mod command;
pub mod compute;
pub mod config;
pub mod display;
pub mod error;
pub mod loader;
pub mod store;

pub use compute::{Distribution, Evidence, InferenceEngine, TraceSink, TraceStep};
pub use config::RowPolicy;
pub use error::InferenceError;
pub use loader::{load_network, LoadError};
pub use store::{Registry, VarId};
