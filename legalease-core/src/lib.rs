//! The tabular surrogate library: abstract `DataFrame`/`Series`/`NdArray`/
//! `Blackbox` values and the operations (`read_csv`, indexing, `drop`,
//! `merge`, `groupby`, arithmetic, model `fit`/`predict`) that thread a
//! residual policy through a simulated analysis program without ever
//! touching real data.

pub mod arith;
pub mod dataframe;
pub mod io;
pub mod model;

pub use dataframe::{Blackbox, DataFrame, NdArray, PolicyBearing, Series};
pub use io::read_csv;
pub use model::Model;
