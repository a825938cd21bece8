//! Models solved with the econsolve solvers.
//!
//! - [`griewank`]: the Griewank test function, minimized by refined multi-start.
//! - [`household`]: time allocation of a two-member household, solved on a
//!   grid and by L-BFGS.
//! - [`salon`]: a labor-demand model with adjustment costs, valued by Monte Carlo.
//! - [`stackelberg`]: a leader/follower duopoly solved by backward induction.

pub mod grid;
pub mod griewank;
pub mod household;
pub mod salon;
pub mod stackelberg;
