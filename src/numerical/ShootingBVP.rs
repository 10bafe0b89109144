/// shooting method for the Dirichlet problem of a scalar second-order equation
pub mod Shooting_simple;
