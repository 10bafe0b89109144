//! some linear algebra functions used throughout the code
/// Thomas algorithm for tridiagonal systems
pub mod tridiagonal;
