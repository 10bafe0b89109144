// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
//! Nonlinear two-point boundary value problems y'' = f(x, y, y'), y(x0) = y0, y(x1) = y1,
//! solved twice: by RK4 shooting with a secant search on y'(x0), and by quasilinearization
//! with a tridiagonal (Thomas) solve per Newton iteration. A grid-refinement study compares
//! the shooting solutions on nested meshes.
pub mod Utils;
pub mod numerical;
pub mod somelinalg;
