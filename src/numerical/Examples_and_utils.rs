/// a collection of test problems y'' = f(x, y, y') for the BVP drivers, most with exact solutions
use crate::numerical::BVP_config::BvpConfig;
use crate::numerical::BVP_error::{BvpError, BvpResult};
use crate::numerical::ODE_system::{SecondOrderEquation, SqrtSourceEquation};
use nalgebra::DVector;
use std::f64::consts::FRAC_PI_2;
use strum_macros::EnumIter;

/*
y'' = x*sqrt(y), y(0) = 0, y(1) = 2
no elementary solution, y'(0) ≈ 1.843

y'' = 0, y(0) = 0, y(1) = 2
exact solution: y = 2x

y'' = y, y(0) = 0, y(1) = sinh(1)
exact solution: y = sinh(x)

y'' = -y, y(0) = 0, y(pi/2) = 1
exact solution: y = sin(x)

y'' = -y', y(0) = 0, y(1) = 1 - exp(-1)
exact solution: y = 1 - exp(-x)

the "Parachute Equation" with k = g = 1:
y'' + y'^2 - 1 = 0, y(0) = 0, y(1) = ln((exp(2) + 1)/2) - 1
exact solution: y = ln((exp(2x) + 1)/2) - x
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum BvpExample {
    SqrtSource,
    StraightLine,
    Sinh,
    Sine,
    Damped,
    ParachuteEquation,
}

impl BvpExample {
    pub fn config(&self) -> BvpConfig {
        let (x0, x1, y0) = match self {
            BvpExample::Sine => (0.0, FRAC_PI_2, 0.0),
            _ => (0.0, 1.0, 0.0),
        };
        let y1 = match self {
            BvpExample::SqrtSource | BvpExample::StraightLine => 2.0,
            BvpExample::Sinh => 1.0_f64.sinh(),
            BvpExample::Sine => 1.0,
            BvpExample::Damped => 1.0 - (-1.0_f64).exp(),
            BvpExample::ParachuteEquation => ((2.0_f64.exp() + 1.0) / 2.0).ln() - 1.0,
        };
        BvpConfig {
            x0,
            x1,
            y0,
            y1,
            ..BvpConfig::default()
        }
    }

    /// secant seeds for y'(x0)
    pub fn initial_slopes(&self) -> (f64, f64) {
        match self {
            // y' = tanh(x) stays below 1
            BvpExample::ParachuteEquation => (0.0, 1.0),
            _ => (1.0, 3.0),
        }
    }

    pub fn exact(&self, x: f64) -> Option<f64> {
        match self {
            BvpExample::SqrtSource => None,
            BvpExample::StraightLine => Some(2.0 * x),
            BvpExample::Sinh => Some(x.sinh()),
            BvpExample::Sine => Some(x.sin()),
            BvpExample::Damped => Some(1.0 - (-x).exp()),
            BvpExample::ParachuteEquation => Some((((2.0 * x).exp() + 1.0) / 2.0).ln() - x),
        }
    }

    pub fn exact_solution(&self, x_mesh: &DVector<f64>) -> Option<DVector<f64>> {
        self.exact(x_mesh[0])?;
        Some(x_mesh.map(|x| self.exact(x).unwrap_or(f64::NAN)))
    }
}

impl SecondOrderEquation for BvpExample {
    fn rhs(&self, x: f64, y: f64, dy: f64) -> BvpResult<f64> {
        match self {
            BvpExample::SqrtSource => SqrtSourceEquation::default().rhs(x, y, dy),
            BvpExample::StraightLine => Ok(0.0),
            BvpExample::Sinh => Ok(y),
            BvpExample::Sine => Ok(-y),
            BvpExample::Damped => Ok(-dy),
            BvpExample::ParachuteEquation => {
                if !dy.is_finite() {
                    return Err(BvpError::Domain { x, value: dy });
                }
                Ok(1.0 - dy * dy)
            }
        }
    }

    fn d_rhs_dy(&self, x: f64, y: f64, dy: f64) -> BvpResult<f64> {
        match self {
            BvpExample::SqrtSource => SqrtSourceEquation::default().d_rhs_dy(x, y, dy),
            BvpExample::Sinh => Ok(1.0),
            BvpExample::Sine => Ok(-1.0),
            _ => Ok(0.0),
        }
    }

    fn d_rhs_ddy(&self, _x: f64, _y: f64, dy: f64) -> BvpResult<f64> {
        match self {
            BvpExample::Damped => Ok(-1.0),
            BvpExample::ParachuteEquation => Ok(-2.0 * dy),
            _ => Ok(0.0),
        }
    }

    fn name(&self) -> &str {
        match self {
            BvpExample::SqrtSource => "y'' = x*sqrt(y)",
            BvpExample::StraightLine => "y'' = 0",
            BvpExample::Sinh => "y'' = y",
            BvpExample::Sine => "y'' = -y",
            BvpExample::Damped => "y'' = -y'",
            BvpExample::ParachuteEquation => "y'' = 1 - y'^2",
        }
    }
}
