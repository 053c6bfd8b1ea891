pub mod least_squares;
pub mod ode;

pub use least_squares::LeastSquaresProblem;
pub use ode::OdeProblem;
