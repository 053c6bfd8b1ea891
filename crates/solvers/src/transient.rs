pub mod dopri5;
pub mod euler;
