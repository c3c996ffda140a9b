pub mod cause;
pub mod event;
pub mod signup;
