pub mod annotations;
pub mod feature_flags;
pub mod reckoner;
pub mod reference;
pub mod session;
