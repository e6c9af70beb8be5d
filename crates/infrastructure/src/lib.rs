//! MHOS DNS Infrastructure Layer
pub mod dns;
pub mod system;
