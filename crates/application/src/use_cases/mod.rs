pub mod dns;

pub use dns::{Resolution, ResolutionSource, ResolveDomainUseCase};
