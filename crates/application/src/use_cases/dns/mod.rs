mod resolve_domain;

pub use resolve_domain::{Resolution, ResolutionSource, ResolveDomainUseCase};
