pub mod emitter;

pub use emitter::NotificationEmitter;
