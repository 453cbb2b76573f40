pub mod product;
pub mod shop;
pub mod summary;

// Re-exports for convenience
pub use product::*;
pub use shop::*;
pub use summary::*;
