pub mod forecast;
pub mod serve;

pub use forecast::forecast;
pub use serve::serve;
