mod dispatch;
pub mod evaluate;
pub mod serve;

pub use dispatch::dispatch;
