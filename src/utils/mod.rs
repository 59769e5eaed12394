pub mod logging;

pub use logging::{FlowState, LoggingHelper};
