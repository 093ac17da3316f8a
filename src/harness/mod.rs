//! Request handling core of the harness.
//!
//! # Data Flow
//! ```text
//! HTTP request (http/server.rs)
//!     → handlers.rs (greet, process, simulate error, generate logs, health)
//!         → counter.rs (process-wide request tally)
//!         → random.rs (delay and severity draws)
//!         → logs.rs (synthetic log entries at each severity)
//!     → typed response body (http/response.rs)
//! ```
//!
//! # Design Decisions
//! - The request counter is atomic; concurrent handlers never lose updates
//! - Randomness is injected so tests can seed it
//! - Simulated latency is a timer, not a blocked worker thread

pub mod counter;
pub mod handlers;
pub mod logs;
pub mod random;

pub use counter::RequestCounter;
pub use logs::{LevelTally, Severity};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
