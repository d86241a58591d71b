//! Turbo mode: the compact shorthand protocol for logging one event per
//! short string, e.g. `h10p1>7` = home #10 passes, complete, to #7.

pub mod codes;
pub mod parser;
pub mod resolve;

pub use codes::{build_event_data, ActionKind};
pub use parser::{parse, TurboBreakdown, TurboParseResult};
pub use resolve::{resolve, PlayerRef, ResolveError, ResolvedCommand};
