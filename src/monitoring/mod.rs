/*!
 * Monitoring
 * Tracing initialization and spans
 */

mod tracer;

pub use tracer::{init_tracing, tick_span};
