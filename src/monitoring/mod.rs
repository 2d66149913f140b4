/*!
 * Monitoring
 * Tracing setup for the pool and its audit tooling
 */

mod tracer;

pub use tracer::{init_tracing, AuditSpan};
