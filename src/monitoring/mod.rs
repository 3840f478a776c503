/*!
 * Monitoring
 * Tracing initialization
 */

mod tracer;

pub use tracer::init_tracing;
