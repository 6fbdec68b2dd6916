pub mod live;
pub mod loop_worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use live::{live_analysis_loop, LiveController, LIVE_ANALYSIS_INTERVAL};
pub use loop_worker::{run_sampling_session, SamplerConfig};
