use std::time::{Duration, Instant};

pub(crate) fn trace(profile: bool, l_type: &str, l_step: &str, start: Instant, _elapsed: Duration) -> Duration {
    if profile {
        log::info!("{} | Total={:.2?} | {}={:.2?}", l_type, start.elapsed(), l_step, start.elapsed() - _elapsed);
    }
    else {
        log::trace!("{} | Total={:.2?} | {}={:.2?}", l_type, start.elapsed(), l_step, start.elapsed() - _elapsed);
    }
    start.elapsed()
}
